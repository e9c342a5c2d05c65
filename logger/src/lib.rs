//! Logging facade shared by the workspace crates.
//!
//! The macros forward to `defmt` or `log`, depending on which feature the
//! *calling* crate enables. With neither enabled the arguments are still
//! type-checked, but nothing is emitted.
#![no_std]

#[doc(hidden)]
#[macro_export]
macro_rules! __discard {
    ($($args:tt)*) => {
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = core::format_args!($($args)*);
        }
    };
}

#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($args)*);
        #[cfg(feature = "log")]
        log::trace!($($args)*);
        $crate::__discard!($($args)*);
    }};
}

#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($args)*);
        #[cfg(feature = "log")]
        log::debug!($($args)*);
        $crate::__discard!($($args)*);
    }};
}

#[macro_export]
macro_rules! info {
    ($($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($args)*);
        #[cfg(feature = "log")]
        log::info!($($args)*);
        $crate::__discard!($($args)*);
    }};
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($args)*);
        #[cfg(feature = "log")]
        log::warn!($($args)*);
        $crate::__discard!($($args)*);
    }};
}

#[macro_export]
macro_rules! error {
    ($($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::error!($($args)*);
        #[cfg(feature = "log")]
        log::error!($($args)*);
        $crate::__discard!($($args)*);
    }};
}
