#![no_std]

use core::{convert::TryFrom, marker::PhantomData};

pub trait RegisterWidthType: Copy {
    const WIDTH: u8;

    fn from_32(data: u32) -> Self;
    fn to_32(self) -> u32;
}

impl RegisterWidthType for u8 {
    const WIDTH: u8 = 8;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u8::MAX as u32);
        data as u8
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}

impl RegisterWidthType for u16 {
    const WIDTH: u8 = 16;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u16::MAX as u32);
        data as u16
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}

/// How a register is reached on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Selected by its command byte alone, the device answers with the value.
    Read,
    /// Written with a payload, the device does not answer.
    Write,
    /// Written with a payload, the device answers with the value it now holds.
    ReadWrite,
}

/// Static description of one register, usable as table data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterInfo {
    pub name: &'static str,
    pub address: u8,
    pub settle_ms: u32,
    pub access: Access,
    pub default: Option<u32>,
}

pub trait RegisterDescriptor<RWT: RegisterWidthType>: Proxy<RWT> + Copy {
    const ADDRESS: u8;
    const NAME: &'static str;
    /// Time the device needs between receiving the command and having the
    /// response ready.
    const SETTLE_MS: u32;
    const ACCESS: Access;
}

/// A register that can be selected and read back.
pub trait ReadOnlyRegister<RWT: RegisterWidthType>: RegisterDescriptor<RWT> {}

/// A register that accepts a payload.
pub trait Register<RWT: RegisterWidthType>: RegisterDescriptor<RWT> {
    type Writer: WriterProxy<RWT>;

    const DEFAULT_VALUE: RWT;

    fn new(f: impl Fn(Self::Writer) -> Self::Writer) -> Self;
    fn modify(self, f: impl Fn(Self::Writer) -> Self::Writer) -> Self;
}

/// A register that accepts a payload and answers with its new value.
pub trait ReadWriteRegister<RWT: RegisterWidthType>:
    Register<RWT> + ReadOnlyRegister<RWT>
{
}

pub trait Proxy<RWT: RegisterWidthType> {
    fn bits(&self) -> RWT;
    fn from_bits(bits: RWT) -> Self;
}

pub trait WriterProxy<RWT: RegisterWidthType>: Proxy<RWT> {
    fn write_bits(self, bits: RWT) -> Self;
    fn reset(self) -> Self;
}

pub struct Field<const POS: u8, const WIDTH: u8, DataType, Writer, RWT> {
    _marker: PhantomData<(DataType, RWT)>,
    reg: Writer,
}

impl<const POS: u8, const WIDTH: u8, DataType, P, RWT> Field<POS, WIDTH, DataType, P, RWT>
where
    DataType: TryFrom<RWT> + Into<RWT>,
    P: Proxy<RWT>,
    RWT: RegisterWidthType,
{
    const _CONST_CHECK: () = assert!(POS + WIDTH <= RWT::WIDTH);

    pub const fn new(reg: P) -> Self {
        Field {
            _marker: PhantomData,
            reg,
        }
    }

    #[inline(always)]
    fn mask() -> u32 {
        ((1u64 << WIDTH) - 1) as u32
    }

    #[inline(always)]
    pub fn read_field_bits(&self) -> RWT {
        RWT::from_32((self.reg.bits().to_32() >> POS as u32) & Self::mask())
    }

    /// Returns `None` when the field holds a value `DataType` has no
    /// representation for.
    #[inline(always)]
    pub fn read(&self) -> Option<DataType> {
        DataType::try_from(self.read_field_bits()).ok()
    }
}

impl<const POS: u8, const WIDTH: u8, DataType, P, RWT> Field<POS, WIDTH, DataType, P, RWT>
where
    DataType: TryFrom<RWT> + Into<RWT>,
    P: WriterProxy<RWT>,
    RWT: RegisterWidthType,
{
    #[inline(always)]
    fn write_field(data: RWT, value: RWT) -> RWT {
        // make sure value fits into field
        debug_assert!(value.to_32() <= Self::mask());

        let shifted_mask = Self::mask() << POS as u32;
        let masked_field = data.to_32() & !shifted_mask;

        RWT::from_32(masked_field | (value.to_32() << POS as u32))
    }

    #[inline(always)]
    pub fn write(self, value: DataType) -> P {
        let bits = self.reg.bits();

        self.reg.write_bits(Self::write_field(bits, value.into()))
    }
}

#[macro_export]
macro_rules! impl_fields {
    () => {};

    ($($(#[$meta:meta])* $field:ident($rwt:ty, pos = $pos:literal, width = $width:literal): $type:ty),*) => {
        $(
            $(#[$meta])*
            #[inline(always)]
            #[allow(non_snake_case)]
            pub fn $field(self) -> $crate::Field<$pos, $width, $type, Self, $rwt> {
                $crate::Field::new(self)
            }
        )*
    };
}

#[macro_export]
macro_rules! register {
    (@common $(#[$doc:meta])* $reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = $access:ident, default = $default:expr) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),*
    }) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[must_use]
        #[allow(non_camel_case_types)]
        pub struct $reg {
            value: $rwt
        }

        impl $crate::Proxy<$rwt> for $reg {
            #[inline(always)]
            fn from_bits(bits: $rwt) -> Self {
                Self { value: bits }
            }

            #[inline(always)]
            fn bits(&self) -> $rwt {
                self.value
            }
        }

        impl $crate::RegisterDescriptor<$rwt> for $reg {
            const ADDRESS: u8 = $addr;
            const NAME: &'static str = stringify!($reg);
            const SETTLE_MS: u32 = $settle;
            const ACCESS: $crate::Access = $crate::Access::$access;
        }

        impl $reg {
            pub const INFO: $crate::RegisterInfo = $crate::RegisterInfo {
                name: stringify!($reg),
                address: $addr,
                settle_ms: $settle,
                access: $crate::Access::$access,
                default: $default,
            };

            $crate::impl_fields! { $( $(#[$fdoc])* $field($rwt, pos = $pos, width = $width): $type ),* }
        }

        #[cfg(feature = "ufmt-impl")]
        impl ufmt::uDebug for $reg {
            fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
            where
                W: ufmt::uWrite + ?Sized,
            {
                f.debug_struct(stringify!($reg))?
                    .field("value", &self.value)?
                    .finish()
            }
        }
    };

    (@writable $reg:ident ($rwt:ty, default = $default:literal) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),*
    }) => {
        impl Default for $reg {
            #[inline(always)]
            fn default() -> Self {
                <Self as $crate::Proxy<$rwt>>::from_bits($default)
            }
        }

        impl $crate::Register<$rwt> for $reg {
            type Writer = writer_proxies::$reg;

            const DEFAULT_VALUE: $rwt = $default;

            #[inline(always)]
            fn new(f: impl Fn(Self::Writer) -> Self::Writer) -> Self {
                let writer = <Self::Writer as $crate::Proxy<$rwt>>::from_bits($default);
                <Self as $crate::Proxy<$rwt>>::from_bits($crate::Proxy::bits(&f(writer)))
            }

            #[inline(always)]
            fn modify(self, f: impl Fn(Self::Writer) -> Self::Writer) -> Self {
                let writer = <Self::Writer as $crate::Proxy<$rwt>>::from_bits(self.value);
                <Self as $crate::Proxy<$rwt>>::from_bits($crate::Proxy::bits(&f(writer)))
            }
        }

        impl writer_proxies::$reg {
            $crate::impl_fields! { $( $(#[$fdoc])* $field($rwt, pos = $pos, width = $width): $type ),* }
        }
    };

    ($(#[$doc:meta])* $reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = Read) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),* $(,)?
    }) => {
        $crate::register!(@common $(#[$doc])* $reg($rwt, addr = $addr, settle_ms = $settle, access = Read, default = None) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });

        impl $crate::ReadOnlyRegister<$rwt> for $reg {}
    };

    ($(#[$doc:meta])* $reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = Write, default = $default:literal) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),* $(,)?
    }) => {
        $crate::register!(@common $(#[$doc])* $reg($rwt, addr = $addr, settle_ms = $settle, access = Write, default = Some($default as u32)) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });
        $crate::register!(@writable $reg($rwt, default = $default) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });
    };

    ($(#[$doc:meta])* $reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = ReadWrite, default = $default:literal) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),* $(,)?
    }) => {
        $crate::register!(@common $(#[$doc])* $reg($rwt, addr = $addr, settle_ms = $settle, access = ReadWrite, default = Some($default as u32)) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });
        $crate::register!(@writable $reg($rwt, default = $default) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });

        impl $crate::ReadOnlyRegister<$rwt> for $reg {}
        impl $crate::ReadWriteRegister<$rwt> for $reg {}
    };

    // Fields with an inline value list get an enum generated for them.
    ($(#[$doc:meta])* $reg:ident ($rwt:ty, $($proto:tt)*) {
        $( $(#[$fdoc:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ident $({
            $( $name:ident = $value:literal ),+ $(,)?
        })? ),* $(,)?
    }) => {
        $( $(
            #[derive(Debug, PartialEq, Eq, Copy, Clone)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub enum $type {
                $($name = $value),+
            }

            impl core::convert::TryFrom<$rwt> for $type {
                type Error = $rwt;

                fn try_from(data: $rwt) -> Result<Self, Self::Error> {
                    match data {
                        $($value => Ok($type::$name),)+
                        _ => Err(data)
                    }
                }
            }

            impl From<$type> for $rwt {
                fn from(data: $type) -> $rwt {
                    data as $rwt
                }
            }
        )? )*

        $crate::register!($(#[$doc])* $reg($rwt, $($proto)*) {
            $( $(#[$fdoc])* $field(pos = $pos, width = $width): $type ),*
        });
    };
}

#[macro_export]
macro_rules! writer_proxy {
    ($reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = Read) {
        $($fields:tt)*
    }) => {};

    ($reg:ident ($rwt:ty, addr = $addr:literal, settle_ms = $settle:literal, access = $access:ident, default = $default:literal) {
        $($fields:tt)*
    }) => {
        #[allow(non_camel_case_types)]
        pub struct $reg {
            bits: $rwt
        }

        impl $crate::Proxy<$rwt> for $reg {
            #[inline(always)]
            fn from_bits(bits: $rwt) -> Self {
                Self {
                    bits
                }
            }

            #[inline(always)]
            fn bits(&self) -> $rwt {
                self.bits
            }
        }

        impl $crate::WriterProxy<$rwt> for $reg {
            #[inline(always)]
            fn write_bits(self, bits: $rwt) -> Self {
                <Self as $crate::Proxy<$rwt>>::from_bits(bits)
            }

            #[inline(always)]
            fn reset(self) -> Self {
                <Self as $crate::WriterProxy<$rwt>>::write_bits(self, $default)
            }
        }
    };
}

/// Declares the register map of a device.
///
/// Each entry names the register, its width, command byte, settle time and
/// access kind. Writable registers also carry the payload written when no
/// other value is given.
#[macro_export]
macro_rules! device {
    (
        $( $(#[$doc:meta])* $reg:ident($($proto:tt)*) {
            $($fields:tt)*
        } )+
    ) => {

        mod writer_proxies {
            $(
                $crate::writer_proxy!($reg($($proto)*) { $($fields)* } );
            )+
        }

        $(
            $crate::register!($(#[$doc])* $reg($($proto)*) { $($fields)* } );
        )+

        /// Every register of the device, in declaration order.
        pub const REGISTERS: &[$crate::RegisterInfo] = &[$($reg::INFO),+];
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Copy)]
    struct Raw(u16);

    impl Proxy<u16> for Raw {
        fn bits(&self) -> u16 {
            self.0
        }

        fn from_bits(bits: u16) -> Self {
            Raw(bits)
        }
    }

    impl WriterProxy<u16> for Raw {
        fn write_bits(self, bits: u16) -> Self {
            Raw(bits)
        }

        fn reset(self) -> Self {
            Raw(0)
        }
    }

    #[test]
    fn full_width_field_reads_whole_register() {
        let field = Field::<0, 16, u16, Raw, u16>::new(Raw(0xBEEF));
        assert_eq!(field.read(), Some(0xBEEF));
    }

    #[test]
    fn field_write_keeps_other_bits() {
        let reg = Field::<4, 4, u16, Raw, u16>::new(Raw(0xFFFF)).write(0x0);
        assert_eq!(reg.bits(), 0xFF0F);

        let reg = Field::<8, 8, u16, Raw, u16>::new(Raw(0x0034)).write(0x0D);
        assert_eq!(reg.bits(), 0x0D34);
    }
}
