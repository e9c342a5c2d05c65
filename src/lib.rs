//! Driver for the onsemi LC709203F battery fuel gauge.
//!
//! Every register access is one blocking transaction on the I2C bus: the
//! command frame is written, the driver waits for the register's settle
//! time, then reads the three byte response. The register map lives in
//! [`descriptors`], the transaction itself in [`ll`].
//!
//! The driver owns its bus. To share a bus with other devices, hand it one of
//! the `embedded-hal-bus` device wrappers.
#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate logger;

use device_descriptor::{Proxy, ReadOnlyRegister, ReadWriteRegister, Register};
use embedded_hal::{delay::DelayNs, i2c::I2c};
use embedded_hal_async::{delay::DelayNs as AsyncDelayNs, i2c::I2c as AsyncI2c};
use register_access::{
    AsyncRegisterExchanger, AsyncRegisterReader, AsyncRegisterWriter, RegisterExchanger,
    RegisterReader, RegisterWriter,
};

pub mod crc;
pub mod descriptors;
pub mod frame;
pub mod ll;

#[cfg(test)]
mod test_utils;

pub use descriptors::{Direction, PowerMode, TemperatureSource, REGISTERS};
pub use frame::{CrcScope, FrameError};

use descriptors::*;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported an error. The transaction was abandoned.
    Transfer(E),
    /// The checksum of the response does not match its contents.
    ChecksumMismatch { expected: u8, received: u8 },
    /// An argument was outside the range the register accepts.
    InvalidArgument,
}

impl<E> From<FrameError> for Error<E> {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::InvalidLength { .. } => Error::InvalidArgument,
            FrameError::ChecksumMismatch { expected, received } => {
                Error::ChecksumMismatch { expected, received }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bytes covered by the frame checksums.
    pub crc_scope: CrcScope,

    /// When set, responses with a bad checksum are rejected with
    /// [`Error::ChecksumMismatch`]. When cleared, the checksum byte is read
    /// but ignored.
    pub verify_response: bool,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            crc_scope: CrcScope::Frame,
            verify_response: true,
        }
    }

    pub const fn with_crc_scope(mut self, crc_scope: CrcScope) -> Self {
        self.crc_scope = crc_scope;
        self
    }

    pub const fn with_response_verification(mut self, verify_response: bool) -> Self {
        self.verify_response = verify_response;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Lc709203f<I, D> {
    interface: ll::Lc709203fI2cInterface<I, D>,
}

impl<I, D> Lc709203f<I, D> {
    pub const fn new(i2c: I, delay: D, config: Config) -> Self {
        Self {
            interface: ll::Lc709203fI2cInterface { i2c, delay, config },
        }
    }

    pub fn config(&self) -> Config {
        self.interface.config
    }

    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.interface.i2c
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (I, D) {
        (self.interface.i2c, self.interface.delay)
    }
}

impl<I, D> Lc709203f<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Selects `R` and reads its value.
    pub fn read<R>(&mut self) -> Result<R, Error<I::Error>>
    where
        R: ReadOnlyRegister<u16>,
    {
        R::read(&mut self.interface)
    }

    /// Writes `reg` without reading a response.
    pub fn write<R>(&mut self, reg: R) -> Result<(), Error<I::Error>>
    where
        R: Register<u16>,
    {
        reg.write(&mut self.interface)
    }

    /// Writes `reg` and returns the value the gauge reports back.
    pub fn exchange<R>(&mut self, reg: R) -> Result<R, Error<I::Error>>
    where
        R: ReadWriteRegister<u16>,
    {
        reg.exchange(&mut self.interface)
    }

    fn exchange_bits<R>(&mut self, bits: u16) -> Result<u16, Error<I::Error>>
    where
        R: ReadWriteRegister<u16>,
    {
        self.exchange(R::from_bits(bits)).map(|reg| reg.bits())
    }

    /// Starts RSOC initialization from the open circuit voltage measured
    /// before the load was applied.
    pub fn before_rsoc(&mut self) -> Result<(), Error<I::Error>> {
        self.write(BeforeRsoc::default())
    }

    /// Starts RSOC initialization from the present cell voltage.
    pub fn initial_rsoc(&mut self) -> Result<(), Error<I::Error>> {
        self.write(InitialRsoc::default())
    }

    /// Writes the default thermistor B-constant (3380) and returns the value
    /// read back.
    pub fn thermistor_b(&mut self) -> Result<u16, Error<I::Error>> {
        self.set_thermistor_b(ThermistorB::DEFAULT_VALUE)
    }

    pub fn set_thermistor_b(&mut self, b_constant: u16) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<ThermistorB>(b_constant)
    }

    /// Writes the default cell temperature (25°C) and returns the reported
    /// temperature in °C.
    pub fn cell_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        self.set_cell_temperature(CellTemperature::DEFAULT_VALUE)
    }

    /// Writes the cell temperature in 0.1K units and returns the reported
    /// temperature in °C. Only has an effect in I2C temperature mode.
    pub fn set_cell_temperature(&mut self, raw: u16) -> Result<f32, Error<I::Error>> {
        if !(CellTemperature::MIN_RAW..=CellTemperature::MAX_RAW).contains(&raw) {
            return Err(Error::InvalidArgument);
        }

        self.exchange(CellTemperature::from_bits(raw))
            .map(|reg| reg.celsius())
    }

    /// Returns the cell voltage in mV.
    pub fn cell_voltage(&mut self) -> Result<u16, Error<I::Error>> {
        self.read::<CellVoltage>().map(|reg| reg.bits())
    }

    /// Sets RSOC reporting to auto mode and returns the value read back.
    pub fn current_direction(&mut self) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<CurrentDirection>(CurrentDirection::DEFAULT_VALUE)
    }

    pub fn set_current_direction(
        &mut self,
        direction: Direction,
    ) -> Result<u16, Error<I::Error>> {
        self.exchange(CurrentDirection::new(|w| w.direction().write(direction)))
            .map(|reg| reg.bits())
    }

    pub fn adjustment_pack_application(&mut self) -> Result<u16, Error<I::Error>> {
        self.set_adjustment_pack_application(AdjustmentPackApplication::DEFAULT_VALUE)
    }

    pub fn set_adjustment_pack_application(&mut self, apa: u16) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<AdjustmentPackApplication>(apa)
    }

    pub fn adjustment_pack_thermistor(&mut self) -> Result<u16, Error<I::Error>> {
        self.set_adjustment_pack_thermistor(AdjustmentPackThermistor::DEFAULT_VALUE)
    }

    pub fn set_adjustment_pack_thermistor(&mut self, apt: u16) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<AdjustmentPackThermistor>(apt)
    }

    /// Returns the relative state of charge in %.
    pub fn rsoc(&mut self) -> Result<u16, Error<I::Error>> {
        self.read::<Rsoc>().map(|reg| reg.bits())
    }

    /// Returns the relative state of charge in 0.1% units.
    pub fn indicator_to_empty(&mut self) -> Result<u16, Error<I::Error>> {
        self.read::<IndicatorToEmpty>().map(|reg| reg.bits())
    }

    pub fn ic_version(&mut self) -> Result<u16, Error<I::Error>> {
        self.read::<IcVersion>().map(|reg| reg.bits())
    }

    /// Selects battery profile 0 and returns the value read back.
    pub fn change_of_the_parameter(&mut self) -> Result<u16, Error<I::Error>> {
        self.set_battery_profile(ChangeOfTheParameter::DEFAULT_VALUE)
    }

    /// Selects battery profile 0 or 1.
    pub fn set_battery_profile(&mut self, profile: u16) -> Result<u16, Error<I::Error>> {
        if profile > 1 {
            return Err(Error::InvalidArgument);
        }

        self.exchange_bits::<ChangeOfTheParameter>(profile)
    }

    pub fn alarm_low_rsoc(&mut self) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<AlarmLowRsoc>(AlarmLowRsoc::DEFAULT_VALUE)
    }

    /// Sets the RSOC alarm threshold in %. 0 disables the alarm.
    pub fn set_alarm_low_rsoc(&mut self, percentage: u8) -> Result<u16, Error<I::Error>> {
        if percentage > 100 {
            return Err(Error::InvalidArgument);
        }

        self.exchange_bits::<AlarmLowRsoc>(percentage as u16)
    }

    pub fn alarm_low_cell_voltage(&mut self) -> Result<u16, Error<I::Error>> {
        self.set_alarm_low_cell_voltage(AlarmLowCellVoltage::DEFAULT_VALUE)
    }

    /// Sets the cell voltage alarm threshold in mV. 0 disables the alarm.
    pub fn set_alarm_low_cell_voltage(&mut self, millivolts: u16) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<AlarmLowCellVoltage>(millivolts)
    }

    pub fn ic_power_mode(&mut self) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<IcPowerMode>(IcPowerMode::DEFAULT_VALUE)
    }

    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<u16, Error<I::Error>> {
        self.exchange(IcPowerMode::new(|w| w.mode().write(mode)))
            .map(|reg| reg.bits())
    }

    pub fn status_bit(&mut self) -> Result<u16, Error<I::Error>> {
        self.exchange_bits::<StatusBit>(StatusBit::DEFAULT_VALUE)
    }

    pub fn set_temperature_source(
        &mut self,
        source: TemperatureSource,
    ) -> Result<u16, Error<I::Error>> {
        self.exchange(StatusBit::new(|w| w.source().write(source)))
            .map(|reg| reg.bits())
    }

    pub fn number_of_the_parameter(&mut self) -> Result<u16, Error<I::Error>> {
        self.read::<NumberOfTheParameter>().map(|reg| reg.bits())
    }
}

impl<I, D> Lc709203f<I, D>
where
    I: AsyncI2c,
    D: AsyncDelayNs,
{
    pub async fn read_async<R>(&mut self) -> Result<R, Error<I::Error>>
    where
        R: ReadOnlyRegister<u16>,
    {
        R::read_async(&mut self.interface).await
    }

    pub async fn write_async<R>(&mut self, reg: R) -> Result<(), Error<I::Error>>
    where
        R: Register<u16>,
    {
        reg.write_async(&mut self.interface).await
    }

    pub async fn exchange_async<R>(&mut self, reg: R) -> Result<R, Error<I::Error>>
    where
        R: ReadWriteRegister<u16>,
    {
        reg.exchange_async(&mut self.interface).await
    }

    pub async fn before_rsoc_async(&mut self) -> Result<(), Error<I::Error>> {
        self.write_async(BeforeRsoc::default()).await
    }

    pub async fn initial_rsoc_async(&mut self) -> Result<(), Error<I::Error>> {
        self.write_async(InitialRsoc::default()).await
    }

    pub async fn cell_temperature_async(&mut self) -> Result<f32, Error<I::Error>> {
        self.exchange_async(CellTemperature::default())
            .await
            .map(|reg| reg.celsius())
    }

    pub async fn cell_voltage_async(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_async::<CellVoltage>().await.map(|reg| reg.bits())
    }

    pub async fn rsoc_async(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_async::<Rsoc>().await.map(|reg| reg.bits())
    }

    pub async fn indicator_to_empty_async(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_async::<IndicatorToEmpty>()
            .await
            .map(|reg| reg.bits())
    }
}
