use device_descriptor::*;

device! {
    /// Starts RSOC initialization from the open circuit voltage sampled
    /// before the load was connected. Takes up to 10ms to complete.
    BeforeRsoc(u16, addr = 0x04, settle_ms = 10, access = Write, default = 0xAA55) {}

    /// B-constant of the thermistor. Refer to the thermistor's data sheet
    /// for the value to use.
    ThermistorB(u16, addr = 0x06, settle_ms = 1, access = ReadWrite, default = 0x0D34) {
        b_constant(pos = 0, width = 16): u16
    }

    /// Starts RSOC initialization from the present cell voltage. Takes up to
    /// 10ms to complete.
    InitialRsoc(u16, addr = 0x07, settle_ms = 10, access = Write, default = 0xAA55) {}

    /// Cell temperature in 0.1K units, from -20°C (0x09E4) to +60°C (0x0D04).
    /// Written by the host in I2C temperature mode, measured by the gauge in
    /// thermistor mode.
    CellTemperature(u16, addr = 0x08, settle_ms = 1, access = ReadWrite, default = 0x0BA6) {
        temperature(pos = 0, width = 16): u16
    }

    /// Voltage on VDD in 1mV units.
    CellVoltage(u16, addr = 0x09, settle_ms = 5, access = Read) {
        voltage(pos = 0, width = 16): u16
    }

    /// Controls how RSOC is reported. In charge mode RSOC may not decrease, in
    /// discharge mode it may not increase.
    CurrentDirection(u16, addr = 0x0A, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        direction(pos = 0, width = 16): Direction {
            Auto = 0x0000,
            Charge = 0x0001,
            Discharge = 0xFFFF
        }
    }

    /// Adjustment value for the battery type, improves RSOC precision.
    AdjustmentPackApplication(u16, addr = 0x0B, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        apa(pos = 0, width = 16): u16
    }

    /// Compensates the thermistor measurement delay caused by a capacitor
    /// across the thermistor.
    AdjustmentPackThermistor(u16, addr = 0x0C, settle_ms = 1, access = ReadWrite, default = 0x001E) {
        apt(pos = 0, width = 16): u16
    }

    /// Relative state of charge in 1% units, 0% to 100%.
    Rsoc(u16, addr = 0x0D, settle_ms = 5, access = Read) {
        percentage(pos = 0, width = 16): u16
    }

    /// Same as RSOC with 0.1% resolution.
    IndicatorToEmpty(u16, addr = 0x0F, settle_ms = 5, access = Read) {
        permille(pos = 0, width = 16): u16
    }

    /// ID number of the IC.
    IcVersion(u16, addr = 0x11, settle_ms = 5, access = Read) {
        version(pos = 0, width = 16): u16
    }

    /// Selects the battery profile.
    ChangeOfTheParameter(u16, addr = 0x12, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        profile(pos = 0, width = 16): u16
    }

    /// ALARMB is pulled low while RSOC is below this value. 0 disables the
    /// alarm.
    AlarmLowRsoc(u16, addr = 0x13, settle_ms = 1, access = ReadWrite, default = 0x0008) {
        percentage(pos = 0, width = 16): u16
    }

    /// ALARMB is pulled low while VDD is below this value, in 1mV units. 0
    /// disables the alarm.
    AlarmLowCellVoltage(u16, addr = 0x14, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        voltage(pos = 0, width = 16): u16
    }

    IcPowerMode(u16, addr = 0x15, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        mode(pos = 0, width = 16): PowerMode {
            Operational = 0x0001,
            Sleep = 0x0002
        }
    }

    /// Selects where the cell temperature comes from.
    StatusBit(u16, addr = 0x16, settle_ms = 1, access = ReadWrite, default = 0x0000) {
        source(pos = 0, width = 16): TemperatureSource {
            I2cMode = 0x0000,
            ThermistorMode = 0x0001
        }
    }

    /// Identity of the battery profile data file.
    NumberOfTheParameter(u16, addr = 0x1A, settle_ms = 1, access = Read) {
        number(pos = 0, width = 16): u16
    }
}

impl CellTemperature {
    /// Subtracted from the raw count to get tenths of a degree Celsius.
    pub const OFFSET: f32 = 2371.5;

    pub const MIN_RAW: u16 = 0x09E4;
    pub const MAX_RAW: u16 = 0x0D04;

    /// Converts the register value to °C.
    ///
    /// ```rust
    /// # use lc709203f::descriptors::CellTemperature;
    /// # use device_descriptor::Proxy;
    /// let celsius = CellTemperature::from_bits(2515).celsius();
    /// assert!((celsius - 14.35).abs() < 1e-4);
    /// ```
    pub fn celsius(&self) -> f32 {
        (self.bits() as f32 - Self::OFFSET) / 10.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_map() {
        #[rustfmt::skip]
        let table = [
            ("BeforeRsoc",                0x04, 10, Access::Write,     Some(0xAA55)),
            ("ThermistorB",               0x06,  1, Access::ReadWrite, Some(0x0D34)),
            ("InitialRsoc",               0x07, 10, Access::Write,     Some(0xAA55)),
            ("CellTemperature",           0x08,  1, Access::ReadWrite, Some(0x0BA6)),
            ("CellVoltage",               0x09,  5, Access::Read,      None),
            ("CurrentDirection",          0x0A,  1, Access::ReadWrite, Some(0x0000)),
            ("AdjustmentPackApplication", 0x0B,  1, Access::ReadWrite, Some(0x0000)),
            ("AdjustmentPackThermistor",  0x0C,  1, Access::ReadWrite, Some(0x001E)),
            ("Rsoc",                      0x0D,  5, Access::Read,      None),
            ("IndicatorToEmpty",          0x0F,  5, Access::Read,      None),
            ("IcVersion",                 0x11,  5, Access::Read,      None),
            ("ChangeOfTheParameter",      0x12,  1, Access::ReadWrite, Some(0x0000)),
            ("AlarmLowRsoc",              0x13,  1, Access::ReadWrite, Some(0x0008)),
            ("AlarmLowCellVoltage",       0x14,  1, Access::ReadWrite, Some(0x0000)),
            ("IcPowerMode",               0x15,  1, Access::ReadWrite, Some(0x0000)),
            ("StatusBit",                 0x16,  1, Access::ReadWrite, Some(0x0000)),
            ("NumberOfTheParameter",      0x1A,  1, Access::Read,      None),
        ];

        assert_eq!(REGISTERS.len(), table.len());

        for (info, (name, address, settle_ms, access, default)) in REGISTERS.iter().zip(table) {
            assert_eq!(info.name, name);
            assert_eq!(info.address, address, "{name}");
            assert_eq!(info.settle_ms, settle_ms, "{name}");
            assert_eq!(info.access, access, "{name}");
            assert_eq!(info.default, default, "{name}");
        }
    }

    #[test]
    fn trait_constants_match_table() {
        assert_eq!(<Rsoc as RegisterDescriptor<u16>>::ADDRESS, 0x0D);
        assert_eq!(<Rsoc as RegisterDescriptor<u16>>::SETTLE_MS, 5);
        assert_eq!(<BeforeRsoc as RegisterDescriptor<u16>>::NAME, "BeforeRsoc");
        assert_eq!(<ThermistorB as Register<u16>>::DEFAULT_VALUE, 3380);
        assert_eq!(ThermistorB::default().bits(), 3380);
    }

    #[test]
    fn enum_fields() {
        #[rustfmt::skip]
        let table = [
            (0x0000, Some(Direction::Auto)),
            (0x0001, Some(Direction::Charge)),
            (0xFFFF, Some(Direction::Discharge)),
            (0x0002, None),
        ];

        for (raw, expected) in table {
            assert_eq!(CurrentDirection::from_bits(raw).direction().read(), expected);
        }

        let reg = CurrentDirection::new(|w| w.direction().write(Direction::Discharge));
        assert_eq!(reg.bits(), 0xFFFF);

        assert_eq!(IcPowerMode::default().mode().read(), None);
        let reg = IcPowerMode::new(|w| w.mode().write(PowerMode::Sleep));
        assert_eq!(reg.bits(), 0x0002);
        let reg = reg.modify(|w| w.mode().write(PowerMode::Operational));
        assert_eq!(reg.mode().read(), Some(PowerMode::Operational));

        let reg = StatusBit::new(|w| w.source().write(TemperatureSource::ThermistorMode));
        assert_eq!(reg.bits(), 0x0001);
    }

    #[test]
    fn writer_reset_restores_default() {
        let reg = AlarmLowRsoc::new(|w| w.percentage().write(20).reset());
        assert_eq!(reg.bits(), 8);
    }

    #[test]
    fn temperature_conversion() {
        #[rustfmt::skip]
        let table = [
            (2515,   14.35),
            (2371,   -0.05),
            (0x0BA6, 61.05),
        ];

        for (raw, expected) in table {
            let celsius = CellTemperature::from_bits(raw).celsius();
            assert!((celsius - expected).abs() < 1e-3, "{raw}: {celsius} != {expected}");
        }
    }
}
