use device_descriptor::{
    Proxy, ReadOnlyRegister, ReadWriteRegister, Register, RegisterDescriptor,
};
use embedded_hal::{delay::DelayNs, i2c::I2c};
use embedded_hal_async::{delay::DelayNs as AsyncDelayNs, i2c::I2c as AsyncI2c};
use register_access::{AsyncRegisterAccess, RegisterAccess};

use crate::{
    frame::{CommandFrame, ResponseFrame, DEVICE_ADDR, RESPONSE_LEN},
    Config, Error,
};

/// Runs one gauge transaction per register access: send the command frame,
/// wait for the register's settle time, then read the response if the
/// register has one.
pub struct Lc709203fI2cInterface<I, D> {
    pub i2c: I,
    pub delay: D,
    pub config: Config,
}

impl<I, D> Lc709203fI2cInterface<I, D> {
    fn command_frame<R>(&self, reg: R) -> CommandFrame
    where
        R: RegisterDescriptor<u16>,
    {
        CommandFrame::new(R::ADDRESS, reg.bits(), self.config.crc_scope)
    }

    fn decode<R, E>(&self, bytes: [u8; RESPONSE_LEN]) -> Result<R, Error<E>>
    where
        R: RegisterDescriptor<u16>,
    {
        let response = ResponseFrame::from_bytes(bytes);

        if self.config.verify_response {
            if let Err(e) = response.verify(R::ADDRESS, self.config.crc_scope) {
                warn!("{}: response checksum mismatch", R::NAME);
                return Err(e.into());
            }
        }

        let value = response.value();
        trace!("{} = {}", R::NAME, value);

        Ok(R::from_bits(value))
    }
}

fn transfer_error<E>(name: &'static str) -> impl FnOnce(E) -> Error<E> {
    move |e| {
        debug!("{}: bus transfer failed", name);
        Error::Transfer(e)
    }
}

impl<I, D> RegisterAccess<u16> for Lc709203fI2cInterface<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = Error<I::Error>;

    fn read_register<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister<u16>,
    {
        trace!("select {}", R::NAME);

        self.i2c
            .write(DEVICE_ADDR, &[R::ADDRESS])
            .map_err(transfer_error(R::NAME))?;
        self.delay.delay_ms(R::SETTLE_MS);

        let mut response = [0; RESPONSE_LEN];
        self.i2c
            .read(DEVICE_ADDR, &mut response)
            .map_err(transfer_error(R::NAME))?;

        self.decode(response)
    }

    fn write_register<R>(&mut self, reg: R) -> Result<(), Self::Error>
    where
        R: Register<u16>,
    {
        let frame = self.command_frame(reg);
        trace!("write {} <- {}", R::NAME, frame.value());

        self.i2c
            .write(DEVICE_ADDR, frame.as_bytes())
            .map_err(transfer_error(R::NAME))?;
        self.delay.delay_ms(R::SETTLE_MS);

        Ok(())
    }

    fn exchange_register<R>(&mut self, reg: R) -> Result<R, Self::Error>
    where
        R: ReadWriteRegister<u16>,
    {
        self.write_register(reg)?;

        let mut response = [0; RESPONSE_LEN];
        self.i2c
            .read(DEVICE_ADDR, &mut response)
            .map_err(transfer_error(R::NAME))?;

        self.decode(response)
    }
}

impl<I, D> AsyncRegisterAccess<u16> for Lc709203fI2cInterface<I, D>
where
    I: AsyncI2c,
    D: AsyncDelayNs,
{
    type Error = Error<I::Error>;

    async fn read_register_async<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister<u16>,
    {
        trace!("select {}", R::NAME);

        self.i2c
            .write(DEVICE_ADDR, &[R::ADDRESS])
            .await
            .map_err(transfer_error(R::NAME))?;
        self.delay.delay_ms(R::SETTLE_MS).await;

        let mut response = [0; RESPONSE_LEN];
        self.i2c
            .read(DEVICE_ADDR, &mut response)
            .await
            .map_err(transfer_error(R::NAME))?;

        self.decode(response)
    }

    async fn write_register_async<R>(&mut self, reg: R) -> Result<(), Self::Error>
    where
        R: Register<u16>,
    {
        let frame = self.command_frame(reg);
        trace!("write {} <- {}", R::NAME, frame.value());

        self.i2c
            .write(DEVICE_ADDR, frame.as_bytes())
            .await
            .map_err(transfer_error(R::NAME))?;
        self.delay.delay_ms(R::SETTLE_MS).await;

        Ok(())
    }

    async fn exchange_register_async<R>(&mut self, reg: R) -> Result<R, Self::Error>
    where
        R: ReadWriteRegister<u16>,
    {
        self.write_register_async(reg).await?;

        let mut response = [0; RESPONSE_LEN];
        self.i2c
            .read(DEVICE_ADDR, &mut response)
            .await
            .map_err(transfer_error(R::NAME))?;

        self.decode(response)
    }
}
