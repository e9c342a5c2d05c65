#![no_std]
#![allow(async_fn_in_trait)]

use device_descriptor::{ReadOnlyRegister, ReadWriteRegister, Register, RegisterWidthType};

pub trait RegisterReader<RWT>: Sized
where
    RWT: RegisterWidthType,
{
    fn read<E>(iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E>;
}

pub trait AsyncRegisterReader<RWT>: Sized
where
    RWT: RegisterWidthType,
{
    async fn read_async<E>(iface: &mut impl AsyncRegisterAccess<RWT, Error = E>)
        -> Result<Self, E>;
}

pub trait RegisterWriter<RWT>
where
    RWT: RegisterWidthType,
{
    fn write<E>(self, iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<(), E>;
}

pub trait AsyncRegisterWriter<RWT>
where
    RWT: RegisterWidthType,
{
    async fn write_async<E>(
        self,
        iface: &mut impl AsyncRegisterAccess<RWT, Error = E>,
    ) -> Result<(), E>;
}

pub trait RegisterExchanger<RWT>: Sized
where
    RWT: RegisterWidthType,
{
    fn exchange<E>(self, iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E>;
}

pub trait AsyncRegisterExchanger<RWT>: Sized
where
    RWT: RegisterWidthType,
{
    async fn exchange_async<E>(
        self,
        iface: &mut impl AsyncRegisterAccess<RWT, Error = E>,
    ) -> Result<Self, E>;
}

impl<RWT, T> RegisterReader<RWT> for T
where
    RWT: RegisterWidthType,
    T: ReadOnlyRegister<RWT>,
{
    fn read<E>(iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E> {
        iface.read_register()
    }
}

impl<RWT, T> AsyncRegisterReader<RWT> for T
where
    RWT: RegisterWidthType,
    T: ReadOnlyRegister<RWT>,
{
    async fn read_async<E>(
        iface: &mut impl AsyncRegisterAccess<RWT, Error = E>,
    ) -> Result<Self, E> {
        iface.read_register_async().await
    }
}

impl<RWT, T> RegisterWriter<RWT> for T
where
    RWT: RegisterWidthType,
    T: Register<RWT>,
{
    fn write<E>(self, iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<(), E> {
        iface.write_register(self)
    }
}

impl<RWT, T> AsyncRegisterWriter<RWT> for T
where
    RWT: RegisterWidthType,
    T: Register<RWT>,
{
    async fn write_async<E>(
        self,
        iface: &mut impl AsyncRegisterAccess<RWT, Error = E>,
    ) -> Result<(), E> {
        iface.write_register_async(self).await
    }
}

impl<RWT, T> RegisterExchanger<RWT> for T
where
    RWT: RegisterWidthType,
    T: ReadWriteRegister<RWT>,
{
    fn exchange<E>(self, iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E> {
        iface.exchange_register(self)
    }
}

impl<RWT, T> AsyncRegisterExchanger<RWT> for T
where
    RWT: RegisterWidthType,
    T: ReadWriteRegister<RWT>,
{
    async fn exchange_async<E>(
        self,
        iface: &mut impl AsyncRegisterAccess<RWT, Error = E>,
    ) -> Result<Self, E> {
        iface.exchange_register_async(self).await
    }
}

pub trait RegisterAccess<RWT>
where
    RWT: RegisterWidthType,
{
    type Error;

    /// Selects the register and reads its value.
    fn read_register<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister<RWT>;

    /// Writes the register without waiting for an answer.
    fn write_register<R>(&mut self, reg: R) -> Result<(), Self::Error>
    where
        R: Register<RWT>;

    /// Writes the register and reads back the value the device reports.
    fn exchange_register<R>(&mut self, reg: R) -> Result<R, Self::Error>
    where
        R: ReadWriteRegister<RWT>;
}

pub trait AsyncRegisterAccess<RWT>
where
    RWT: RegisterWidthType,
{
    type Error;

    async fn read_register_async<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister<RWT>;

    async fn write_register_async<R>(&mut self, reg: R) -> Result<(), Self::Error>
    where
        R: Register<RWT>;

    async fn exchange_register_async<R>(&mut self, reg: R) -> Result<R, Self::Error>
    where
        R: ReadWriteRegister<RWT>;
}
