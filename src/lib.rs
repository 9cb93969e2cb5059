//! Platform-agnostic driver for the MPL3115A2 barometric pressure, altitude and
//! temperature sensor, based on the [`embedded-hal`] 1.0 blocking traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub use error::CustomError;

mod conversion;
mod error;

const DEVICE_ADDRESS: u8 = 0b110_0000;
const DEVICE_IDENTIFIER: u8 = 0xC4;
const POLL_INTERVAL_MS: u32 = 10;

enum RegisterMap {
    Status = 0x00,
    PressureDataOut = 0x01,
    TemperatureDataOut = 0x04,
    WhoAmI = 0x0C,
    DataEventConfig = 0x13,
    Control1 = 0x26,
    AltitudeOffset = 0x2D,
}

enum Command {
    /// SBYB | OS128 | BAR: active, 128x oversampling, barometric output.
    MeasureBarometer = 0x39,
    /// SBYB | OS128 | ALT: active, 128x oversampling, altimeter output.
    MeasureAltimeter = 0xB9,
    /// TDEFE | PDEFE | DREM: raise the data-ready flags for both conversions.
    EnableDataReadyEvents = 0x07,
}

#[derive(Clone, Copy)]
enum StatusFlag {
    PressureDataReady = 0x04,
    TemperatureDataReady = 0x02,
}

pub trait Common<T: I2c> {
    fn id(&mut self) -> Result<u8, CustomError<T::Error>>;

    fn test_connection(&mut self) -> Result<(), CustomError<T::Error>> {
        match self.id() {
            Ok(DEVICE_IDENTIFIER) => Ok(()),
            Err(error) => Err(error),
            _ => Err(CustomError::InvalidDeviceIdentifier),
        }
    }
}

pub struct MPL3115A2<T, D> {
    address: u8,
    i2c: T,
    delay: D,
}

/// A sensor whose identity has been verified and which is armed for continuous
/// conversions with data-ready events enabled.
pub struct InitializedMPL3115A2<T, D> {
    inner: MPL3115A2<T, D>,
    poll_limit: Option<u32>,
}

impl<T: I2c, D: DelayNs> Common<T> for MPL3115A2<T, D> {
    fn id(&mut self) -> Result<u8, CustomError<T::Error>> {
        self.read_register(RegisterMap::WhoAmI)
    }
}

impl<T: I2c, D: DelayNs> Common<T> for InitializedMPL3115A2<T, D> {
    fn id(&mut self) -> Result<u8, CustomError<T::Error>> {
        self.inner.read_register(RegisterMap::WhoAmI)
    }
}

impl<T: I2c, D: DelayNs> MPL3115A2<T, D> {
    pub fn new(i2c: T, delay: D) -> Self {
        Self {
            address: DEVICE_ADDRESS,
            delay,
            i2c,
        }
    }

    /// Verifies the device identity, then arms continuous conversions in altimeter
    /// mode at maximum oversampling and enables the data-ready event flags.
    ///
    /// Fails with [`CustomError::InvalidDeviceIdentifier`] when another (or no)
    /// device answers at the configured address; no registers are written in that case.
    pub fn initialize(mut self) -> Result<InitializedMPL3115A2<T, D>, CustomError<T::Error>> {
        self.test_connection()?;

        self.write_register(RegisterMap::Control1, Command::MeasureAltimeter as u8)?;
        self.write_register(RegisterMap::DataEventConfig, Command::EnableDataReadyEvents as u8)?;

        Ok(InitializedMPL3115A2 { inner: self, poll_limit: None })
    }

    pub fn release(self) -> (T, D) {
        (self.i2c, self.delay)
    }

    fn read_register(&mut self, register: RegisterMap) -> Result<u8, CustomError<T::Error>> {
        Ok(self.read_exactly::<1>(register)?[0])
    }

    fn read_exactly<const BYTES: usize>(&mut self, register: RegisterMap) -> Result<[u8; BYTES], CustomError<T::Error>> {
        let mut buffer = [0u8; BYTES];

        self.i2c.write_read(self.address, &[register as u8], &mut buffer)?;

        Ok(buffer)
    }

    fn write_register(&mut self, register: RegisterMap, data: u8) -> Result<(), CustomError<T::Error>> {
        self.i2c.write(self.address, &[register as u8, data])?;

        Ok(())
    }
}

impl<T: I2c, D: DelayNs> InitializedMPL3115A2<T, D> {
    /// Reads the barometric pressure in kPa.
    pub fn pressure(&mut self) -> Result<f32, CustomError<T::Error>> {
        self.inner.write_register(RegisterMap::Control1, Command::MeasureBarometer as u8)?;
        self.await_data_ready(StatusFlag::PressureDataReady)?;

        Ok(conversion::pressure_kpa(self.inner.read_exactly(RegisterMap::PressureDataOut)?))
    }

    /// Reads the altitude in meters. Negative readings are sign-extended from the
    /// device's 20-bit representation.
    pub fn altitude(&mut self) -> Result<f32, CustomError<T::Error>> {
        self.inner.write_register(RegisterMap::Control1, Command::MeasureAltimeter as u8)?;
        self.await_data_ready(StatusFlag::PressureDataReady)?;

        Ok(conversion::altitude_meters(self.inner.read_exactly(RegisterMap::PressureDataOut)?))
    }

    /// Reads the temperature in degrees Celsius.
    ///
    /// Temperature conversions run as part of the continuous sampling armed during
    /// initialization, so no mode write is needed before polling.
    pub fn temperature(&mut self) -> Result<f32, CustomError<T::Error>> {
        self.await_data_ready(StatusFlag::TemperatureDataReady)?;

        Ok(conversion::temperature_celsius(self.inner.read_exactly(RegisterMap::TemperatureDataOut)?))
    }

    pub fn read_all_data(&mut self) -> Result<(f32, f32, f32), CustomError<T::Error>> {
        let pressure = self.pressure()?;
        let altitude = self.altitude()?;
        let temperature = self.temperature()?;

        Ok((pressure, altitude, temperature))
    }

    /// Writes the device-internal altitude trim, in whole meters.
    pub fn set_altitude_offset(&mut self, meters: i8) -> Result<(), CustomError<T::Error>> {
        self.inner.write_register(RegisterMap::AltitudeOffset, meters as u8)
    }

    /// Bounds the data-ready polling loop to `Some(limit)` status reads, after which a
    /// measurement fails with [`CustomError::ConversionTimeout`]. `None` (the default)
    /// polls indefinitely, blocking until the device asserts readiness.
    pub fn set_poll_limit(&mut self, limit: Option<u32>) {
        self.poll_limit = limit;
    }

    pub fn set_address(&mut self, address: u8) {
        self.inner.address = address;
    }

    pub fn release(self) -> (T, D) {
        self.inner.release()
    }

    fn await_data_ready(&mut self, flag: StatusFlag) -> Result<(), CustomError<T::Error>> {
        let mut polls = 0;

        loop {
            let status = self.inner.read_register(RegisterMap::Status)?;

            if status & flag as u8 != 0 {
                return Ok(());
            }

            if let Some(limit) = self.poll_limit {
                polls += 1;

                if polls >= limit {
                    return Err(CustomError::ConversionTimeout);
                }
            }

            self.inner.delay.delay_ms(POLL_INTERVAL_MS);
        }
    }
}
