use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Represents custom errors that can occur during MPL3115A2 operations.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CustomError<T> {
    /// Indicates that the device identifier read from the sensor does not match the expected value.
    InvalidDeviceIdentifier,

    /// Indicates that a conversion did not signal completion within the configured poll limit.
    /// Only reachable when a poll limit has been set; by default the driver polls indefinitely.
    ConversionTimeout,

    /// Represents an I2C communication error encapsulating the inner error type `T`.
    I2c(T),
}

impl<T> Display for CustomError<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomError::InvalidDeviceIdentifier => write!(formatter, "Invalid device identifier."),
            CustomError::ConversionTimeout => write!(formatter, "Conversion did not complete within the poll limit."),
            CustomError::I2c(_) => write!(formatter, "I2C communication error."),
        }
    }
}

impl<T: Debug> Error for CustomError<T> {}

impl<T> From<T> for CustomError<T> {
    fn from(error: T) -> Self {
        CustomError::I2c(error)
    }
}
