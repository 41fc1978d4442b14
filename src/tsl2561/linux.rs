use std::path::Path;

use linux_embedded_hal::{i2cdev::linux::LinuxI2CError, Delay, I2cdev};

use crate::{
    tsl2561::{Config, Tsl2561},
    DriverUsingDelay, OutOfRange,
};

#[derive(Debug)]
pub enum OpenError {
    Bus(LinuxI2CError),
    Address(OutOfRange),
}

impl Tsl2561<I2cdev, Delay> {
    /// Opens the sensor on an i2c-dev bus such as `/dev/i2c-1` and initializes it.
    ///
    /// The driver is returned even when initialization fails; check [`Tsl2561::is_active`].
    ///
    /// # Errors
    ///
    /// [`OpenError::Bus`] if the device file cannot be opened, [`OpenError::Address`] if
    /// `address` is outside `0x08..=0x77`.
    pub fn open<P: AsRef<Path>>(path: P, address: u8, config: Config) -> Result<Self, OpenError> {
        let i2c = I2cdev::new(path).map_err(OpenError::Bus)?;
        let mut tsl = Self::new(i2c, address, Delay)
            .map_err(OpenError::Address)?
            .with_config(config);
        // failure is logged and leaves the driver inactive
        tsl.initialize().ok();
        Ok(tsl)
    }
}
