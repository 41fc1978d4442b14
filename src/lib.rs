#![no_std]
#![doc = include_str!("../README.md")]

#[cfg(feature = "linux")]
extern crate std;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Devices that identify themselves through a register.
pub trait WhoAmI<I2C: I2c, T: core::cmp::Eq> {
    const EXPECTED_WHOAMI: T;

    fn whoami(&mut self) -> Result<T, I2C::Error>;

    /// Whether `id`, as read by [`WhoAmI::whoami`], identifies the expected device.  Defaults to
    /// an exact match against [`WhoAmI::EXPECTED_WHOAMI`].
    fn is_expected(id: &T) -> bool {
        *id == Self::EXPECTED_WHOAMI
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct OutOfRange;

pub trait DriverUsingDelay<I2C: I2c, DELAY: DelayNs, T> {
    fn address_check(address: u8) -> Result<(), OutOfRange> {
        if (0x08..=0x77).contains(&address) {
            Ok(())
        } else {
            Err(OutOfRange)
        }
    }

    fn new_inner(i2c: I2C, address: u8, delay: DELAY) -> Self;

    /// The entry point for a [`DriverUsingDelay`].  Expects [`I2c`] (obtainable from target
    /// platform HAL), an I2C device address in the range `0x08..=0x77` and a [`DelayNs`] (also
    /// usually obtainable from the target platform HAL).  This provides a handle that does not
    /// initialize the hardware.  Initialization is deferred to [`DriverUsingDelay::init`].
    ///
    /// # Errors
    ///
    /// [`OutOfRange`]: address is outside of the allowed range `0x08..=0x77`
    fn new(i2c: I2C, address: u8, delay: DELAY) -> Result<Self, OutOfRange>
    where
        Self: Sized,
    {
        Self::address_check(address)?;
        Ok(Self::new_inner(i2c, address, delay))
    }

    fn init_inner(self) -> Result<Self, T>
    where
        Self: Sized,
    {
        Ok(self)
    }

    /// Initializes the hardware.  Measurements are refused until initialization succeeds.
    ///
    /// # Errors
    ///
    /// `T`: a device dependent error type for any problems encountered during initialization.
    fn init(self) -> Result<Self, T>
    where
        Self: Sized,
    {
        self.init_inner()
    }
}

pub mod device;
pub mod tsl2561;
