//! # Driver for the TSL2561 Light-to-Digital Converter
//!
//! The TSL2561 integrates two photodiodes, a broadband one (visible and infrared) and an
//! infrared-only one, and exposes both counts over I2C.  This driver powers the part only while
//! it is working: every register access is bracketed by a power-on and a power-off write.
//!
//! Typical usage:
//!
//! 1. Create an instance through [`DriverUsingDelay::new`], optionally with
//!    [`Tsl2561::with_config`]
//! 2. Verify and configure the hardware with [`DriverUsingDelay::init`] or [`Tsl2561::initialize`]
//! 3. Read illuminance with [`Tsl2561::lux`]
//!
//! ## External Links
//!
//! - [Datasheet]
//! - [Alternate Driver]
//!
//! [Datasheet]: https://ams.com/tsl2561
//! [Alternate Driver]: https://github.com/celaus/rust-tsl2561

use embedded_hal::{delay::DelayNs, i2c::I2c};
use log::warn;

use crate::{DriverUsingDelay, WhoAmI};

pub mod agc;
pub mod config;
mod device;
#[cfg(feature = "linux")]
mod linux;
pub mod lux;
mod whoami;

pub use agc::Acquire;
pub use config::{Config, Gain, IntegrationTime, Settings};
pub use device::ValueIndex;
#[cfg(feature = "linux")]
pub use linux::OpenError;

/// Address with the ADDR SEL pin tied to ground
pub const ADDR_LOW: u8 = 0x29;
/// Address with the ADDR SEL pin left floating
pub const ADDR_FLOAT: u8 = 0x39;
/// Address with the ADDR SEL pin tied to VDD
pub const ADDR_HIGH: u8 = 0x49;

const COMMAND_BIT: u8 = 0x80;
const WORD_BIT: u8 = 0x20;

const REG_CONTROL: u8 = 0x00;
const REG_TIMING: u8 = 0x01;
const REG_CHAN0_LOW: u8 = 0x0C;
const REG_CHAN1_LOW: u8 = 0x0E;

const CONTROL_POWERON: u8 = 0x03;
const CONTROL_POWEROFF: u8 = 0x00;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    I2cError(E),
    /// The identity register did not carry the expected bits.
    UnexpectedDevice(u8),
    /// The driver has not passed identity verification.  No bus access was attempted.
    Inactive,
    /// No value is published at this index.
    IndexOutOfRange(usize),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2cError(error)
    }
}

/// Both channel counts from a single conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RawSample {
    /// Channel 0, visible and infrared
    pub broadband: u16,
    /// Channel 1, infrared only
    pub infrared: u16,
}

impl RawSample {
    #[must_use]
    pub const fn new(broadband: u16, infrared: u16) -> Self {
        Self {
            broadband,
            infrared,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Uninitialized,
    Active,
    /// Identity verification failed.  Terminal.
    Inactive,
}

pub struct Tsl2561<I2C, DELAY> {
    i2c: I2C,
    address: u8,
    delay: DELAY,
    config: Config,
    settings: Settings,
    state: State,
}

impl<I2C: I2c, DELAY: DelayNs> DriverUsingDelay<I2C, DELAY, Error<I2C::Error>>
    for Tsl2561<I2C, DELAY>
{
    fn new_inner(i2c: I2C, address: u8, delay: DELAY) -> Self {
        let config = Config::default();
        Self {
            i2c,
            address,
            delay,
            config,
            settings: Settings::reset(config.auto_gain),
            state: State::Uninitialized,
        }
    }

    fn init_inner(mut self) -> Result<Self, Error<I2C::Error>> {
        self.initialize()?;
        Ok(self)
    }
}

impl<I2C: I2c, DELAY> Tsl2561<I2C, DELAY> {
    fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut data: [u8; 1] = [0];
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | register], &mut data)?;
        Ok(data[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c
            .write(self.address, &[COMMAND_BIT | register, value])
    }

    /// Low byte at `register`, high byte at `register + 1`.
    fn read_word(&mut self, register: u8) -> Result<u16, I2C::Error> {
        let low = self.read_register(WORD_BIT | register)?;
        let high = self.read_register(WORD_BIT | (register + 1))?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

impl<I2C: I2c, DELAY: DelayNs> Tsl2561<I2C, DELAY> {
    /// Replaces the configuration applied by [`Tsl2561::initialize`].
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.settings.auto_gain = config.auto_gain;
        self
    }

    /// Verifies the identity register, applies the configured gain and the longest integration
    /// time, and leaves the part powered down.
    ///
    /// A failure of any kind leaves the driver permanently inactive: later calls return
    /// [`Error::Inactive`] without touching the bus.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedDevice`] when the identity check fails, [`Error::I2cError`] on bus
    /// failure, [`Error::Inactive`] if a previous attempt already failed.
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        if self.state == State::Inactive {
            return Err(Error::Inactive);
        }
        let gain = self.config.gain;
        let result = self.powered(|tsl| {
            let id = tsl.whoami()?;
            if !<Self as WhoAmI<I2C, u8>>::is_expected(&id) {
                return Err(Error::UnexpectedDevice(id));
            }
            tsl.apply_gain(gain)?;
            tsl.apply_integration_time(IntegrationTime::Ms402)
        });
        match result {
            Ok(()) => self.state = State::Active,
            Err(ref error) => {
                warn!(
                    "TSL2561 at {:#04x} did not initialize ({:?}) and is inactive",
                    self.address, error
                );
                self.state = State::Inactive;
            }
        }
        result
    }

    /// Whether identity verification passed.
    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn gain(&self) -> Gain {
        self.settings.gain
    }

    pub fn integration_time(&self) -> IntegrationTime {
        self.settings.integration_time
    }

    pub fn auto_gain(&self) -> bool {
        self.settings.auto_gain
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn set_auto_gain(&mut self, auto_gain: bool) {
        self.settings.auto_gain = auto_gain;
    }

    /// Powers the part up.
    ///
    /// # Errors
    pub fn enable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure_active()?;
        self.power(true)?;
        Ok(())
    }

    /// Powers the part down.
    ///
    /// # Errors
    pub fn disable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure_active()?;
        self.power(false)?;
        Ok(())
    }

    /// Writes the gain alongside the current integration time.
    ///
    /// # Errors
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I2C::Error>> {
        self.ensure_active()?;
        self.apply_gain(gain)
    }

    /// Writes the integration time alongside the current gain.
    ///
    /// # Errors
    pub fn set_integration_time(
        &mut self,
        integration_time: IntegrationTime,
    ) -> Result<(), Error<I2C::Error>> {
        self.ensure_active()?;
        self.apply_integration_time(integration_time)
    }

    /// Runs a single conversion at the current settings.
    ///
    /// # Errors
    pub fn read_raw(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        self.ensure_active()?;
        self.sample()
    }

    /// Runs conversions until a trustworthy sample is held, switching gain at most once when
    /// auto-gain is enabled.
    ///
    /// # Errors
    pub fn luminosity(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        self.ensure_active()?;
        agc::acquire_with_auto_gain(self)
    }

    /// Measures illuminance in lux.  Saturated readings report [`lux::MAX_LUX`].
    ///
    /// # Errors
    pub fn lux(&mut self) -> Result<u32, Error<I2C::Error>> {
        let sample = self.luminosity()?;
        Ok(lux::calculate_lux(
            sample,
            self.settings.integration_time,
            self.settings.gain,
        ))
    }

    fn ensure_active(&self) -> Result<(), Error<I2C::Error>> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::Inactive)
        }
    }

    fn power(&mut self, on: bool) -> Result<(), I2C::Error> {
        let control = if on {
            CONTROL_POWERON
        } else {
            CONTROL_POWEROFF
        };
        self.write_register(REG_CONTROL, control)
    }

    /// Runs `f` with the part powered up.  The power-down write happens on every exit path; an
    /// error from `f` takes precedence over one from powering down.
    fn powered<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error<I2C::Error>>,
    ) -> Result<T, Error<I2C::Error>> {
        self.power(true)?;
        let result = f(self);
        let off = self.power(false);
        let value = result?;
        off?;
        Ok(value)
    }

    fn write_timing(
        &mut self,
        integration_time: IntegrationTime,
        gain: Gain,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_register(REG_TIMING, Settings::timing(integration_time, gain))?;
        self.settings.integration_time = integration_time;
        self.settings.gain = gain;
        Ok(())
    }

    fn apply_gain(&mut self, gain: Gain) -> Result<(), Error<I2C::Error>> {
        let integration_time = self.settings.integration_time;
        self.powered(|tsl| tsl.write_timing(integration_time, gain))
    }

    fn apply_integration_time(
        &mut self,
        integration_time: IntegrationTime,
    ) -> Result<(), Error<I2C::Error>> {
        let gain = self.settings.gain;
        self.powered(|tsl| tsl.write_timing(integration_time, gain))
    }

    fn sample(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        let settle = self.settings.integration_time.settle_time();
        self.powered(|tsl| {
            tsl.delay.delay_ms(settle.ticks());
            let broadband = tsl.read_word(REG_CHAN0_LOW)?;
            let infrared = tsl.read_word(REG_CHAN1_LOW)?;
            Ok(RawSample::new(broadband, infrared))
        })
    }
}

impl<I2C: I2c, DELAY: DelayNs> Acquire for Tsl2561<I2C, DELAY> {
    type Error = Error<I2C::Error>;

    fn auto_gain(&self) -> bool {
        self.settings.auto_gain
    }

    fn gain(&self) -> Gain {
        self.settings.gain
    }

    fn integration_time(&self) -> IntegrationTime {
        self.settings.integration_time
    }

    fn set_gain(&mut self, gain: Gain) -> Result<(), Self::Error> {
        self.apply_gain(gain)
    }

    fn acquire(&mut self) -> Result<RawSample, Self::Error> {
        self.sample()
    }
}
