use embedded_hal::{delay::DelayNs, i2c::I2c};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    device::{Device, Value},
    tsl2561::{Error, Tsl2561},
};

/// Values published by the TSL2561, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(usize)]
pub enum ValueIndex {
    Lux = 0,
}

impl<I2C: I2c, DELAY: DelayNs> Device for Tsl2561<I2C, DELAY> {
    type Error = Error<I2C::Error>;

    const NAME: &'static str = "TSL2561";
    const TYPE: &'static str = "sensor";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    const VALUE_NAMES: &'static [&'static str] = &["lux"];
    const VALUE_TYPES: &'static [&'static str] = &["integer"];

    fn is_active(&self) -> bool {
        Tsl2561::is_active(self)
    }

    fn value_at_index(&mut self, index: usize) -> Result<Value, Self::Error> {
        if !Tsl2561::is_active(self) {
            return Err(Error::Inactive);
        }
        match ValueIndex::try_from(index).map_err(|_| Error::IndexOutOfRange(index))? {
            ValueIndex::Lux => Ok(Value::Integer(self.lux()?)),
        }
    }
}
