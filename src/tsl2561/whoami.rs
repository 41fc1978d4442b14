use crate::{tsl2561::Tsl2561, WhoAmI};
use embedded_hal::i2c::I2c;

const REG_ID: u8 = 0x0A;

impl<I2C: I2c, DELAY> WhoAmI<I2C, u8> for Tsl2561<I2C, DELAY> {
    const EXPECTED_WHOAMI: u8 = 0x0A;

    fn whoami(&mut self) -> Result<u8, I2C::Error> {
        self.read_register(REG_ID)
    }

    /// Part and revision numbers share the register, so only the identifying bits are checked.
    fn is_expected(id: &u8) -> bool {
        id & Self::EXPECTED_WHOAMI != 0
    }
}
