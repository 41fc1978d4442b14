use fugit::MillisDurationU32;
use num_enum::IntoPrimitive;

/// Conversion time of the ADC.  The value doubles as the low bits of the timing register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, IntoPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum IntegrationTime {
    /// Fast but low resolution
    Ms13 = 0x00,
    /// Medium resolution and speed
    Ms101 = 0x01,
    /// 16-bit data but slowest conversions
    #[default]
    Ms402 = 0x02,
}

impl IntegrationTime {
    /// How long to wait after power-on before the channel registers hold a complete conversion.
    #[must_use]
    pub const fn settle_time(self) -> MillisDurationU32 {
        match self {
            Self::Ms13 => MillisDurationU32::millis(15),
            Self::Ms101 => MillisDurationU32::millis(120),
            Self::Ms402 => MillisDurationU32::millis(450),
        }
    }
}

/// Analog gain.  The value doubles as the gain bit of the timing register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, IntoPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    #[default]
    X1 = 0x00,
    X16 = 0x10,
}

impl Gain {
    /// Maps a gain multiplier onto a supported gain.  Anything other than 16 selects 1x.
    #[must_use]
    pub const fn from_multiplier(multiplier: u8) -> Self {
        match multiplier {
            16 => Self::X16,
            _ => Self::X1,
        }
    }

    #[must_use]
    pub const fn multiplier(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X16 => 16,
        }
    }
}

/// User supplied configuration, applied by [`crate::tsl2561::Tsl2561::initialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    pub gain: Gain,
    pub auto_gain: bool,
}

impl Config {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gain: Gain::X1,
            auto_gain: false,
        }
    }

    #[must_use]
    pub const fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    #[must_use]
    pub const fn with_gain_multiplier(self, multiplier: u8) -> Self {
        self.with_gain(Gain::from_multiplier(multiplier))
    }

    #[must_use]
    pub const fn with_auto_gain(mut self, auto_gain: bool) -> Self {
        self.auto_gain = auto_gain;
        self
    }
}

/// Live sensor state.  `integration_time` and `gain` always mirror the last timing register
/// write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Settings {
    pub integration_time: IntegrationTime,
    pub gain: Gain,
    pub auto_gain: bool,
}

impl Settings {
    /// Power-on reset state of the timing register (402ms, 1x).
    #[must_use]
    pub const fn reset(auto_gain: bool) -> Self {
        Self {
            integration_time: IntegrationTime::Ms402,
            gain: Gain::X1,
            auto_gain,
        }
    }

    /// Timing register byte for an integration time and gain pair.
    #[must_use]
    pub fn timing(integration_time: IntegrationTime, gain: Gain) -> u8 {
        u8::from(integration_time) | u8::from(gain)
    }
}

#[cfg(all(test, not(all(target_arch = "arm", target_os = "none"))))]
mod test {
    use super::{Config, Gain, IntegrationTime, Settings};

    #[test]
    pub fn gain_from_multiplier() {
        assert_eq!(Gain::from_multiplier(16), Gain::X16);
        assert_eq!(Gain::from_multiplier(1), Gain::X1);
        assert_eq!(Gain::from_multiplier(0), Gain::X1);
        assert_eq!(Gain::from_multiplier(8), Gain::X1);
    }

    #[test]
    pub fn timing_byte() {
        assert_eq!(Settings::timing(IntegrationTime::Ms13, Gain::X1), 0x00);
        assert_eq!(Settings::timing(IntegrationTime::Ms101, Gain::X16), 0x11);
        assert_eq!(Settings::timing(IntegrationTime::Ms402, Gain::X16), 0x12);
    }

    #[test]
    pub fn settle_time() {
        assert_eq!(IntegrationTime::Ms13.settle_time().ticks(), 15);
        assert_eq!(IntegrationTime::Ms101.settle_time().ticks(), 120);
        assert_eq!(IntegrationTime::Ms402.settle_time().ticks(), 450);
    }

    #[test]
    pub fn defaults_match_reset_state() {
        assert_eq!(IntegrationTime::default(), IntegrationTime::Ms402);
        assert_eq!(Gain::default(), Gain::X1);
    }

    #[test]
    pub fn config_builder() {
        let config = Config::new().with_gain_multiplier(16).with_auto_gain(true);
        assert_eq!(config.gain, Gain::X16);
        assert!(config.auto_gain);
        assert_eq!(Config::default(), Config::new());
    }
}
