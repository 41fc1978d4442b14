//! Auto-gain acquisition.
//!
//! A sample whose broadband count falls outside the trustworthy window for the current
//! integration time triggers one gain switch.  The conversion that was running under the old
//! gain is flushed and the next sample is taken as is, even if it is still out of range, so a
//! request never costs more than three acquisitions and cannot oscillate between 1x and 16x.

use log::{debug, trace};

use super::{Gain, IntegrationTime, RawSample};

/// Broadband window inside which a sample is kept without touching the gain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Thresholds {
    pub high: u16,
    pub low: u16,
}

/// Window for an integration time.  Each `high` sits below the saturation count (5047, 37177
/// and 65535 respectively).
#[must_use]
pub const fn thresholds(integration_time: IntegrationTime) -> Thresholds {
    match integration_time {
        IntegrationTime::Ms13 => Thresholds {
            high: 4850,
            low: 100,
        },
        IntegrationTime::Ms101 => Thresholds {
            high: 36000,
            low: 200,
        },
        IntegrationTime::Ms402 => Thresholds {
            high: 63000,
            low: 500,
        },
    }
}

/// Something that produces raw samples and lets its gain be switched.
pub trait Acquire {
    type Error;

    fn auto_gain(&self) -> bool;
    fn gain(&self) -> Gain;
    fn integration_time(&self) -> IntegrationTime;
    fn set_gain(&mut self, gain: Gain) -> Result<(), Self::Error>;
    /// Runs one complete conversion and returns both channels.
    fn acquire(&mut self) -> Result<RawSample, Self::Error>;
}

/// Acquires one sample, switching the gain at most once.
///
/// # Errors
///
/// Whatever the source reports while acquiring or switching gain.
pub fn acquire_with_auto_gain<A: Acquire>(source: &mut A) -> Result<RawSample, A::Error> {
    if !source.auto_gain() {
        return source.acquire();
    }

    let mut adjusted = false;
    loop {
        let Thresholds { high, low } = thresholds(source.integration_time());
        let sample = source.acquire()?;
        trace!("sample {:?} at {:?}", sample, source.gain());
        if adjusted {
            return Ok(sample);
        }

        let gain = match source.gain() {
            Gain::X1 if sample.broadband < low => Gain::X16,
            Gain::X16 if sample.broadband > high => Gain::X1,
            _ => return Ok(sample),
        };
        debug!(
            "broadband {} outside {}..={}, switching to {:?}",
            sample.broadband, low, high, gain
        );
        source.set_gain(gain)?;
        // drop the conversion started under the previous gain
        source.acquire()?;
        adjusted = true;
    }
}
