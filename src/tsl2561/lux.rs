//! Fixed-point lux approximation for the T, FN and CL packages.
//!
//! Both channels are normalised to a 16x gain, 402ms baseline, their ratio selects a
//! [`CalibrationSegment`], and the segment's coefficients weigh the channels against each other.
//! All arithmetic is integer so a given sample always yields the same value.

use log::debug;

use super::{Gain, IntegrationTime, RawSample};

/// Returned when either channel is saturated.
pub const MAX_LUX: u32 = 21001;

const LUX_SCALE: u32 = 14;
const RATIO_SCALE: u32 = 9;
const CH_SCALE: u32 = 10;
// 322/11 * 2^CH_SCALE
const CH_SCALE_TINT0: u32 = 0x7517;
// 322/81 * 2^CH_SCALE
const CH_SCALE_TINT1: u32 = 0x0FE7;

/// One piece of the piecewise-linear model.  `k` is in units of 2^-9, `b` and `m` in units of
/// 2^-14.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct CalibrationSegment {
    pub k: u32,
    pub b: u32,
    pub m: u32,
}

const fn segment(k: u32, b: u32, m: u32) -> CalibrationSegment {
    CalibrationSegment { k, b, m }
}

/// Segments ordered by increasing ratio threshold.  The first segment whose `k` is not below the
/// ratio applies.
pub const CALIBRATION: [CalibrationSegment; 8] = [
    // 0.125, 0.0304, 0.0272
    segment(0x0040, 0x01f2, 0x01be),
    // 0.250, 0.0325, 0.0440
    segment(0x0080, 0x0214, 0x02d1),
    // 0.375, 0.0351, 0.0544
    segment(0x00c0, 0x023f, 0x037b),
    // 0.50, 0.0381, 0.0624
    segment(0x0100, 0x0270, 0x03fe),
    // 0.61, 0.0224, 0.0310
    segment(0x0138, 0x016f, 0x01fc),
    // 0.80, 0.0128, 0.0153
    segment(0x019a, 0x00d2, 0x00fb),
    // 1.3, 0.00146, 0.00112
    segment(0x029a, 0x0018, 0x0012),
    // above 1.3 the visible component is negligible
    segment(0x029a, 0x0000, 0x0000),
];

/// Channel counts above this are treated as saturated.
#[must_use]
pub const fn clip_threshold(integration_time: IntegrationTime) -> u16 {
    match integration_time {
        IntegrationTime::Ms13 => 4900,
        IntegrationTime::Ms101 => 37000,
        IntegrationTime::Ms402 => 65000,
    }
}

/// Multiplier (in units of 2^-10) that brings raw counts to the 16x, 402ms baseline.
#[must_use]
pub const fn channel_scale(integration_time: IntegrationTime, gain: Gain) -> u32 {
    let scale = match integration_time {
        IntegrationTime::Ms13 => CH_SCALE_TINT0,
        IntegrationTime::Ms101 => CH_SCALE_TINT1,
        IntegrationTime::Ms402 => 1 << CH_SCALE,
    };
    match gain {
        Gain::X1 => scale << 4,
        Gain::X16 => scale,
    }
}

/// Rounded infrared to broadband ratio in units of 2^-9.  A dark broadband channel gives 0.
#[must_use]
pub const fn channel_ratio(channel0: u32, channel1: u32) -> u32 {
    let ratio = if channel0 == 0 {
        0
    } else {
        (channel1 << (RATIO_SCALE + 1)) / channel0
    };
    (ratio + 1) >> 1
}

/// Index into [`CALIBRATION`] for a ratio from [`channel_ratio`].
#[must_use]
pub fn segment_index(ratio: u32) -> usize {
    CALIBRATION
        .iter()
        .position(|segment| ratio <= segment.k)
        .unwrap_or(CALIBRATION.len() - 1)
}

fn apply_segment(channel0: u32, channel1: u32, segment: &CalibrationSegment) -> u32 {
    // never negative
    let lux = (channel0 * segment.b).saturating_sub(channel1 * segment.m);
    (lux + (1 << (LUX_SCALE - 1))) >> LUX_SCALE
}

/// Converts a sample taken at `integration_time` and `gain` into lux.
#[must_use]
pub fn calculate_lux(sample: RawSample, integration_time: IntegrationTime, gain: Gain) -> u32 {
    let clip = u32::from(clip_threshold(integration_time));
    let broadband = u32::from(sample.broadband);
    let infrared = u32::from(sample.infrared);
    if broadband > clip || infrared > clip {
        debug!("saturated at {:?}: {:?}", integration_time, sample);
        return MAX_LUX;
    }

    let scale = channel_scale(integration_time, gain);
    let channel0 = (broadband * scale) >> CH_SCALE;
    let channel1 = (infrared * scale) >> CH_SCALE;

    let segment = &CALIBRATION[segment_index(channel_ratio(channel0, channel1))];
    apply_segment(channel0, channel1, segment)
}

#[cfg(all(test, not(all(target_arch = "arm", target_os = "none"))))]
mod test {
    use super::{
        apply_segment, calculate_lux, channel_ratio, channel_scale, segment_index, CALIBRATION,
        MAX_LUX,
    };
    use crate::tsl2561::{Gain, IntegrationTime, RawSample};

    #[test]
    pub fn golden_402ms_16x() {
        let sample = RawSample::new(1000, 500);
        assert_eq!(channel_ratio(1000, 500), 256);
        assert_eq!(segment_index(256), 3);
        assert_eq!(calculate_lux(sample, IntegrationTime::Ms402, Gain::X16), 7);
    }

    #[test]
    pub fn golden_402ms_1x() {
        let sample = RawSample::new(1000, 100);
        assert_eq!(
            calculate_lux(sample, IntegrationTime::Ms402, Gain::X1),
            443
        );
    }

    #[test]
    pub fn golden_101ms_16x() {
        let sample = RawSample::new(1000, 200);
        assert_eq!(
            calculate_lux(sample, IntegrationTime::Ms101, Gain::X16),
            94
        );
    }

    #[test]
    pub fn golden_13ms_16x() {
        let sample = RawSample::new(100, 10);
        assert_eq!(calculate_lux(sample, IntegrationTime::Ms13, Gain::X16), 81);
    }

    #[test]
    pub fn dark() {
        let sample = RawSample::new(0, 0);
        assert_eq!(calculate_lux(sample, IntegrationTime::Ms402, Gain::X1), 0);
        assert_eq!(channel_ratio(0, 500), 0);
    }

    #[test]
    pub fn clipping_is_exclusive() {
        assert_eq!(
            calculate_lux(
                RawSample::new(65000, 0),
                IntegrationTime::Ms402,
                Gain::X16
            ),
            1976
        );
        assert_eq!(
            calculate_lux(
                RawSample::new(65001, 0),
                IntegrationTime::Ms402,
                Gain::X16
            ),
            MAX_LUX
        );
    }

    #[test]
    pub fn saturated_infrared() {
        assert_eq!(
            calculate_lux(
                RawSample::new(100, 4901),
                IntegrationTime::Ms13,
                Gain::X1
            ),
            MAX_LUX
        );
        assert_eq!(
            calculate_lux(
                RawSample::new(37001, 10),
                IntegrationTime::Ms101,
                Gain::X16
            ),
            MAX_LUX
        );
    }

    #[test]
    pub fn scale_for_gain() {
        assert_eq!(channel_scale(IntegrationTime::Ms402, Gain::X16), 1024);
        assert_eq!(channel_scale(IntegrationTime::Ms402, Gain::X1), 16384);
        assert_eq!(channel_scale(IntegrationTime::Ms13, Gain::X16), 0x7517);
        assert_eq!(channel_scale(IntegrationTime::Ms101, Gain::X1), 0x0FE7 << 4);
    }

    #[test]
    pub fn segment_boundaries() {
        assert_eq!(segment_index(0), 0);
        assert_eq!(segment_index(0x40), 0);
        assert_eq!(segment_index(0x41), 1);
        assert_eq!(segment_index(0x29a), 6);
        assert_eq!(segment_index(0x29b), 7);
        assert_eq!(segment_index(u32::MAX), 7);
    }

    #[test]
    pub fn negative_lux_clamps_to_zero() {
        assert_eq!(apply_segment(1, 100, &CALIBRATION[0]), 0);
    }

    #[test]
    pub fn infrared_only_light() {
        // ratio above 1.3 selects the zero segment
        let sample = RawSample::new(100, 200);
        assert_eq!(calculate_lux(sample, IntegrationTime::Ms402, Gain::X16), 0);
    }
}
