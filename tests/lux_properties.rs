use ambient_light::tsl2561::lux::{
    calculate_lux, channel_ratio, clip_threshold, segment_index, CALIBRATION, MAX_LUX,
};
use ambient_light::tsl2561::{Gain, IntegrationTime, RawSample};
use proptest::prelude::*;

fn integration_time() -> impl Strategy<Value = IntegrationTime> {
    prop_oneof![
        Just(IntegrationTime::Ms13),
        Just(IntegrationTime::Ms101),
        Just(IntegrationTime::Ms402),
    ]
}

fn gain() -> impl Strategy<Value = Gain> {
    prop_oneof![Just(Gain::X1), Just(Gain::X16)]
}

proptest! {
    #[test]
    fn saturated_broadband_reports_max(
        time in integration_time(),
        gain in gain(),
        excess in 1_u16..=4096,
        infrared: u16,
    ) {
        let broadband = clip_threshold(time).saturating_add(excess);
        prop_assume!(broadband > clip_threshold(time));
        prop_assert_eq!(calculate_lux(RawSample::new(broadband, infrared), time, gain), MAX_LUX);
    }

    #[test]
    fn saturated_infrared_reports_max(
        time in integration_time(),
        gain in gain(),
        broadband: u16,
        excess in 1_u16..=4096,
    ) {
        let infrared = clip_threshold(time).saturating_add(excess);
        prop_assume!(infrared > clip_threshold(time));
        prop_assert_eq!(calculate_lux(RawSample::new(broadband, infrared), time, gain), MAX_LUX);
    }

    #[test]
    fn unsaturated_is_deterministic_and_bounded(
        time in integration_time(),
        gain in gain(),
        broadband: u16,
        infrared: u16,
    ) {
        let clip = clip_threshold(time);
        let sample = RawSample::new(broadband.min(clip), infrared.min(clip));
        let lux = calculate_lux(sample, time, gain);
        prop_assert_eq!(lux, calculate_lux(sample, time, gain));
        prop_assert!(lux < MAX_LUX * 4);
    }

    #[test]
    fn segment_selection_is_monotonic(a: u32, b: u32) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(segment_index(low) <= segment_index(high));
        prop_assert!(segment_index(high) < CALIBRATION.len());
    }

    #[test]
    fn ratio_grows_with_infrared(channel0 in 1_u32..2_000_000, channel1 in 0_u32..2_000_000) {
        prop_assert!(channel_ratio(channel0, channel1) <= channel_ratio(channel0, channel1 + 1));
    }
}

#[test]
fn worked_example() {
    assert_eq!(
        calculate_lux(
            RawSample::new(1000, 500),
            IntegrationTime::Ms402,
            Gain::X16
        ),
        7
    );
    assert_eq!(
        calculate_lux(
            RawSample::new(u16::MAX, 0),
            IntegrationTime::Ms402,
            Gain::X16
        ),
        MAX_LUX
    );
}
