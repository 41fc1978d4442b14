//! Prints the illuminance seen by a TSL2561 once per second.
//!
//! Usage: `read_lux [device] [address]`, defaulting to `/dev/i2c-1` and the floating address.

use std::{env, process, thread, time::Duration};

use ambient_light::device::{render_value, Device};
use ambient_light::tsl2561::{Config, Tsl2561, ValueIndex, ADDR_FLOAT};

fn parse_address(text: &str) -> Option<u8> {
    match text.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn device_name<D: Device>(_: &D) -> &'static str {
    D::NAME
}

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/i2c-1".into());
    let address = match args.next() {
        Some(text) => parse_address(&text).unwrap_or_else(|| {
            eprintln!("Error: {text} is not an I2C address");
            process::exit(2);
        }),
        None => ADDR_FLOAT,
    };

    let config = Config::new().with_auto_gain(true);
    let mut tsl = match Tsl2561::open(&path, address, config) {
        Ok(tsl) => tsl,
        Err(error) => {
            eprintln!("Error: cannot open {path}: {error:?}");
            process::exit(1);
        }
    };
    if !tsl.is_active() {
        eprintln!("{} is inactive", device_name(&tsl));
    }

    loop {
        let value = tsl.value_at_index(ValueIndex::Lux.into());
        println!("{} lux", render_value(&value));
        thread::sleep(Duration::from_secs(1));
    }
}
