//! Uint command implementation.

use serde_json::json;
use yangkit_common::{ScalarValue, Uint16, Uint32, Uint64, Uint8};

use crate::output;

fn parse(
    width: u32,
    text: &str,
    radix: u32,
    saturate: bool,
) -> Result<ScalarValue, Box<dyn std::error::Error>> {
    if !(2..=36).contains(&radix) {
        return Err(format!("Invalid radix {}; expected 2..36", radix).into());
    }

    macro_rules! parse_as {
        ($ty:ident) => {
            if saturate {
                let raw = i128::from_str_radix(text, radix)
                    .map_err(|_| format!("'{}' is not an integer in radix {}", text, radix))?;
                ScalarValue::from($ty::saturating_of(raw))
            } else {
                ScalarValue::from($ty::of_string(text, radix)?)
            }
        };
    }

    Ok(match width {
        8 => parse_as!(Uint8),
        16 => parse_as!(Uint16),
        32 => parse_as!(Uint32),
        64 => parse_as!(Uint64),
        other => {
            return Err(format!("Unsupported width {}; expected 8, 16, 32 or 64", other).into())
        }
    })
}

pub fn run(
    width: u32,
    value: String,
    radix: u32,
    saturate: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = parse(width, &value, radix, saturate)?;

    if json {
        let report = json!({
            "type": parsed.type_name(),
            "value": parsed.to_string(),
            "wire": hex::encode(parsed.encode()),
        });
        println!("{}", output::format_json(&report));
    } else {
        println!("{}", parsed);
    }
    Ok(())
}
