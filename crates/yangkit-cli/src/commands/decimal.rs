//! Decimal command implementation.

use serde_json::json;
use yangkit_common::{CanonicalValue, Decimal64, RoundingMode};

use crate::output;

pub fn run(
    value: String,
    scale: Option<u8>,
    rounding: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Decimal64::parse_canonical(&value)
        .map_err(|e| format!("Invalid decimal64 '{}': {}", value, e))?;

    let result = match scale {
        Some(target) => {
            let mode: RoundingMode = rounding
                .parse()
                .map_err(|e| format!("Invalid rounding mode: {}", e))?;
            parsed.scale_to(target, mode)?
        }
        None => parsed,
    };

    if json {
        let report = json!({
            "canonical": result.to_canonical_string(),
            "scale": result.scale(),
            "unscaled": result.unscaled_value(),
        });
        println!("{}", output::format_json(&report));
    } else {
        println!("{}", result);
    }
    Ok(())
}
