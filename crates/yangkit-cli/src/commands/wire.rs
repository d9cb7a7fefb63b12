//! Wire encode/decode command implementation.

use serde_json::json;
use yangkit_common::{CanonicalValue, Decimal64, ScalarValue, Uint16, Uint32, Uint64, Uint8};

use crate::output;

fn parse_scalar(kind: &str, value: &str) -> Result<ScalarValue, Box<dyn std::error::Error>> {
    let scalar = match kind {
        "decimal64" => ScalarValue::from(Decimal64::parse_canonical(value)?),
        "uint8" => ScalarValue::from(Uint8::parse_canonical(value)?),
        "uint16" => ScalarValue::from(Uint16::parse_canonical(value)?),
        "uint32" => ScalarValue::from(Uint32::parse_canonical(value)?),
        "uint64" => ScalarValue::from(Uint64::parse_canonical(value)?),
        other => return Err(format!("Type {} has no wire form", other).into()),
    };
    Ok(scalar)
}

pub fn encode(kind: String, value: String) -> Result<(), Box<dyn std::error::Error>> {
    let scalar = parse_scalar(&kind, &value)?;
    println!("{}", hex::encode(scalar.encode()));
    Ok(())
}

pub fn decode(input: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = hex::decode(input.trim()).map_err(|e| format!("Invalid hex: {}", e))?;
    let scalar = ScalarValue::decode(&bytes)?;

    if json {
        let report = json!({
            "type": scalar.type_name(),
            "tag": scalar.tag(),
            "value": scalar.to_string(),
        });
        println!("{}", output::format_json(&report));
    } else {
        println!("{} {}", scalar.type_name(), scalar);
    }
    Ok(())
}
