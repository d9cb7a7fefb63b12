//! Subcommand implementations.

pub mod decimal;
pub mod typedef;
pub mod uint;
pub mod wire;

use std::io::{self, Read};

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e).into()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
