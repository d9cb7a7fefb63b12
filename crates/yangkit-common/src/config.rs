//! Process configuration read from the environment.
//!
//! Each unsigned width keeps a small-value cache whose size is read once, on
//! first use, from `YANGKIT_UINT<bits>_CACHE_SIZE`.

use std::env::{self, VarError};

use tracing::warn;

/// Cache size used when the variable is unset or invalid.
pub const DEFAULT_CACHE_SIZE: usize = 256;

/// Environment variable for the `Uint8` cache size.
pub const UINT8_CACHE_SIZE_VAR: &str = "YANGKIT_UINT8_CACHE_SIZE";
/// Environment variable for the `Uint16` cache size.
pub const UINT16_CACHE_SIZE_VAR: &str = "YANGKIT_UINT16_CACHE_SIZE";
/// Environment variable for the `Uint32` cache size.
pub const UINT32_CACHE_SIZE_VAR: &str = "YANGKIT_UINT32_CACHE_SIZE";
/// Environment variable for the `Uint64` cache size.
pub const UINT64_CACHE_SIZE_VAR: &str = "YANGKIT_UINT64_CACHE_SIZE";

/// Reads the cache size from `var`, capped at `max_entries`.
pub fn cache_size(var: &str, max_entries: usize) -> usize {
    match env::var(var) {
        Ok(raw) => parse_cache_size(var, Some(&raw), max_entries),
        Err(VarError::NotPresent) => parse_cache_size(var, None, max_entries),
        Err(VarError::NotUnicode(_)) => {
            warn!(variable = var, "ignoring non-unicode cache size");
            DEFAULT_CACHE_SIZE.min(max_entries)
        }
    }
}

/// Interprets a raw setting; `None` means the variable is unset.
pub fn parse_cache_size(var: &str, raw: Option<&str>, max_entries: usize) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_CACHE_SIZE.min(max_entries);
    };
    match raw.trim().parse::<usize>() {
        Ok(size) => size.min(max_entries),
        Err(err) => {
            warn!(variable = var, value = raw, error = %err, "ignoring invalid cache size");
            DEFAULT_CACHE_SIZE.min(max_entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_uses_default() {
        assert_eq!(parse_cache_size("X", None, usize::MAX), DEFAULT_CACHE_SIZE);
        assert_eq!(parse_cache_size("X", None, 16), 16);
    }

    #[test]
    fn explicit_size_is_capped() {
        assert_eq!(parse_cache_size("X", Some("1024"), 256), 256);
        assert_eq!(parse_cache_size("X", Some(" 32 "), 256), 32);
        assert_eq!(parse_cache_size("X", Some("0"), 256), 0);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert_eq!(parse_cache_size("X", Some("lots"), 65536), DEFAULT_CACHE_SIZE);
        assert_eq!(parse_cache_size("X", Some("-1"), 65536), DEFAULT_CACHE_SIZE);
    }
}
