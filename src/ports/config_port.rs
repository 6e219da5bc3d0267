//! Configuration access port trait.

use std::str::FromStr;

use crate::domain::error::SigtraderError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}

/// Parsed value, `Ok(None)` when absent, error when present but malformed.
pub fn get_parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            SigtraderError::invalid_config(key, format!("[{section}] cannot parse '{raw}'"))
        }),
    }
}

/// Comma-separated list, `Ok(None)` when absent.
pub fn get_list<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<T>>, SigtraderError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| {
            item.parse::<T>().map_err(|_| {
                SigtraderError::invalid_config(key, format!("[{section}] cannot parse '{item}'"))
            })
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
}
