//! Configuration access port trait.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Typed getters return `Ok(None)` for a missing key and `Err` with a reason
/// when the value is present but does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;

    fn get_decimal(&self, section: &str, key: &str) -> Result<Option<Decimal>, String> {
        self.get_string(section, key)
            .map(|v| Decimal::from_str(v.trim()).map_err(|e| format!("{v:?}: {e}")))
            .transpose()
    }
}
