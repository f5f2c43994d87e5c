//! Fixed-width OCC option symbol parsing.
//!
//! Symbols look like `BP250815C00035000`: the underlying root, a `YYMMDD`
//! expiration, a `C`/`P` type indicator, then the strike in thousandths
//! zero-padded to 8 digits. The root is variable length, so everything is
//! parsed relative to the end of the string.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

/// The type indicator sits 9 characters from the end, just before the
/// 8-digit strike field.
pub fn parse_type(symbol: &str) -> Result<OptionType> {
    let bytes = symbol.as_bytes();
    if bytes.len() < 9 || !symbol.is_ascii() {
        return Err(Error::Parse(format!("symbol too short or non-ASCII: {}", symbol)));
    }
    match bytes[bytes.len() - 9] {
        b'C' => Ok(OptionType::Call),
        b'P' => Ok(OptionType::Put),
        other => Err(Error::Parse(format!(
            "unexpected type indicator '{}' in {}",
            other as char, symbol
        ))),
    }
}

/// Strike price from the trailing 8 digits, in thousandths of a dollar.
pub fn parse_strike(symbol: &str) -> Result<Decimal> {
    parse_type(symbol)?;
    let digits = &symbol[symbol.len() - 8..];
    let thousandths: i64 = digits
        .parse()
        .map_err(|_| Error::Parse(format!("non-numeric strike field in {}", symbol)))?;
    Ok(Decimal::new(thousandths, 3))
}

/// Expiration from the 6 digits immediately preceding the type indicator.
pub fn parse_expiration(symbol: &str) -> Result<NaiveDate> {
    parse_type(symbol)?;
    if symbol.len() < 15 {
        return Err(Error::Parse(format!("symbol too short: {}", symbol)));
    }
    let field = &symbol[symbol.len() - 15..symbol.len() - 9];
    NaiveDate::parse_from_str(field, "%y%m%d")
        .map_err(|_| Error::Parse(format!("bad expiration field '{}' in {}", field, symbol)))
}
