//! Excel serial dates and defensive cell coercion
//!
//! All scalar parsing is parse-or-`None`: a malformed cell degrades to a
//! missing value, it never aborts the import.

use calamine::Data;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Excel's day-serial epoch. 1899-12-30 rather than 1900-01-01 to stay
/// compatible with the 1900 leap-year bug every producer reproduces.
pub fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("static date")
}

/// Whole-day serial → calendar date. Fractional time-of-day is truncated.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    excel_epoch().checked_add_days(Days::new(serial.trunc() as u64))
}

/// Calendar date → whole-day serial.
pub fn date_to_serial(date: NaiveDate) -> i64 {
    (date - excel_epoch()).num_days()
}

/// Decode a date from whatever the cell holds: a native date/datetime, a
/// numeric serial, or a string that parses as either.
pub fn cell_date(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell? {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) => NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok(),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::Float(f) => serial_to_date(*f),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                serial_to_date(f64::from_str(s).ok()?)
            }
        }
        _ => None,
    }
}

/// Lossy display form of a cell; whole floats drop the trailing `.0`.
pub fn cell_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => dt.as_f64().to_string(),
        _ => String::new(),
    }
}

/// Trimmed non-empty cell text, or `None`.
pub fn cell_opt_string(cell: Option<&Data>) -> Option<String> {
    let s = cell_string(cell);
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Integer coercion: numeric cells truncate, strings parse through f64.
pub fn cell_int(cell: Option<&Data>) -> Option<i32> {
    let n = match cell? {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            f64::from_str(s).ok()?
        }
        _ => return None,
    };
    i32::try_from(n.trunc() as i64).ok()
}

/// Decimal coercion: values carrying a fractional part are quantized to
/// two places, integral ones keep their scale.
pub fn cell_decimal(cell: Option<&Data>) -> Option<Decimal> {
    let raw = cell_string(cell);
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value = Decimal::from_str(raw).ok()?;
    if raw.contains('.') {
        Some(value.round_dp(2))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_45776_is_2025_04_29() {
        assert_eq!(serial_to_date(45776.0), NaiveDate::from_ymd_opt(2025, 4, 29));
        assert_eq!(
            serial_to_date(45776.0),
            excel_epoch().checked_add_days(Days::new(45776)),
        );
    }

    #[test]
    fn test_serial_round_trips_through_date() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(serial_to_date(date_to_serial(d) as f64), Some(d));
    }

    #[test]
    fn test_cell_date_accepts_natives_and_serials() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 29);
        assert_eq!(cell_date(Some(&Data::Float(45776.0))), expected);
        assert_eq!(cell_date(Some(&Data::Int(45776))), expected);
        assert_eq!(cell_date(Some(&Data::String("45776".into()))), expected);
        assert_eq!(
            cell_date(Some(&Data::DateTimeIso("2025-04-29T00:00:00".into()))),
            expected,
        );
    }

    #[test]
    fn test_cell_date_rejects_garbage() {
        assert_eq!(cell_date(None), None);
        assert_eq!(cell_date(Some(&Data::Empty)), None);
        assert_eq!(cell_date(Some(&Data::String("pronto".into()))), None);
        assert_eq!(cell_date(Some(&Data::String("".into()))), None);
    }

    #[test]
    fn test_cell_int_truncates_floats_and_parses_strings() {
        assert_eq!(cell_int(Some(&Data::Float(12.9))), Some(12));
        assert_eq!(cell_int(Some(&Data::String("7".into()))), Some(7));
        assert_eq!(cell_int(Some(&Data::String("7.5".into()))), Some(7));
        assert_eq!(cell_int(Some(&Data::String("siete".into()))), None);
        assert_eq!(cell_int(Some(&Data::Empty)), None);
    }

    #[test]
    fn test_cell_decimal_quantizes_fractional_input() {
        assert_eq!(
            cell_decimal(Some(&Data::String("150000.005".into()))),
            Decimal::from_str("150000.00").ok(),
        );
        assert_eq!(
            cell_decimal(Some(&Data::String("150000".into()))),
            Decimal::from_str("150000").ok(),
        );
        assert_eq!(cell_decimal(Some(&Data::String("".into()))), None);
    }

    #[test]
    fn test_cell_string_drops_trailing_zero_fraction() {
        assert_eq!(cell_string(Some(&Data::Float(2024.0))), "2024");
        assert_eq!(cell_string(Some(&Data::Float(2.5))), "2.5");
    }
}
