//! Feature Encoding
//!
//! Turns raw market-row strings into the numeric feature tuple the
//! classifier consumes. Dates become whole days since a fixed reference
//! epoch so the model sees one monotonically increasing number per day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// Reference epoch for date encoding: 2018-01-01.
///
/// Fixed for the lifetime of any trained model; changing it invalidates
/// previously learned weights.
pub const REFERENCE_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2018, 1, 1) {
    Some(date) => date,
    None => panic!("reference epoch must be a valid calendar date"),
};

/// Date format accepted by the encoder
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encode a YYYY-MM-DD date string as whole days since [`REFERENCE_EPOCH`].
///
/// The epoch itself encodes to 0 and later dates encode strictly greater,
/// so calendar order survives the encoding. Returns None when the input is
/// not a parseable calendar date; callers must check before feeding the
/// value to a model.
pub fn encode_date(date: &str) -> Option<i64> {
    let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    Some(encode_day(parsed))
}

/// Encode an already-parsed date as whole days since the reference epoch
pub fn encode_day(date: NaiveDate) -> i64 {
    date.signed_duration_since(REFERENCE_EPOCH).num_days()
}

/// Date corresponding to an encoded day offset
pub fn date_for_offset(offset: i64) -> Option<NaiveDate> {
    let delta = chrono::TimeDelta::try_days(offset)?;
    REFERENCE_EPOCH.checked_add_signed(delta)
}

/// Encode an exchange rate; None unless the input parses to a finite float
pub fn encode_rate(rate: &str) -> Option<f64> {
    parse_finite(rate)
}

/// Encode a traded volume; None unless the input parses to a finite float
pub fn encode_volume(volume: &str) -> Option<f64> {
    parse_finite(volume)
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Encoded feature tuple fed to the classifier
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Days since the reference epoch
    pub date: i64,

    /// Traded volume
    pub volume: f64,

    /// Exchange rate (BTC price in the quote currency)
    pub rate: f64,
}

impl FeatureVector {
    /// Build a feature vector from raw string inputs.
    ///
    /// Errors name the offending field, unlike the optional encoders.
    pub fn from_raw(date: &str, volume: &str, rate: &str) -> Result<Self> {
        let date_offset =
            encode_date(date).ok_or_else(|| SentimentError::InvalidDate(date.to_string()))?;
        let volume_value =
            encode_volume(volume).ok_or_else(|| SentimentError::InvalidNumber {
                field: "volume",
                value: volume.to_string(),
            })?;
        let rate_value = encode_rate(rate).ok_or_else(|| SentimentError::InvalidNumber {
            field: "rate",
            value: rate.to_string(),
        })?;

        Ok(Self {
            date: date_offset,
            volume: volume_value,
            rate: rate_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_encodes_to_zero() {
        assert_eq!(encode_date("2018-01-01"), Some(0));
    }

    #[test]
    fn test_day_after_epoch() {
        assert_eq!(encode_date("2018-01-02"), Some(1));
    }

    #[test]
    fn test_known_offset_across_leap_year() {
        // 365 + 365 + 366 + 151 days
        assert_eq!(encode_date("2021-06-01"), Some(1247));
    }

    #[test]
    fn test_monotonic_with_calendar_order() {
        let dates = [
            "2018-01-01",
            "2018-12-31",
            "2019-01-01",
            "2020-02-29",
            "2021-06-01",
        ];
        let encoded: Vec<i64> = dates.iter().map(|d| encode_date(d).unwrap()).collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let offset = encode_date("2020-02-29").unwrap();
        let date = date_for_offset(offset).unwrap();
        assert_eq!(encode_day(date), offset);
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2020-02-29");
    }

    #[test]
    fn test_pre_epoch_dates_encode_negative() {
        assert_eq!(encode_date("2017-12-31"), Some(-1));
    }

    #[test]
    fn test_garbage_dates_are_rejected() {
        assert_eq!(encode_date(""), None);
        assert_eq!(encode_date("banana"), None);
        assert_eq!(encode_date("2021-13-40"), None);
        assert_eq!(encode_date("2021/06/01"), None);
    }

    #[test]
    fn test_rate_and_volume_pass_through() {
        assert_eq!(encode_rate("50000"), Some(50000.0));
        assert_eq!(encode_volume("  123.45 "), Some(123.45));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        assert_eq!(encode_rate("abc"), None);
        assert_eq!(encode_rate("NaN"), None);
        assert_eq!(encode_rate("inf"), None);
        assert_eq!(encode_volume(""), None);
    }

    #[test]
    fn test_feature_vector_reports_bad_field() {
        let err = FeatureVector::from_raw("2021-06-01", "abc", "50000").unwrap_err();
        assert!(matches!(
            err,
            SentimentError::InvalidNumber { field: "volume", .. }
        ));

        let err = FeatureVector::from_raw("soon", "100", "50000").unwrap_err();
        assert!(matches!(err, SentimentError::InvalidDate(_)));
    }

    #[test]
    fn test_feature_vector_from_valid_input() {
        let features = FeatureVector::from_raw("2021-06-01", "100", "50000").unwrap();
        assert_eq!(
            features,
            FeatureVector { date: 1247, volume: 100.0, rate: 50000.0 }
        );
    }
}
