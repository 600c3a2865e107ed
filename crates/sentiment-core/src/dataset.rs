//! Dataset Loading
//!
//! Validates raw source rows and turns them into training examples. Rows
//! the encoder cannot use are skipped and reported, never fatal.

use serde::{Deserialize, Serialize};

use crate::feature::{encode_date, encode_rate, encode_volume};

/// One raw row as supplied by a history source
///
/// Numeric fields may arrive as JSON numbers or strings; both normalize to
/// strings here and are parsed during loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceRow {
    /// Calendar date, YYYY-MM-DD
    #[serde(default)]
    pub date: String,

    /// Traded volume for the day
    #[serde(default, deserialize_with = "string_or_number")]
    pub volume: String,

    /// Exchange rate (BTC close price)
    #[serde(default, deserialize_with = "string_or_number")]
    pub rate: String,

    /// Sentiment label for the day
    #[serde(default)]
    pub prediction: String,
}

impl SourceRow {
    pub fn new(
        date: impl Into<String>,
        volume: impl Into<String>,
        rate: impl Into<String>,
        prediction: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            volume: volume.into(),
            rate: rate.into(),
            prediction: prediction.into(),
        }
    }
}

/// One validated, encoded training example
///
/// Immutable once built; the loader never revisits accepted examples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Days since the reference epoch
    pub date: i64,

    /// Traded volume
    pub volume: f64,

    /// Exchange rate
    pub rate: f64,

    /// Sentiment label
    pub label: String,
}

/// Why a row was skipped during loading
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Zero-based index of the row in the input
    pub index: usize,

    /// Skip reason
    pub reason: String,
}

/// Result of a dataset load: accepted examples plus skip bookkeeping
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadOutcome {
    /// Accepted examples, in input order
    pub examples: Vec<TrainingExample>,

    /// Rows seen in the input
    pub rows_seen: usize,

    /// Rows skipped, with reasons, in input order
    pub skipped: Vec<SkippedRow>,
}

impl LoadOutcome {
    /// Number of accepted examples
    pub fn accepted(&self) -> usize {
        self.examples.len()
    }

    /// True when nothing usable was loaded
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Validate and encode source rows into training examples.
///
/// A row is accepted when its date is a non-empty, parseable calendar
/// date, its label is non-empty, and both volume and rate parse to finite
/// floats. Everything else is skipped with a reason; malformed input never
/// fails the load. Output order mirrors input order.
pub fn load_examples(rows: &[SourceRow]) -> LoadOutcome {
    let mut outcome = LoadOutcome {
        rows_seen: rows.len(),
        ..LoadOutcome::default()
    };

    for (index, row) in rows.iter().enumerate() {
        match encode_row(row) {
            Ok(example) => outcome.examples.push(example),
            Err(reason) => {
                tracing::debug!(index, reason, "skipping row");
                outcome.skipped.push(SkippedRow {
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }

    tracing::info!(
        rows = outcome.rows_seen,
        accepted = outcome.accepted(),
        skipped = outcome.skipped.len(),
        "dataset loaded"
    );

    outcome
}

fn encode_row(row: &SourceRow) -> std::result::Result<TrainingExample, &'static str> {
    if row.date.trim().is_empty() {
        return Err("empty date");
    }
    let date = encode_date(&row.date).ok_or("unparseable date")?;

    if row.prediction.trim().is_empty() {
        return Err("empty label");
    }

    let volume = encode_volume(&row.volume).ok_or("volume is not a finite number")?;
    let rate = encode_rate(&row.rate).ok_or("rate is not a finite number")?;

    Ok(TrainingExample {
        date,
        volume,
        rate,
        label: row.prediction.trim().to_string(),
    })
}

/// Deserialize a field that may arrive as a JSON string or number
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl serde::de::Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_owned())
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
