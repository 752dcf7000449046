//! Sensor tables: raw CSV records and the cleaned, regularly-timed channels.

use crate::error::{Result, VizError};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Name of the recorded timestamp column
pub const TIME_COLUMN: &str = "time";

/// Sampling rate the collar firmware logs at (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 16.0;

/// Tokens a dataframe reader treats as "not available"
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Gyroscope,
    Accelerometer,
}

/// One of the six plotted sensor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    GyroX,
    GyroY,
    GyroZ,
    AccelX,
    AccelY,
    AccelZ,
}

impl Attribute {
    /// All channels in panel order, top to bottom
    pub const ALL: [Attribute; 6] = [
        Attribute::GyroX,
        Attribute::GyroY,
        Attribute::GyroZ,
        Attribute::AccelX,
        Attribute::AccelY,
        Attribute::AccelZ,
    ];

    /// CSV column name
    pub fn column(self) -> &'static str {
        match self {
            Attribute::GyroX => "g_x",
            Attribute::GyroY => "g_y",
            Attribute::GyroZ => "g_z",
            Attribute::AccelX => "a_x",
            Attribute::AccelY => "a_y",
            Attribute::AccelZ => "a_z",
        }
    }

    pub fn kind(self) -> SensorKind {
        match self {
            Attribute::GyroX | Attribute::GyroY | Attribute::GyroZ => SensorKind::Gyroscope,
            _ => SensorKind::Accelerometer,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Whether a CSV field counts as a missing value
pub fn is_missing(field: &str) -> bool {
    NA_TOKENS.contains(&field.trim())
}

#[derive(Debug, Clone)]
struct RawRecord {
    line: u64,
    fields: Vec<String>,
}

/// A CSV recording as read from disk, before any cleaning
#[derive(Debug, Clone)]
pub struct RawTable {
    source: PathBuf,
    headers: Vec<String>,
    records: Vec<RawRecord>,
}

impl RawTable {
    /// Read a recording from a CSV file with a header row
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| VizError::DataLoad {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        Self::from_reader(path, file)
    }

    /// Read a recording from any reader; `source` is only used in error messages
    pub fn from_reader<R: Read>(source: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let source = source.into();
        let load_err = |e: csv::Error| VizError::DataLoad {
            path: source.clone(),
            source: e,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(load_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(load_err)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            // Short records are incomplete rows; long ones are malformed
            if record.len() > headers.len() {
                return Err(VizError::MalformedRecord {
                    path: source.clone(),
                    row: line as usize,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            records.push(RawRecord {
                line,
                fields: record.iter().map(str::to_string).collect(),
            });
        }

        let table = Self {
            source,
            headers,
            records,
        };

        let required = std::iter::once(TIME_COLUMN).chain(Attribute::ALL.iter().map(|a| a.column()));
        for column in required {
            if table.column_index(column).is_none() {
                return Err(VizError::MissingColumn {
                    path: table.source.clone(),
                    column: column.to_string(),
                });
            }
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A record is complete when every header column has a non-missing value
    fn is_complete(&self, record: &RawRecord) -> bool {
        record.fields.len() == self.headers.len() && record.fields.iter().all(|f| !is_missing(f))
    }
}

/// Sensor channels on a synthetic, gap-free time axis
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    time: Vec<f64>,
    channels: [Vec<f64>; 6],
    raw_rows: usize,
    sample_rate_hz: f64,
}

impl CleanedTable {
    /// Drop incomplete records, discard the recorded timestamps and rebuild the
    /// time column as `i / sample_rate_hz` for the 1-based row position `i`.
    ///
    /// An empty result is not an error here; the caller decides what to do with it.
    pub fn from_raw(raw: &RawTable, sample_rate_hz: f64) -> Result<Self> {
        let indices: Vec<(Attribute, usize)> = Attribute::ALL
            .iter()
            .map(|&attr| {
                raw.column_index(attr.column())
                    .map(|idx| (attr, idx))
                    .ok_or_else(|| VizError::MissingColumn {
                        path: raw.source.clone(),
                        column: attr.column().to_string(),
                    })
            })
            .collect::<Result<_>>()?;

        let mut channels: [Vec<f64>; 6] = Default::default();
        'records: for record in raw.records.iter().filter(|r| raw.is_complete(r)) {
            let mut values = [0.0; 6];
            for &(attr, idx) in &indices {
                let field = &record.fields[idx];
                let value = field.parse::<f64>().map_err(|_| VizError::InvalidValue {
                    path: raw.source.clone(),
                    row: record.line as usize,
                    column: attr.column().to_string(),
                    value: field.clone(),
                })?;
                // Spellings like `NAN` or `+nan` slip past the token list
                if value.is_nan() {
                    continue 'records;
                }
                values[attr.index()] = value;
            }
            for (channel, value) in channels.iter_mut().zip(values) {
                channel.push(value);
            }
        }

        let kept = channels[0].len();
        let time = (1..=kept).map(|i| i as f64 / sample_rate_hz).collect();

        Ok(Self {
            time,
            channels,
            raw_rows: raw.len(),
            sample_rate_hz,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Synthetic time column in seconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn channel(&self, attr: Attribute) -> &[f64] {
        &self.channels[attr.index()]
    }

    /// `(time, value)` pairs for one channel
    pub fn points(&self, attr: Attribute) -> Vec<(f64, f64)> {
        self.time
            .iter()
            .copied()
            .zip(self.channel(attr).iter().copied())
            .collect()
    }

    /// Smallest and largest finite value of a channel
    pub fn value_range(&self, attr: Attribute) -> Option<(f64, f64)> {
        self.channel(attr)
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn report(&self) -> CleaningReport {
        CleaningReport {
            raw_rows: self.raw_rows,
            kept_rows: self.len(),
            dropped_rows: self.raw_rows - self.len(),
            duration_secs: self.time.last().copied().unwrap_or(0.0),
            sample_rate_hz: self.sample_rate_hz,
        }
    }
}

/// Row accounting for one cleaning pass
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    pub raw_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    pub duration_secs: f64,
    pub sample_rate_hz: f64,
}
