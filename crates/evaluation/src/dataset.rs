use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DatasetError;

pub type Hash32 = [u8; 32];

pub const MIN_STARS: i64 = 1;
pub const MAX_STARS: i64 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub text: String,
    pub stars: i64,
}

impl DatasetRow {
    pub fn new(text: impl Into<String>, stars: i64) -> Self {
        Self { text: text.into(), stars }
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
    fingerprint: Hash32,
}

impl Dataset {
    /// Build from in-memory rows; fingerprint covers "<text>\n<stars>\n" per row.
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        let mut hasher = blake3::Hasher::new();
        for r in &rows {
            hasher.update(r.text.as_bytes());
            hasher.update(b"\n");
            hasher.update(r.stars.to_string().as_bytes());
            hasher.update(b"\n");
        }
        Self { rows, fingerprint: hasher.finalize().into() }
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }
}

/// Load a CSV with `text` and `stars` columns (others ignored).
///
/// Every bad row is reported; a dataset with any invalid row is refused.
/// `limit` keeps the first N valid rows. The fingerprint is BLAKE3 over
/// the file bytes.
pub fn load_csv(path: &Path, limit: Option<usize>) -> Result<Dataset, DatasetError> {
    let bytes = std::fs::read(path)?;
    let mut ds = parse_csv(&bytes, limit)?;
    ds.fingerprint = blake3::hash(&bytes).into();
    Ok(ds)
}

pub fn parse_csv(bytes: &[u8], limit: Option<usize>) -> Result<Dataset, DatasetError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();

    let text_idx = column(&headers, "text")?;
    let stars_idx = column(&headers, "stars")?;

    let mut rows = Vec::new();
    let mut errors: Vec<String> = vec![];

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("CSV read error: {e}"));
                continue;
            }
        };
        let line_no = record.position().map(|p| p.line()).unwrap_or(0);

        let text = record.get(text_idx).unwrap_or("");
        let stars = record.get(stars_idx).unwrap_or("").trim();

        if text.trim().is_empty() {
            errors.push(format!("Line {line_no}: empty text"));
            continue;
        }
        let stars = match parse_stars(stars) {
            Some(v) => v,
            None => {
                errors.push(format!("Line {line_no}: invalid stars value {stars:?}"));
                continue;
            }
        };
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            errors.push(format!("Line {line_no}: stars {stars} outside {MIN_STARS}..={MAX_STARS}"));
            continue;
        }

        rows.push(DatasetRow::new(text, stars));
    }

    if !errors.is_empty() {
        return Err(DatasetError::Invalid(errors));
    }
    if let Some(n) = limit {
        rows.truncate(n);
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(Dataset::from_rows(rows))
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(DatasetError::MissingColumn(name))
}

// dataframe exports sometimes write integral ratings as "4.0"
fn parse_stars(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
}
