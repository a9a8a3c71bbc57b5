use chrono::{NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::schema::{NewSubmission, SubmissionRecord, HEADER};

pub const DEFAULT_DATA_FILE: &str = "data/submissions.csv";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected header in submission log: {found:?}")]
    HeaderMismatch { found: Vec<String> },

    #[error("storage task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Default)]
struct WriterState {
    last_timestamp: Option<NaiveDateTime>,
}

/// Append-only CSV log of submissions.
///
/// Clones share one writer lock, so appends from a single process never
/// interleave. Separate processes writing the same file are not coordinated.
#[derive(Clone)]
pub struct SubmissionStore {
    path: PathBuf,
    state: Arc<Mutex<WriterState>>,
}

impl SubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(WriterState::default())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log with its header if missing or empty; otherwise check
    /// the header matches.
    pub fn initialize(&self) -> Result<()> {
        let _guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_header()
    }

    pub fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_header()?;

        // never step backwards, even if the wall clock does
        let now = Utc::now().naive_utc();
        let ts = match state.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        let record = submission.stamp(ts.format(TIMESTAMP_FORMAT).to_string());

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        state.last_timestamp = Some(ts);
        debug!(path = %self.path.display(), timestamp = %record.timestamp, "store: appended submission");
        Ok(record)
    }

    /// Every record in file order; empty if the log does not exist yet.
    pub fn load_all(&self) -> Result<Vec<SubmissionRecord>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut out = Vec::new();
        for rec in reader.deserialize::<SubmissionRecord>() {
            out.push(rec?);
        }
        Ok(out)
    }

    fn ensure_header(&self) -> Result<()> {
        let empty = match fs::metadata(&self.path) {
            Ok(m) => m.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if empty {
            if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(HEADER)?;
            writer.flush()?;
            info!(path = %self.path.display(), "store: created submission log");
            return Ok(());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let found = reader.headers()?;
        if found.iter().ne(HEADER.iter().copied()) {
            return Err(StoreError::HeaderMismatch {
                found: found.iter().map(str::to_string).collect(),
            });
        }

        // a header or row cut off without its terminator would swallow the next append
        if !ends_with_newline(&self.path)? {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(b"\n")?;
            file.flush()?;
            warn!(path = %self.path.display(), "store: terminated unfinished last line");
        }
        Ok(())
    }
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
