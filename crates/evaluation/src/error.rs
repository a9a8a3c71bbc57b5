use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cannot evaluate an empty dataset")]
    EmptyDataset,

    #[error("prediction failed on row {row}: {source}")]
    Prediction {
        row: usize,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("dataset has {} invalid row(s); first: {}", .0.len(), .0.first().map(String::as_str).unwrap_or(""))]
    Invalid(Vec<String>),

    #[error("no valid rows found")]
    Empty,
}

pub type Result<T> = std::result::Result<T, EvalError>;
