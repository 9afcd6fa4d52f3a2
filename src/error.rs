use std::path::PathBuf;
use thiserror::Error;

/// A single field of a row that could not be coerced to its typed form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row {row_id}: malformed sales amount {raw:?}")]
    MalformedAmount { row_id: usize, raw: String },

    #[error("row {row_id}: malformed units sold {raw:?}")]
    MalformedUnits { row_id: usize, raw: String },

    #[error("row {row_id}: malformed invoice date {raw:?}")]
    MalformedDate { row_id: usize, raw: String },
}

impl RowError {
    pub fn row_id(&self) -> usize {
        match self {
            RowError::MalformedAmount { row_id, .. }
            | RowError::MalformedUnits { row_id, .. }
            | RowError::MalformedDate { row_id, .. } => *row_id,
        }
    }

    /// Short column name used in console notices.
    pub fn column(&self) -> &'static str {
        match self {
            RowError::MalformedAmount { .. } => "TotalSales",
            RowError::MalformedUnits { .. } => "UnitsSold",
            RowError::MalformedDate { .. } => "InvoiceDate",
        }
    }
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source file could not be opened or read.
    #[error("source unavailable {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding label: {0}")]
    UnknownEncoding(String),

    /// One or more required columns are absent from the header row.
    #[error("missing required column(s): {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A running total left the range of its numeric type.
    #[error("{measure} total for {key:?} overflowed")]
    Overflow { measure: &'static str, key: String },

    /// A row-level failure escalated by strict mode.
    #[error(transparent)]
    Row(#[from] RowError),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_columns() {
        let err = PipelineError::SchemaError {
            missing: vec!["City".into(), "UnitsSold".into()],
        };
        assert_eq!(err.to_string(), "missing required column(s): City, UnitsSold");
    }

    #[test]
    fn row_error_reports_row_and_column() {
        let err = RowError::MalformedAmount { row_id: 7, raw: "N/A".into() };
        assert_eq!(err.row_id(), 7);
        assert_eq!(err.column(), "TotalSales");
        assert_eq!(err.to_string(), "row 7: malformed sales amount \"N/A\"");
    }
}
