use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Chat file is not valid UTF-8 (row {row})")]
    Decoding { row: u64 },

    #[error("Row {row} has {fields} field(s), expected at least 3")]
    MalformedRow { row: u64, fields: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read chat file: {0}")]
    Csv(#[source] csv::Error),
}

impl ConvertError {
    /// Classifies a reader failure that happened while reading `row`, counted
    /// from 0 with the header and blank lines included.
    pub fn from_csv(err: csv::Error, row: u64) -> Self {
        if let csv::ErrorKind::Utf8 { .. } = err.kind() {
            return Self::Decoding { row };
        }

        if err.is_io_error() {
            return Self::Io(err.into());
        }

        Self::Csv(err)
    }
}
