use std::path::PathBuf;

/// Everything that can go wrong while reading a test rig csv file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened
    #[error("could not open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed csv or read error while iterating the rows
    #[error("csv parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column {index} ({name}) on line {line}")]
    MissingColumn {
        name: &'static str,
        index: usize,
        line: u64,
    },

    #[error("unexpected header {found:?} in column {index}, expected {expected:?}")]
    UnexpectedHeader {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("could not parse timestamp {value:?} on line {line}: {source}")]
    Timestamp {
        value: String,
        line: u64,
        source: chrono::ParseError,
    },

    #[error("could not parse {name} {value:?} on line {line}: {source}")]
    Number {
        name: &'static str,
        value: String,
        line: u64,
        source: std::num::ParseFloatError,
    },

    #[error("series length mismatch: {time} timestamps, {voltage} voltages, {current} currents")]
    LengthMismatch {
        time: usize,
        voltage: usize,
        current: usize,
    },
}

/// Errors of the html export step.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
