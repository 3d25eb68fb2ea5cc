use crate::error::LoadError;
use crate::utils::{file_title, parse_with_unit};
use crate::{
    TestRecord, COL_CURRENT, COL_TIME, COL_VOLTAGE, CURRENT_UNIT, DT_FORMAT, HEADER_CURRENT,
    HEADER_TIME, HEADER_VOLTAGE, VOLTAGE_UNIT,
};
use chrono::NaiveDateTime;
use log::{debug, error, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a test record from the csv file at the given path.
/// Any failure is logged and turned into an empty record,
/// callers treat it as nothing to display.
pub fn load<P>(path: P) -> TestRecord
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match try_load(path) {
        Ok(record) => {
            info!("loaded {} rows from {}", record.len(), path.display());
            record
        }
        Err(e) => {
            error!("could not load {}: {}", path.display(), e);
            debug!("{:?}", e);
            TestRecord::empty()
        }
    }
}

/// Load a test record, reporting why the file could not be parsed.
pub fn try_load<P>(path: P) -> Result<TestRecord, LoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_reader(file_title(path), BufReader::new(file))
}

/// Parse the rig export from any reader.
/// Row 0 is the header, row 1 holds units and is skipped,
/// timestamp, voltage and current are taken by fixed position.
pub fn from_reader<R>(title: impl Into<String>, reader: R) -> Result<TestRecord, LoadError>
where
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    check_header(headers, COL_TIME, HEADER_TIME)?;
    check_header(headers, COL_VOLTAGE, HEADER_VOLTAGE)?;
    check_header(headers, COL_CURRENT, HEADER_CURRENT)?;

    let mut time: Vec<NaiveDateTime> = Vec::new();
    let mut voltage: Vec<f64> = Vec::new();
    let mut current: Vec<f64> = Vec::new();
    for row in csv_reader.records().skip(1) {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let time_cell = cell(&row, COL_TIME, HEADER_TIME, line)?;
        let voltage_cell = cell(&row, COL_VOLTAGE, HEADER_VOLTAGE, line)?;
        let current_cell = cell(&row, COL_CURRENT, HEADER_CURRENT, line)?;

        let t = parse_timestamp(time_cell).map_err(|source| LoadError::Timestamp {
            value: time_cell.to_owned(),
            line,
            source,
        })?;
        let v = parse_with_unit(voltage_cell, VOLTAGE_UNIT).map_err(|source| LoadError::Number {
            name: HEADER_VOLTAGE,
            value: voltage_cell.to_owned(),
            line,
            source,
        })?;
        let c = parse_with_unit(current_cell, CURRENT_UNIT).map_err(|source| LoadError::Number {
            name: HEADER_CURRENT,
            value: current_cell.to_owned(),
            line,
            source,
        })?;
        time.push(t);
        voltage.push(v);
        current.push(c);
    }
    TestRecord::new(title.into(), time, voltage, current)
}

/// Rig timestamps look like "6/15/2023 2:30:00 PM", local time without offset.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), DT_FORMAT)
}

fn check_header(
    headers: &csv::StringRecord,
    index: usize,
    expected: &'static str,
) -> Result<(), LoadError> {
    match headers.get(index) {
        Some(found) if found.trim() == expected => Ok(()),
        Some(found) => Err(LoadError::UnexpectedHeader {
            index,
            expected,
            found: found.to_owned(),
        }),
        None => Err(LoadError::MissingColumn {
            name: expected,
            index,
            line: 1,
        }),
    }
}

fn cell<'r>(
    row: &'r csv::StringRecord,
    index: usize,
    name: &'static str,
    line: u64,
) -> Result<&'r str, LoadError> {
    row.get(index)
        .ok_or(LoadError::MissingColumn { name, index, line })
}
