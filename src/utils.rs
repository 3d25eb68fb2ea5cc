use std::num::ParseFloatError;
use std::path::{Path, PathBuf};

/// Parse a cell such as "12.5kV" or "0.042mA".
/// The unit suffix is optional and whitespace around the number is ignored.
/// An empty cell is a missing reading and becomes NAN, i.e. a gap in the chart.
pub fn parse_with_unit(cell: &str, unit: &str) -> Result<f64, ParseFloatError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.strip_suffix(unit).unwrap_or(cell).trim().parse::<f64>()
}

/// Display label for a loaded file, the final path component.
/// Fall back to the whole path when there is none (e.g. "..").
pub fn file_title(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Append ext when the path has none, e.g. a save dialog answered with "run1".
pub fn with_default_extension(path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(ext)
    }
}

/// Min and max of an iterator, None when it is empty.
/// Filter the NAN values before calling, they do not compare.
pub fn min_and_max<'a, I, T>(mut s: I) -> Option<(T, T)>
where
    I: Iterator<Item = &'a T>,
    T: 'a + std::cmp::PartialOrd + Clone,
{
    let (mut min, mut max) = match s.next() {
        Some(v) => (v, v),
        None => return None,
    };
    for es in s {
        if es > max {
            max = es
        } else if es < min {
            min = es
        }
    }
    Some((min.clone(), max.clone()))
}
