use chrono::prelude::*;
use std::fmt;
pub mod chart;
#[cfg(feature = "dialog")]
pub mod dialog;
pub mod error;
pub mod hvft_plot;
pub mod loader;
pub mod utils;

pub use chart::{build_chart, Chart};
pub use error::{ExportError, LoadError};
pub use loader::{load, try_load};

// constants
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Timestamp format written by the rig, e.g. "6/15/2023 2:30:00 PM".
pub const DT_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";
/// Timestamp format handed to plotly.js for the time axis.
pub const PLOT_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// fixed column layout of the rig export
pub const COL_TIME: usize = 5;
pub const COL_VOLTAGE: usize = 6;
pub const COL_CURRENT: usize = 7;
pub const HEADER_TIME: &str = "TIME";
pub const HEADER_VOLTAGE: &str = "VOLTAGE";
pub const HEADER_CURRENT: &str = "AMPERE";
pub const VOLTAGE_UNIT: &str = "kV";
pub const CURRENT_UNIT: &str = "mA";

// canonical labels, used for the traces and the axes
pub const TIME_LABEL: &str = "Time";
pub const VOLTAGE_LABEL: &str = "Voltage (kV)";
pub const CURRENT_LABEL: &str = "Current (mA)";

// fixed display ranges of the instrument
pub const VOLTAGE_RANGE_KV: [f64; 2] = [0., 41.];
pub const CURRENT_RANGE_MA: [f64; 2] = [0., 0.061];

/// One feedthrough test run: timestamp, voltage and current per row.
/// Either fully populated, with index-aligned series of equal length,
/// or fully empty when the file could not be loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestRecord {
    title: Option<String>,
    time: Option<Vec<NaiveDateTime>>,
    voltage: Option<Vec<f64>>,
    current: Option<Vec<f64>>,
}

impl TestRecord {
    /// The record of a failed load, nothing to display.
    pub fn empty() -> TestRecord {
        TestRecord::default()
    }

    /// Build a populated record, the three series must have the same length.
    pub fn new(
        title: String,
        time: Vec<NaiveDateTime>,
        voltage: Vec<f64>,
        current: Vec<f64>,
    ) -> Result<TestRecord, LoadError> {
        if time.len() != voltage.len() || time.len() != current.len() {
            return Err(LoadError::LengthMismatch {
                time: time.len(),
                voltage: voltage.len(),
                current: current.len(),
            });
        }
        Ok(TestRecord {
            title: Some(title),
            time: Some(time),
            voltage: Some(voltage),
            current: Some(current),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn time(&self) -> Option<&[NaiveDateTime]> {
        self.time.as_deref()
    }

    /// Voltage in kV
    pub fn voltage(&self) -> Option<&[f64]> {
        self.voltage.as_deref()
    }

    /// Current in mA
    pub fn current(&self) -> Option<&[f64]> {
        self.current.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }

    /// Number of rows, zero for an empty record.
    pub fn len(&self) -> usize {
        self.time.as_ref().map_or(0, |t| t.len())
    }
}

impl fmt::Display for TestRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.title, &self.time, &self.voltage, &self.current) {
            (Some(title), Some(time), Some(voltage), Some(current)) => {
                writeln!(f, "{} ({} rows)", title, time.len())?;
                for ((t, v), c) in time.iter().zip(voltage).zip(current) {
                    writeln!(f, "{},{},{}", t.format(PLOT_DT_FORMAT), v, c)?;
                }
                Ok(())
            }
            _ => writeln!(f, "empty test record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // run tests with:
    // cargo test -- --nocapture
    // to see the printed records

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn empty_record_has_nothing() {
        let r = TestRecord::empty();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.title(), None);
        assert_eq!(r.time(), None);
        assert_eq!(r.voltage(), None);
        assert_eq!(r.current(), None);
        assert_eq!(r.to_string(), "empty test record\n");
    }

    #[test]
    fn new_rejects_unequal_series() {
        let err = TestRecord::new(
            "run.csv".to_string(),
            vec![dt(14, 30, 0), dt(14, 30, 1)],
            vec![1.0, 2.0],
            vec![0.01],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::LengthMismatch {
                time: 2,
                voltage: 2,
                current: 1
            }
        ));
    }

    #[test]
    fn display_prints_rows() {
        let r = TestRecord::new(
            "run.csv".to_string(),
            vec![dt(14, 30, 0), dt(14, 30, 1)],
            vec![12.5, 13.0],
            vec![0.042, 0.043],
        )
        .unwrap();
        println!("{}", r);
        let s = r.to_string();
        assert!(s.starts_with("run.csv (2 rows)\n"));
        assert!(s.contains("2023-06-15 14:30:00,12.5,0.042\n"));
        assert!(s.contains("2023-06-15 14:30:01,13,0.043\n"));
    }

    #[test]
    fn load_fixture_rows_are_aligned() {
        let r = load("./test/pss2_run.csv");
        println!("{}", r);
        assert_eq!(r.title(), Some("pss2_run.csv"));
        assert_eq!(r.len(), 6);
        assert_eq!(r.time().unwrap().len(), 6);
        assert_eq!(r.voltage().unwrap().len(), 6);
        assert_eq!(r.current().unwrap().len(), 6);
        assert_eq!(r.time().unwrap()[0], dt(14, 30, 0));
        assert_eq!(r.voltage().unwrap()[0], 12.5);
        assert_eq!(r.current().unwrap()[0], 0.042);
        assert_eq!(r.time().unwrap()[5], dt(14, 30, 5));
        assert_eq!(r.voltage().unwrap()[5], 40.2);
        assert_eq!(r.current().unwrap()[5], 0.0581);
        r.time()
            .unwrap()
            .windows(2)
            .for_each(|w| assert!(w[1] > w[0], "time series is not ordered"));
    }
}
