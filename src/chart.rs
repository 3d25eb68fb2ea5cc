use crate::error::ExportError;
use crate::utils::min_and_max;
use crate::{
    TestRecord, CURRENT_LABEL, CURRENT_RANGE_MA, PLOT_DT_FORMAT, TIME_LABEL, VOLTAGE_LABEL,
    VOLTAGE_RANGE_KV,
};
use chrono::NaiveDateTime;
use log::{debug, warn};
use plotly::common::{AxisSide, Font, Line, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use std::path::Path;

pub const VOLTAGE_COLOR: &str = "blue";
pub const CURRENT_COLOR: &str = "red";
const AXIS_TITLE_SIZE: usize = 16;

/// Which vertical axis a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    Primary,
    /// overlays the primary axis, on the right side
    Secondary,
}

impl YAxis {
    fn anchor(&self) -> &'static str {
        match self {
            YAxis::Primary => "y",
            YAxis::Secondary => "y2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: &'static str,
    pub color: &'static str,
    pub y_axis: YAxis,
    pub time: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: &'static str,
    pub color: &'static str,
    pub range: [f64; 2],
}

/// Dual-axis chart of one test run, voltage on the left and current on the right.
/// Built without side effects, call show or write_html to display or export it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub traces: Vec<Trace>,
    pub voltage_axis: AxisSpec,
    pub current_axis: AxisSpec,
    pub show_legend: bool,
}

/// Build the chart for a record.
/// Each trace is only added when its series and the time are present,
/// an empty record gives a chart without traces.
pub fn build_chart(record: &TestRecord) -> Chart {
    let mut traces: Vec<Trace> = Vec::with_capacity(2);
    if let (Some(time), Some(voltage)) = (record.time(), record.voltage()) {
        warn_out_of_range(VOLTAGE_LABEL, voltage, VOLTAGE_RANGE_KV);
        traces.push(Trace {
            name: VOLTAGE_LABEL,
            color: VOLTAGE_COLOR,
            y_axis: YAxis::Primary,
            time: time.to_vec(),
            values: voltage.to_vec(),
        });
    }
    if let (Some(time), Some(current)) = (record.time(), record.current()) {
        warn_out_of_range(CURRENT_LABEL, current, CURRENT_RANGE_MA);
        traces.push(Trace {
            name: CURRENT_LABEL,
            color: CURRENT_COLOR,
            y_axis: YAxis::Secondary,
            time: time.to_vec(),
            values: current.to_vec(),
        });
    }
    debug!("built chart with {} traces", traces.len());
    Chart {
        title: record.title().unwrap_or_default().to_owned(),
        traces,
        voltage_axis: AxisSpec {
            title: VOLTAGE_LABEL,
            color: VOLTAGE_COLOR,
            range: VOLTAGE_RANGE_KV,
        },
        current_axis: AxisSpec {
            title: CURRENT_LABEL,
            color: CURRENT_COLOR,
            range: CURRENT_RANGE_MA,
        },
        show_legend: false,
    }
}

/// The display ranges are fixed to the instrument, larger values are not rescaled.
fn warn_out_of_range(name: &str, values: &[f64], range: [f64; 2]) {
    if let Some((min, max)) = min_and_max(values.iter().filter(|x| !x.is_nan())) {
        if min < range[0] || max > range[1] {
            warn!(
                "{} spans {} to {}, outside the displayed range {:?}",
                name, min, max, range
            );
        }
    }
}

fn axis(spec: &AxisSpec) -> Axis {
    // plotly 0.8 fonts have no weight, bold through the title markup
    let font = Font::new().size(AXIS_TITLE_SIZE).color(spec.color);
    Axis::new()
        .title(Title::new(&format!("<b>{}</b>", spec.title)).font(font))
        .range(spec.range.to_vec())
}

impl Chart {
    pub fn trace_names(&self) -> Vec<&'static str> {
        self.traces.iter().map(|t| t.name).collect()
    }

    /// Convert to a plotly plot, the time axis uses plotly.js date strings.
    pub fn to_plot(&self) -> Plot {
        let mut plot = Plot::new();
        for t in self.traces.iter() {
            let x: Vec<String> = t
                .time
                .iter()
                .map(|dt| dt.format(PLOT_DT_FORMAT).to_string())
                .collect();
            let trace = Scatter::new(x, t.values.clone())
                .mode(Mode::Lines)
                .name(t.name)
                .line(Line::new().color(t.color))
                .y_axis(t.y_axis.anchor());
            plot.add_trace(trace);
        }
        let layout = Layout::new()
            .title(Title::new(&self.title))
            .x_axis(Axis::new().title(Title::new(TIME_LABEL)))
            .y_axis(axis(&self.voltage_axis))
            .y_axis2(
                axis(&self.current_axis)
                    .overlaying(YAxis::Primary.anchor())
                    .side(AxisSide::Right),
            )
            .show_legend(self.show_legend);
        plot.set_layout(layout);
        plot
    }

    /// Open the chart in the default browser.
    pub fn show(&self) {
        self.to_plot().show();
    }

    /// Self-contained html document with the interactive chart.
    pub fn to_html(&self) -> String {
        self.to_plot().to_html()
    }

    pub fn write_html<P>(&self, fout: P) -> Result<(), ExportError>
    where
        P: AsRef<Path>,
    {
        let fout = fout.as_ref();
        std::fs::write(fout, self.to_html()).map_err(|source| ExportError::Io {
            path: fout.to_path_buf(),
            source,
        })
    }
}
