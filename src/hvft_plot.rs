use super::VERSION;
use crate::chart::build_chart;
use crate::error::ExportError;
use crate::loader::load;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Settings of one plotting run.
/// Paths left out on the command line are asked with the file dialogs,
/// starting from directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArgs {
    pub csvin: Option<PathBuf>,
    pub htmlout: Option<PathBuf>,
    pub directory: PathBuf,
    pub show: bool,
    pub save: bool,
    pub verbose: bool,
}

pub fn build_cli() -> Command {
    let arg_csvin = Arg::new("input_csvfile")
        .help("csv file exported by the test rig, a dialog is opened if not given")
        .short('f')
        .long("csvfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf));
    let arg_htmlout = Arg::new("output_htmlfile")
        .help("name of the output html file, a dialog is opened if not given")
        .short('o')
        .long("htmlfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf));
    let arg_directory = Arg::new("directory")
        .help("starting directory for the file dialogs")
        .short('d')
        .long("directory")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(".");
    let arg_no_show = Arg::new("no_show")
        .help("do not open the chart in the browser")
        .long("no-show")
        .action(ArgAction::SetTrue);
    let arg_no_save = Arg::new("no_save")
        .help("skip the html export")
        .long("no-save")
        .action(ArgAction::SetTrue);
    let arg_verbose = Arg::new("verbose")
        .help("print verbose information")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue);
    Command::new("hvft_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot voltage and current of a HV feedthrough test")
        .arg(arg_csvin)
        .arg(arg_htmlout)
        .arg(arg_directory)
        .arg(arg_no_show)
        .arg(arg_no_save)
        .arg(arg_verbose)
}

/// Takes the CLI arguments that control loading, plotting, and export.
pub fn parse_cli() -> PlotArgs {
    from_matches(&build_cli().get_matches())
}

pub fn from_matches(cli_args: &ArgMatches) -> PlotArgs {
    // directory has a default, get_one always returns Some
    let directory = cli_args
        .get_one::<PathBuf>("directory")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    PlotArgs {
        csvin: cli_args.get_one::<PathBuf>("input_csvfile").cloned(),
        htmlout: cli_args.get_one::<PathBuf>("output_htmlfile").cloned(),
        directory,
        show: !cli_args.get_flag("no_show"),
        save: !cli_args.get_flag("no_save"),
        verbose: cli_args.get_flag("verbose"),
    }
}

/// Suggested html name for the save dialog, the csv name with html extension.
pub fn default_html_name(csvin: &Path) -> String {
    let name = csvin.with_extension("html");
    match name.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => String::from("plot.html"),
    }
}

/// How a plotting run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// the open dialog was canceled
    NoInput,
    /// the csv file could not be parsed, nothing to display
    LoadFailed(PathBuf),
    /// chart built, export skipped with --no-save
    Plotted,
    Saved(PathBuf),
    SaveCanceled,
    SaveFailed(ExportError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::LoadFailed(_) | RunOutcome::SaveFailed(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Pick, load, build, show, and save one test run.
/// The pickers are called only for the paths missing from args,
/// they get the starting directory (and the suggested html name) and return None on cancel.
pub fn run<C, H>(args: &PlotArgs, pick_csv: C, pick_html: H) -> RunOutcome
where
    C: FnOnce(&Path) -> Option<PathBuf>,
    H: FnOnce(&Path, &str) -> Option<PathBuf>,
{
    let csvin = match args.csvin.clone().or_else(|| pick_csv(&args.directory)) {
        Some(p) => p,
        None => {
            info!("no csv file selected, nothing to plot");
            return RunOutcome::NoInput;
        }
    };

    info!("> read data from {}", csvin.display());
    let record = load(&csvin);
    if record.is_empty() {
        warn!("{} could not be loaded, nothing to display", csvin.display());
        return RunOutcome::LoadFailed(csvin);
    }
    if args.verbose {
        println!("{}", record);
    }

    let chart = build_chart(&record);
    if args.show {
        info!("> show chart");
        chart.show();
    }
    if !args.save {
        return RunOutcome::Plotted;
    }

    let htmlout = args
        .htmlout
        .clone()
        .or_else(|| pick_html(&args.directory, &default_html_name(&csvin)));
    match htmlout {
        Some(p) => match chart.write_html(&p) {
            Ok(()) => {
                info!("plot saved as {}", p.display());
                RunOutcome::Saved(p)
            }
            Err(e) => {
                error!("{}", e);
                RunOutcome::SaveFailed(e)
            }
        },
        None => {
            info!("save operation was canceled");
            RunOutcome::SaveCanceled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn quiet_args(csvin: Option<&str>, htmlout: Option<PathBuf>, save: bool) -> PlotArgs {
        PlotArgs {
            csvin: csvin.map(PathBuf::from),
            htmlout,
            directory: PathBuf::from("./test"),
            show: false,
            save,
            verbose: false,
        }
    }

    fn no_html(_: &Path, _: &str) -> Option<PathBuf> {
        panic!("save dialog should not be opened")
    }

    #[test]
    fn canceled_open_is_a_quiet_success() {
        init_logger();
        let args = quiet_args(None, None, true);
        let mut asked_in: Option<PathBuf> = None;
        let outcome = run(
            &args,
            |dir| {
                asked_in = Some(dir.to_path_buf());
                None
            },
            no_html,
        );
        assert!(matches!(outcome, RunOutcome::NoInput));
        assert!(outcome.is_success());
        assert_eq!(asked_in, Some(PathBuf::from("./test")));
    }

    #[test]
    fn unparseable_file_fails() {
        init_logger();
        let args = quiet_args(Some("./test/bad_timestamp.csv"), None, true);
        let outcome = run(&args, |_| None, no_html);
        assert!(
            matches!(outcome, RunOutcome::LoadFailed(ref p) if *p == PathBuf::from("./test/bad_timestamp.csv"))
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn picked_file_is_loaded() {
        init_logger();
        let args = quiet_args(None, None, false);
        let outcome = run(&args, |_| Some(PathBuf::from("./test/pss2_run.csv")), no_html);
        assert!(matches!(outcome, RunOutcome::Plotted));
    }

    #[test]
    fn no_save_skips_the_export() {
        init_logger();
        let args = quiet_args(Some("./test/pss2_run.csv"), None, false);
        let outcome = run(&args, |_| None, no_html);
        assert!(matches!(outcome, RunOutcome::Plotted));
        assert!(outcome.is_success());
    }

    #[test]
    fn canceled_save_is_a_success() {
        init_logger();
        let args = quiet_args(Some("./test/pss2_run.csv"), None, true);
        let mut suggested = String::new();
        let outcome = run(
            &args,
            |_| None,
            |_, name| {
                suggested = name.to_owned();
                None
            },
        );
        assert!(matches!(outcome, RunOutcome::SaveCanceled));
        assert!(outcome.is_success());
        assert_eq!(suggested, "pss2_run.html");
    }

    #[test]
    fn picked_destination_is_written() {
        init_logger();
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("run.html");
        let args = quiet_args(Some("./test/pss2_run.csv"), None, true);
        let outcome = run(&args, |_| None, |_, _| Some(fout.clone()));
        assert!(matches!(outcome, RunOutcome::Saved(ref p) if *p == fout));
        let html = std::fs::read_to_string(&fout).unwrap();
        assert!(html.contains("\"name\":\"Voltage (kV)\""));
    }

    #[test]
    fn write_failure_fails() {
        init_logger();
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("missing_dir").join("run.html");
        let args = quiet_args(Some("./test/pss2_run.csv"), Some(fout), true);
        let outcome = run(&args, |_| None, no_html);
        assert!(matches!(outcome, RunOutcome::SaveFailed(ExportError::Io { .. })));
        assert!(!outcome.is_success());
    }

    #[test]
    fn defaults() {
        let m = build_cli().try_get_matches_from(["hvft_plot"]).unwrap();
        let args = from_matches(&m);
        assert_eq!(args.csvin, None);
        assert_eq!(args.htmlout, None);
        assert_eq!(args.directory, PathBuf::from("."));
        assert!(args.show);
        assert!(args.save);
        assert!(!args.verbose);
    }

    #[test]
    fn all_arguments() {
        let m = build_cli()
            .try_get_matches_from([
                "hvft_plot",
                "-f",
                "runs/ft_01.csv",
                "--htmlfile",
                "out/ft_01.html",
                "-d",
                "runs",
                "--no-show",
                "--no-save",
                "-v",
            ])
            .unwrap();
        let args = from_matches(&m);
        assert_eq!(args.csvin, Some(PathBuf::from("runs/ft_01.csv")));
        assert_eq!(args.htmlout, Some(PathBuf::from("out/ft_01.html")));
        assert_eq!(args.directory, PathBuf::from("runs"));
        assert!(!args.show);
        assert!(!args.save);
        assert!(args.verbose);
    }

    #[test]
    fn html_name_follows_csv() {
        assert_eq!(default_html_name(Path::new("runs/ft_01.csv")), "ft_01.html");
        assert_eq!(default_html_name(Path::new("")), "plot.html");
    }
}
