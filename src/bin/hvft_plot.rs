use hvft_lpp::hvft_plot::{parse_cli, run};
#[cfg(not(feature = "dialog"))]
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[cfg(feature = "dialog")]
fn pick_csv(dir: &Path) -> Option<PathBuf> {
    hvft_lpp::dialog::select_csv(dir)
}

#[cfg(not(feature = "dialog"))]
fn pick_csv(_dir: &Path) -> Option<PathBuf> {
    warn!("built without file dialogs, pass the csv file with --csvfile");
    None
}

#[cfg(feature = "dialog")]
fn pick_html(dir: &Path, file_name: &str) -> Option<PathBuf> {
    hvft_lpp::dialog::select_html(dir, file_name)
}

#[cfg(not(feature = "dialog"))]
fn pick_html(_dir: &Path, _file_name: &str) -> Option<PathBuf> {
    warn!("built without file dialogs, pass the html file with --htmlfile");
    None
}

fn main() -> ExitCode {
    let args = parse_cli();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    run(&args, pick_csv, pick_html).exit_code()
}
