//! Native file pickers for the open and save steps.
//! Both block until the operator responds, None means the dialog was canceled.
use crate::utils::with_default_extension;
use std::path::{Path, PathBuf};

pub fn select_csv(dir: &Path) -> Option<PathBuf> {
    log::debug!("open dialog to select csv file in {}", dir.display());
    rfd::FileDialog::new()
        .set_title("Choose CSV File")
        .set_directory(dir)
        .add_filter("CSV Files", &["csv"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

pub fn select_html(dir: &Path, file_name: &str) -> Option<PathBuf> {
    log::debug!("open dialog to select html destination in {}", dir.display());
    rfd::FileDialog::new()
        .set_title("Save Plot As")
        .set_directory(dir)
        .set_file_name(file_name)
        .add_filter("HTML Files", &["html"])
        .add_filter("All Files", &["*"])
        .save_file()
        .map(|p| with_default_extension(p, "html"))
}
