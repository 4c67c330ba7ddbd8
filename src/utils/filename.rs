use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default output directory with format: output/queimadas-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("queimadas-{:02}{:02}{:02}", year, month, day);
    PathBuf::from("output").join(dirname)
}

/// Build the path of a chart file inside the output directory
pub fn chart_path(output_dir: &Path, name: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", name, extension))
}
