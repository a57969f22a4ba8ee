//! Output file naming and directory preparation

use covid_common::{sanitize_file_component, MetricSelection, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `{country}_{flags}_plot.png`, e.g. `Germany_cd_plot.png`.
pub fn output_file_name(country: &str, selection: MetricSelection) -> String {
    format!(
        "{}_{}_plot.png",
        sanitize_file_component(country),
        selection.suffix()
    )
}

pub fn output_path(directory: &Path, country: &str, selection: MetricSelection) -> PathBuf {
    directory.join(output_file_name(country, selection))
}

/// Creates the output directory (and parents) when missing.
pub fn prepare_output_dir(directory: &Path) -> Result<()> {
    if !directory.exists() {
        debug!("Creating output directory {}", directory.display());
    }
    std::fs::create_dir_all(directory)?;
    Ok(())
}
