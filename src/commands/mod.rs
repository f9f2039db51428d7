pub mod align;
pub mod breakpoints;
pub mod coverage;
pub mod kmer;
pub mod read_diff;

use crate::sequence::{self, SequenceFormat};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Reads a whole sequence file that must contain at least one record.
fn read_records<F: SequenceFormat>(path: &Path, what: &str) -> Result<Vec<F::Record>> {
    let progress =
        ProgressBarBuilder::new(format!("Reading {} ({})...", what, path.display())).build()?;
    let records = sequence::read_nonempty::<F>(path)
        .with_context(|| format!("Unable to read {} ({})", what, path.display()))?;
    progress.finish_and_clear();

    info!("Read {} {} ({})", records.len(), what, path.display());
    Ok(records)
}
