use crate::alignment::AlignerKind;
use crate::config::Config;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

pub fn run(
    config: &Config,
    kind: AlignerKind,
    reference: PathBuf,
    query: PathBuf,
    output: PathBuf,
) -> Result<()> {
    let description = format!("{} to {}", query.display(), reference.display());
    let mut aligner = kind.build(reference, query, config);

    let progress = ProgressBarBuilder::new(format!("Aligning {}...", description))
        .with_tick(Duration::from_millis(200))
        .build()?;
    let written = aligner
        .align(Some(output.as_path()))
        .with_context(|| format!("Unable to align {}", description))?;
    progress.finish_and_clear();

    info!("Alignment written to {}", written.display());
    Ok(())
}
