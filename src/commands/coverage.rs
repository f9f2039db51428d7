use super::read_records;
use crate::coverage::{compute_depth, summary_statistics, write_depth, write_summary, ReadCoverage};
use crate::sequence::Fasta;
use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;

pub fn run(
    contigs_file: PathBuf,
    coverage_file: PathBuf,
    depth_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let contigs = read_records::<Fasta>(&contigs_file, "contigs")?;

    let coverage = ReadCoverage::from_file(&coverage_file)
        .with_context(|| format!("Unable to read coverage ({})", coverage_file.display()))?;
    info!(
        "Read coverage for {} contigs ({})",
        coverage.contig_count(),
        coverage_file.display()
    );

    let depth = compute_depth(&coverage, &contigs).context("Unable to calculate coverage depth")?;
    info!("Calculated coverage depth");

    if let Some(path) = depth_file {
        write_depth(&path, &depth)
            .with_context(|| format!("Unable to output coverage depth ({})", path.display()))?;
        info!("Output coverage depth ({})", path.display());
    }

    let summaries = summary_statistics(&contigs, &depth);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &summaries)
            .context("Unable to output coverage statistics")?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, &summaries).context("Unable to output coverage statistics")?;
    }
    out.flush()?;

    Ok(())
}
