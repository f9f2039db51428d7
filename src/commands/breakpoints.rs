use super::read_records;
use crate::alignment::{group_by_query, read_coords, Aligner, BreakpointDetector, MummerAligner};
use crate::config::Config;
use crate::sequence::{Fasta, SequenceRecord};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub fn run(
    config: &Config,
    reference: PathBuf,
    scaffolds: PathBuf,
    min_bases: u64,
    coords_file: Option<PathBuf>,
) -> Result<()> {
    let references = read_records::<Fasta>(&reference, "reference sequences")?;
    let scaffold_records = read_records::<Fasta>(&scaffolds, "scaffolds")?;

    // Keeps the coordinate file alive until counting is done.
    let mut aligner = MummerAligner::new(
        reference.clone(),
        scaffolds.clone(),
        config.mummer.clone(),
        config.tmp_dir.clone(),
    )
    .remove_output(true);

    let coords_path = match coords_file {
        Some(path) => path,
        None => {
            let progress = ProgressBarBuilder::new("Aligning scaffolds to reference with MUMmer...")
                .with_tick(Duration::from_millis(200))
                .build()?;
            let path = aligner
                .align(None)
                .context("Unable to align scaffolds to reference")?;
            progress.finish_and_clear();
            info!("Aligned scaffolds to reference");
            path
        }
    };

    let mut coords = read_coords(&coords_path).with_context(|| {
        format!("Unable to read alignment coordinates ({})", coords_path.display())
    })?;
    let total_rows = coords.len();
    coords.retain(|coord| coord.aligned_bases() >= min_bases);
    if coords.len() < total_rows {
        warn!(
            "Ignored {} of {} alignments shorter than {} bases",
            total_rows - coords.len(),
            total_rows,
            min_bases
        );
    }

    // MUMmer tags sequences with the first word of their header.
    let known_references: HashSet<&str> = references
        .iter()
        .filter_map(|r| r.identifier().split_whitespace().next())
        .collect();
    let unknown = coords
        .iter()
        .filter(|coord| !known_references.contains(coord.reference_id.as_str()))
        .count();
    if unknown > 0 {
        warn!(
            "{} alignments refer to sequences missing from {}",
            unknown,
            reference.display()
        );
    }

    let aligned: HashSet<&str> = coords.iter().map(|c| c.query_id.as_str()).collect();
    let unaligned = scaffold_records
        .iter()
        .filter_map(|s| s.identifier().split_whitespace().next())
        .filter(|id| !aligned.contains(id))
        .count();
    if unaligned > 0 {
        info!("{} of {} scaffolds have no alignments", unaligned, scaffold_records.len());
    }

    group_by_query(&mut coords);
    let mut detector = BreakpointDetector::new();
    let count = detector.process_alignments(&coords);
    let tally = detector.tally();
    info!("Counted {} breakpoints over {} alignments", count, coords.len());

    println!("total\tjoins\torientation\torder");
    println!("{}\t{}\t{}\t{}", tally.total, tally.joins, tally.orientation, tally.order);

    Ok(())
}
