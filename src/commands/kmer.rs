use crate::cli::SequenceFileFormat;
use crate::kmer::{write_statistics, KmerCounter};
use crate::sequence::{Fasta, Fastq, SequenceFormat, SequenceReader, SequenceRecord};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn run(input: PathBuf, k: usize, list: bool, format: SequenceFileFormat) -> Result<()> {
    let mut counter = KmerCounter::new(k)?;

    let sequences = match format {
        SequenceFileFormat::Fasta => count_kmers::<Fasta>(&input, &mut counter),
        SequenceFileFormat::Fastq => count_kmers::<Fastq>(&input, &mut counter),
    }
    .with_context(|| format!("Unable to read input ({})", input.display()))?;

    let stats = counter.statistics();
    info!(
        "Counted {} {}-mers ({} distinct) in {} sequences",
        stats.total, stats.k, stats.distinct, sequences
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_statistics(&mut out, &stats)?;
    if list {
        for (kmer, count) in counter.sorted_counts() {
            writeln!(out, "{}\t{}", String::from_utf8_lossy(kmer), count)?;
        }
    }
    out.flush()?;

    Ok(())
}

fn count_kmers<F>(path: &Path, counter: &mut KmerCounter) -> Result<u64>
where
    F: SequenceFormat,
    F::Record: SequenceRecord,
{
    let progress =
        ProgressBarBuilder::new(format!("Counting k-mers in {}...", path.display())).build()?;

    let mut reader = SequenceReader::<F>::from_path(path)?;
    let mut sequences = 0u64;
    for record in reader.records() {
        let record = record?;
        counter.add_sequence(record.nucleotides().as_bytes());
        sequences += 1;
        if sequences % 10_000 == 0 {
            progress.set_message(format!("Counting k-mers: {} sequences", sequences));
        }
    }

    progress.finish_and_clear();
    Ok(sequences)
}
