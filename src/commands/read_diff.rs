use super::read_records;
use crate::cli::SequenceFileFormat;
use crate::read_diff::difference;
use crate::sequence::{Fasta, Fastq, SequenceFormat, SequenceReader, SequenceRecord, WriteRecords};
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

pub fn run(a: PathBuf, b: PathBuf, output: PathBuf, format: SequenceFileFormat) -> Result<()> {
    match format {
        SequenceFileFormat::Fasta => diff::<Fasta>(&a, &b, &output),
        SequenceFileFormat::Fastq => diff::<Fastq>(&a, &b, &output),
    }
}

fn diff<F>(a: &Path, b: &Path, output: &Path) -> Result<()>
where
    F: SequenceFormat,
    F::Record: SequenceRecord + WriteRecords,
{
    let first = read_records::<F>(a, "first read set")?;
    let first_count = first.len();

    // B may legitimately be empty.
    let second = SequenceReader::<F>::from_path(b)
        .and_then(|mut reader| reader.read_all())
        .with_context(|| format!("Unable to read second read set ({})", b.display()))?;
    info!("Read {} reads ({})", second.len(), b.display());

    let remaining = difference(first, &second);
    <F::Record as WriteRecords>::write_all(output, &remaining)
        .with_context(|| format!("Unable to write output ({})", output.display()))?;
    info!(
        "Wrote {} of {} reads to {}",
        remaining.len(),
        first_count,
        output.display()
    );

    Ok(())
}
