use super::read_coverage::ReadCoverage;
use crate::error::{Error, Result};
use crate::sequence::SequenceRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Per-base read depth for every contig, in contig order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageTable {
    depths: Vec<Vec<u32>>,
}

impl CoverageTable {
    /// Depth array of the contig at `index`, or `None` past the last contig.
    pub fn contig(&self, index: usize) -> Option<&[u32]> {
        self.depths.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.depths.iter().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContigSummary {
    /// 1-based position of the contig in the input.
    pub index: usize,
    pub identifier: String,
    pub length: usize,
    pub average_coverage: f64,
}

/// Spreads every read over `[max(start, 0), start + average read length)`,
/// clipped to the contig.
///
/// Fails without producing a table when the coverage data and the contig
/// list disagree on the number of contigs.
pub fn compute_depth<R: SequenceRecord>(
    coverage: &ReadCoverage,
    contigs: &[R],
) -> Result<CoverageTable> {
    if coverage.contig_count() != contigs.len() {
        return Err(Error::Consistency(format!(
            "coverage data describes {} contigs but {} contig sequences were supplied",
            coverage.contig_count(),
            contigs.len()
        )));
    }

    // The linker reports a fractional mean; reads are laid out with its integer part.
    let read_length = coverage.average_read_length as i64;

    let depths = contigs
        .iter()
        .zip(&coverage.read_locations)
        .map(|(contig, starts)| {
            let length = contig.len();
            let mut depth = vec![0u32; length];
            for &start in starts {
                let from = start.max(0) as usize;
                let to = start.saturating_add(read_length).clamp(0, length as i64) as usize;
                for base in depth.iter_mut().take(to).skip(from) {
                    *base += 1;
                }
            }
            depth
        })
        .collect();

    Ok(CoverageTable { depths })
}

pub fn summary_statistics<R: SequenceRecord>(
    contigs: &[R],
    depth: &CoverageTable,
) -> Vec<ContigSummary> {
    contigs
        .iter()
        .zip(depth.iter())
        .enumerate()
        .map(|(i, (contig, bases))| {
            let length = contig.len();
            let sum: u64 = bases.iter().map(|&d| d as u64).sum();
            let average_coverage = if length > 0 {
                sum as f64 / length as f64
            } else {
                0.0
            };
            ContigSummary {
                index: i + 1,
                identifier: contig.identifier().to_string(),
                length,
                average_coverage,
            }
        })
        .collect()
}

/// Writes one depth value per line, contigs concatenated in order.
pub fn write_depth(path: &Path, depth: &CoverageTable) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for contig in depth.iter() {
        for value in contig {
            writeln!(writer, "{}", value).map_err(|e| Error::io(path, e))?;
        }
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

pub fn write_summary<W: Write>(writer: &mut W, summaries: &[ContigSummary]) -> std::io::Result<()> {
    for summary in summaries {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            summary.index, summary.identifier, summary.length, summary.average_coverage
        )?;
    }
    Ok(())
}
