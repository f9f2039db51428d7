use crate::error::{Error, Result};
use seahash::SeaHasher;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasherDefault;
use std::io::Write;

pub const DEFAULT_KMER_LENGTH: usize = 36;

type KmerMap = HashMap<Vec<u8>, u64, BuildHasherDefault<SeaHasher>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KmerStatistics {
    pub k: usize,
    /// Number of k-mer occurrences counted.
    pub total: u64,
    pub distinct: u64,
    /// Distinct k-mers seen exactly once.
    pub singletons: u64,
    /// Multiplicity -> number of distinct k-mers with that multiplicity.
    pub histogram: BTreeMap<u64, u64>,
}

/// Exact k-mer counter over uppercase nucleotide sequences.
#[derive(Debug)]
pub struct KmerCounter {
    k: usize,
    counts: KmerMap,
}

fn is_nucleotide(base: u8) -> bool {
    matches!(base, b'A' | b'C' | b'G' | b'T')
}

impl KmerCounter {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::Config("k-mer length must be a positive number".to_string()));
        }
        Ok(Self {
            k,
            counts: KmerMap::default(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Counts every window of length k made only of A, C, G and T.
    pub fn add_sequence(&mut self, sequence: &[u8]) {
        let mut run = 0;
        for (i, &base) in sequence.iter().enumerate() {
            if !is_nucleotide(base) {
                run = 0;
                continue;
            }
            run += 1;
            if run >= self.k {
                let kmer = &sequence[i + 1 - self.k..=i];
                match self.counts.get_mut(kmer) {
                    Some(count) => *count += 1,
                    None => {
                        self.counts.insert(kmer.to_vec(), 1);
                    }
                }
            }
        }
    }

    pub fn count(&self, kmer: &[u8]) -> u64 {
        self.counts.get(kmer).copied().unwrap_or(0)
    }

    pub fn statistics(&self) -> KmerStatistics {
        let mut histogram = BTreeMap::new();
        for &count in self.counts.values() {
            *histogram.entry(count).or_insert(0) += 1;
        }
        KmerStatistics {
            k: self.k,
            total: self.counts.values().sum(),
            distinct: self.counts.len() as u64,
            singletons: histogram.get(&1).copied().unwrap_or(0),
            histogram,
        }
    }

    /// All k-mers with their counts in lexicographic order.
    pub fn sorted_counts(&self) -> Vec<(&[u8], u64)> {
        let mut counts: Vec<(&[u8], u64)> = self
            .counts
            .iter()
            .map(|(kmer, &count)| (kmer.as_slice(), count))
            .collect();
        counts.sort_unstable_by(|a, b| a.0.cmp(b.0));
        counts
    }
}

pub fn write_statistics<W: Write>(writer: &mut W, stats: &KmerStatistics) -> std::io::Result<()> {
    writeln!(writer, "k\t{}", stats.k)?;
    writeln!(writer, "total\t{}", stats.total)?;
    writeln!(writer, "distinct\t{}", stats.distinct)?;
    writeln!(writer, "singletons\t{}", stats.singletons)?;
    writeln!(writer, "multiplicity\tkmers")?;
    for (multiplicity, kmers) in &stats.histogram {
        writeln!(writer, "{}\t{}", multiplicity, kmers)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(KmerCounter::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_counts_overlapping_windows() {
        let mut counter = KmerCounter::new(2).unwrap();
        counter.add_sequence(b"AAAC");

        assert_eq!(counter.count(b"AA"), 2);
        assert_eq!(counter.count(b"AC"), 1);
        let stats = counter.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.distinct, 2);
        assert_eq!(stats.singletons, 1);
        assert_eq!(stats.histogram, BTreeMap::from([(1, 1), (2, 1)]));
    }

    #[test]
    fn test_windows_spanning_ambiguous_bases_skipped() {
        let mut counter = KmerCounter::new(3).unwrap();
        counter.add_sequence(b"ACGNTTT");

        assert_eq!(counter.count(b"ACG"), 1);
        assert_eq!(counter.count(b"TTT"), 1);
        assert_eq!(counter.statistics().total, 2);
    }

    #[test]
    fn test_sequence_shorter_than_k() {
        let mut counter = KmerCounter::new(36).unwrap();
        counter.add_sequence(b"ACGT");
        assert_eq!(counter.statistics().distinct, 0);
    }

    #[test]
    fn test_sorted_counts_and_report() {
        let mut counter = KmerCounter::new(1).unwrap();
        counter.add_sequence(b"TGCA");
        counter.add_sequence(b"AA");
        let kmers: Vec<_> = counter.sorted_counts();
        assert_eq!(kmers[0], (&b"A"[..], 3));
        assert_eq!(kmers[3], (&b"T"[..], 1));

        let mut out = Vec::new();
        write_statistics(&mut out, &counter.statistics()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("k\t1\ntotal\t6\ndistinct\t4\nsingletons\t3\n"));
        assert!(text.ends_with("1\t3\n3\t1\n"));
    }
}
