use crate::alignment::AlignerKind;
use crate::kmer::DEFAULT_KMER_LENGTH;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Utilities for evaluating scaffolds and read sets",
    long_about = None
)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to config.toml in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scratch path for temporary files
    #[arg(long = "tmp", global = true)]
    pub tmp_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceFileFormat {
    #[default]
    #[value(name = "fasta")]
    Fasta,
    #[value(name = "fastq")]
    Fastq,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count scaffold breakpoints using MUMmer local alignments
    Breakpoints {
        /// Reference sequences (FASTA)
        reference: PathBuf,
        /// Scaffolds to evaluate (FASTA)
        scaffolds: PathBuf,
        /// Minimum number of aligned bases to take into account
        #[arg(long, default_value = "90")]
        min_bases: u64,
        /// Use an existing show-coords table instead of running MUMmer
        #[arg(long)]
        coords: Option<PathBuf>,
    },

    /// Calculate per-base coverage depth and average coverage per contig
    Coverage {
        /// Contig sequences (FASTA)
        contigs: PathBuf,
        /// Read placement listing
        coverage: PathBuf,
        /// Write per-base depth, one value per line
        #[arg(long)]
        depth: Option<PathBuf>,
        /// Print the per-contig summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create k-mer count statistics
    Kmer {
        /// Input sequences
        input: PathBuf,
        /// K-mer length
        #[arg(short, long, default_value_t = DEFAULT_KMER_LENGTH)]
        kmer: usize,
        /// Also list every k-mer with its count
        #[arg(long)]
        list: bool,
        #[arg(long, value_enum, default_value_t)]
        format: SequenceFileFormat,
    },

    /// Write the reads of A that are not in B (out = A - B)
    ReadDiff {
        a: PathBuf,
        b: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: SequenceFileFormat,
    },

    /// Align a query file to a reference with an external aligner
    Align {
        #[arg(long, value_enum)]
        aligner: AlignerKind,
        reference: PathBuf,
        query: PathBuf,
        /// Output file for the alignment
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coverage_command() {
        let args = Args::try_parse_from([
            "scaffold-tools",
            "coverage",
            "contigs.fa",
            "links.cov",
            "--depth",
            "depth.txt",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Coverage { contigs, depth, json, .. } => {
                assert_eq!(contigs, PathBuf::from("contigs.fa"));
                assert_eq!(depth, Some(PathBuf::from("depth.txt")));
                assert!(!json);
            }
            _ => panic!("expected coverage command"),
        }
    }

    #[test]
    fn test_kmer_defaults() {
        let args = Args::try_parse_from(["scaffold-tools", "kmer", "reads.fa"]).unwrap();
        match args.command {
            Commands::Kmer { kmer, list, format, .. } => {
                assert_eq!(kmer, 36);
                assert!(!list);
                assert_eq!(format, SequenceFileFormat::Fasta);
            }
            _ => panic!("expected kmer command"),
        }
    }

    #[test]
    fn test_missing_positional_is_rejected() {
        assert!(Args::try_parse_from(["scaffold-tools", "read-diff", "a.fa", "b.fa"]).is_err());
    }
}
