use scaffold_tools::coverage::{compute_depth, summary_statistics, write_depth, ReadCoverage};
use scaffold_tools::error::Error;
use scaffold_tools::sequence::{read_nonempty, Fasta};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

#[test]
fn depth_and_summary_from_files() {
    let contigs = write_temp(">ctg1\nAAAAAAAAAA\n>ctg2\nCCCC\n");
    let placements = write_temp("# two contigs, reads of ~5 bases\n2 5.4\n2 8 -3\n1 0\n");

    let contigs = read_nonempty::<Fasta>(contigs.path()).expect("read contigs");
    let coverage = ReadCoverage::from_file(placements.path()).expect("read coverage");
    let depth = compute_depth(&coverage, &contigs).expect("compute depth");

    assert_eq!(depth.contig(0), Some(&[1, 1, 0, 0, 0, 0, 0, 0, 1, 1][..]));
    assert_eq!(depth.contig(1), Some(&[1, 1, 1, 1][..]));

    let summaries = summary_statistics(&contigs, &depth);
    assert_eq!(summaries[0].identifier, "ctg1");
    assert!((summaries[0].average_coverage - 0.4).abs() < 1e-9);
    assert_eq!(summaries[1].average_coverage, 1.0);

    let output = NamedTempFile::new().expect("create output file");
    write_depth(output.path(), &depth).expect("write depth");
    let written = fs::read_to_string(output.path()).expect("read depth output");
    assert_eq!(written.lines().count(), 14);
    assert_eq!(written.lines().nth(8), Some("1"));
}

#[test]
fn contig_count_mismatch_is_fatal() {
    let contigs = write_temp(">ctg1\nAAAA\n");
    let placements = write_temp("2 4\n0\n0\n");

    let contigs = read_nonempty::<Fasta>(contigs.path()).expect("read contigs");
    let coverage = ReadCoverage::from_file(placements.path()).expect("read coverage");
    let err = compute_depth(&coverage, &contigs).unwrap_err();

    assert!(matches!(err, Error::Consistency(_)));
    assert_eq!(err.exit_code(), 4);
}
