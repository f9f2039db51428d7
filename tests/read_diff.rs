use scaffold_tools::read_diff::difference;
use scaffold_tools::sequence::{Fastq, FastqReader, FastqRecord, SequenceReader, WriteRecords};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn difference_is_written_as_fastq() {
    let mut a = NamedTempFile::new().expect("create temp file");
    a.write_all(b"@r1\nACGT\n+\nIIII\n@r2\nGGTT\n+\nHHHH\n@r3\nTTAA\n+\nJJJJ\n")
        .expect("write reads");
    a.flush().expect("flush reads");
    let mut b = NamedTempFile::new().expect("create temp file");
    b.write_all(b"@r2\nNNNN\n+\n####\n").expect("write reads");
    b.flush().expect("flush reads");

    let first = FastqReader::from_path(a.path())
        .and_then(|mut reader| reader.read_all())
        .expect("read A");
    let second = SequenceReader::<Fastq>::from_path(b.path())
        .and_then(|mut reader| reader.read_all())
        .expect("read B");

    let remaining = difference(first, &second);
    let output = NamedTempFile::new().expect("create output file");
    FastqRecord::write_all(output.path(), &remaining).expect("write output");

    let written = FastqReader::from_path(output.path())
        .and_then(|mut reader| reader.read_all())
        .expect("read output");
    assert_eq!(
        written,
        vec![
            FastqRecord::new("r1", "ACGT", "IIII"),
            FastqRecord::new("r3", "TTAA", "JJJJ"),
        ]
    );
}
