use super::record::{FastaRecord, FastqRecord};
use crate::error::{Error, Result};
use bio::io::{fasta, fastq};
use std::path::Path;

/// Record types that can be written back out in their own format.
pub trait WriteRecords: Sized {
    fn write_all(path: &Path, records: &[Self]) -> Result<()>;
}

impl WriteRecords for FastaRecord {
    fn write_all(path: &Path, records: &[Self]) -> Result<()> {
        let mut writer = fasta::Writer::to_file(path).map_err(|e| Error::io(path, e))?;
        for record in records {
            writer
                .write(&record.identifier, None, record.nucleotides.as_bytes())
                .map_err(|e| Error::io(path, e))?;
        }
        writer.flush().map_err(|e| Error::io(path, e))
    }
}

impl WriteRecords for FastqRecord {
    fn write_all(path: &Path, records: &[Self]) -> Result<()> {
        let mut writer = fastq::Writer::to_file(path).map_err(|e| Error::io(path, e))?;
        for record in records {
            writer
                .write(
                    &record.identifier,
                    None,
                    record.nucleotides.as_bytes(),
                    record.quality.as_bytes(),
                )
                .map_err(|e| Error::io(path, e))?;
        }
        writer.flush().map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::FastaReader;

    #[test]
    fn test_fasta_written_records_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fa");
        let records = vec![
            FastaRecord::new("ctg1 len=4", "ACGT"),
            FastaRecord::new("ctg2", "GGNN"),
        ];

        FastaRecord::write_all(&path, &records).unwrap();

        let mut reader = FastaReader::from_path(&path).unwrap();
        assert_eq!(reader.read_all().unwrap(), records);
    }
}
