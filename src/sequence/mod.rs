mod reader;
mod record;
mod writer;

pub use reader::{
    Fasta, FastaReader, Fastq, FastqReader, LineSource, Records, SequenceFormat, SequenceReader,
};
pub use record::{FastaRecord, FastqRecord, SequenceRecord};
pub use writer::WriteRecords;

use crate::error::{Error, Result};
use std::path::Path;

/// Reads every record of `path`, failing if the file holds none.
pub fn read_nonempty<F: SequenceFormat>(path: &Path) -> Result<Vec<F::Record>> {
    let mut reader = SequenceReader::<F>::from_path(path)?;
    let records = reader.read_all()?;
    reader.close();

    if records.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}
