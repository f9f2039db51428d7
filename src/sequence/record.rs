/// Common view over FASTA and FASTQ records.
pub trait SequenceRecord {
    fn identifier(&self) -> &str;
    fn nucleotides(&self) -> &str;

    fn len(&self) -> usize {
        self.nucleotides().len()
    }

    fn is_empty(&self) -> bool {
        self.nucleotides().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header line without the leading `>`.
    pub identifier: String,
    pub nucleotides: String,
}

impl FastaRecord {
    pub fn new(identifier: impl Into<String>, nucleotides: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            nucleotides: nucleotides.into(),
        }
    }
}

impl SequenceRecord for FastaRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn nucleotides(&self) -> &str {
        &self.nucleotides
    }
}

/// A FASTQ record. `quality` is expected to be as long as `nucleotides`
/// but the reader does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastqRecord {
    pub identifier: String,
    pub nucleotides: String,
    pub quality: String,
}

impl FastqRecord {
    pub fn new(
        identifier: impl Into<String>,
        nucleotides: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            nucleotides: nucleotides.into(),
            quality: quality.into(),
        }
    }
}

impl SequenceRecord for FastqRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn nucleotides(&self) -> &str {
        &self.nucleotides
    }
}

impl From<FastqRecord> for FastaRecord {
    fn from(record: FastqRecord) -> Self {
        FastaRecord {
            identifier: record.identifier,
            nucleotides: record.nucleotides,
        }
    }
}
