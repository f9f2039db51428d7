use super::record::{FastaRecord, FastqRecord};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

const READ_BUFFER_SIZE: usize = 64 * 1024;
const COMPRESSED_EXTENSIONS: [&str; 4] = ["gz", "bz2", "xz", "zst"];

fn is_compressed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| COMPRESSED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Line-oriented view of an input file with one line of lookahead.
///
/// Lines are handed out with their terminator (`\n` or `\r\n`) removed.
/// A line that turns out to belong to the next record is handed back with
/// [`LineSource::push_back`] and returned again by the following call.
pub struct LineSource {
    path: PathBuf,
    reader: BufReader<Box<dyn Read>>,
    pending: Option<String>,
    line_number: u64,
}

impl LineSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let inner: Box<dyn Read> = if is_compressed(path) {
            let (decoder, _compression) = niffler::get_reader(Box::new(file)).map_err(|e| {
                Error::io(path, io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
            })?;
            Box::new(decoder)
        } else {
            Box::new(file)
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, inner),
            pending: None,
            line_number: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based number of the line most recently returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| Error::io(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    pub fn push_back(&mut self, line: String) {
        debug_assert!(self.pending.is_none(), "only one line of lookahead");
        self.pending = Some(line);
    }
}

/// Record layout of a flat sequence file.
pub trait SequenceFormat {
    type Record;

    /// First character of every header line.
    const MARKER: char;
    const NAME: &'static str;

    /// Reads everything after the header line up to the next record.
    fn read_body(lines: &mut LineSource, identifier: String) -> Result<Self::Record>;

    fn count_records(lines: &mut LineSource) -> Result<u64> {
        let mut count = 0;
        while let Some(line) = lines.next_line()? {
            if line.starts_with(Self::MARKER) {
                count += 1;
            }
        }
        Ok(count)
    }
}

pub struct Fasta;

impl SequenceFormat for Fasta {
    type Record = FastaRecord;

    const MARKER: char = '>';
    const NAME: &'static str = "FASTA";

    fn read_body(lines: &mut LineSource, identifier: String) -> Result<FastaRecord> {
        let mut nucleotides = String::new();
        while let Some(line) = lines.next_line()? {
            if line.starts_with(Self::MARKER) {
                lines.push_back(line);
                break;
            }
            nucleotides.push_str(line.trim_end());
        }
        nucleotides.make_ascii_uppercase();

        Ok(FastaRecord {
            identifier,
            nucleotides,
        })
    }
}

pub struct Fastq;

impl SequenceFormat for Fastq {
    type Record = FastqRecord;

    const MARKER: char = '@';
    const NAME: &'static str = "FASTQ";

    // Quality scores are read from exactly one line after the `+` separator;
    // wrapped quality blocks are not supported.
    fn read_body(lines: &mut LineSource, identifier: String) -> Result<FastqRecord> {
        let mut nucleotides = String::new();
        let mut quality = String::new();
        while let Some(line) = lines.next_line()? {
            if line.starts_with('+') {
                if let Some(scores) = lines.next_line()? {
                    quality.push_str(scores.trim_end());
                }
                break;
            }
            if line.starts_with(Self::MARKER) {
                lines.push_back(line);
                break;
            }
            nucleotides.push_str(line.trim_end());
        }
        nucleotides.make_ascii_uppercase();

        Ok(FastqRecord {
            identifier,
            nucleotides,
            quality,
        })
    }

    fn count_records(lines: &mut LineSource) -> Result<u64> {
        let mut count = 0;
        let mut in_quality = false;
        while let Some(line) = lines.next_line()? {
            if in_quality {
                // may legitimately start with '@'
                in_quality = false;
                continue;
            }
            if line.starts_with(Self::MARKER) {
                count += 1;
            } else if line.starts_with('+') {
                in_quality = true;
            }
        }
        Ok(count)
    }
}

/// Streaming reader over one FASTA or FASTQ file.
///
/// The reader owns at most one open file. Reading is restartable only by
/// closing and re-opening. The record count is computed on demand from a
/// separate handle and cached until the reader is closed or re-opened.
pub struct SequenceReader<F: SequenceFormat> {
    source: Option<LineSource>,
    record_count: Option<u64>,
    format: PhantomData<F>,
}

pub type FastaReader = SequenceReader<Fasta>;
pub type FastqReader = SequenceReader<Fastq>;

impl<F: SequenceFormat> std::fmt::Debug for SequenceReader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceReader")
            .field("format", &F::NAME)
            .field("path", &self.source.as_ref().map(|s| &s.path))
            .field("record_count", &self.record_count)
            .finish_non_exhaustive()
    }
}

impl<F: SequenceFormat> Default for SequenceReader<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SequenceFormat> SequenceReader<F> {
    pub fn new() -> Self {
        Self {
            source: None,
            record_count: None,
            format: PhantomData,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = Self::new();
        reader.open(path)?;
        Ok(reader)
    }

    /// Fails if the reader already holds an open file or `path` cannot be opened.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(source) = &self.source {
            return Err(Error::AlreadyOpen {
                path: source.path().to_path_buf(),
            });
        }
        self.source = Some(LineSource::open(path.as_ref())?);
        self.record_count = None;
        Ok(())
    }

    /// Returns false if there was nothing to close.
    pub fn close(&mut self) -> bool {
        self.record_count = None;
        self.source.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(|source| source.path())
    }

    /// Reads the next record, or `None` at the end of the stream.
    ///
    /// A header line without the format's marker is a fatal format error.
    /// End of file inside a record yields whatever was accumulated so far.
    pub fn read_next(&mut self) -> Result<Option<F::Record>> {
        let source = self.source.as_mut().ok_or(Error::NotOpen)?;

        let header = loop {
            match source.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        let identifier = match header.strip_prefix(F::MARKER) {
            Some(identifier) => identifier.to_string(),
            None => {
                return Err(Error::format(
                    source.path(),
                    source.line_number(),
                    format!("{} header does not start with '{}'", F::NAME, F::MARKER),
                ))
            }
        };

        F::read_body(source, identifier).map(Some)
    }

    /// Number of records in the whole file, independent of the read position.
    /// Returns 0 when no file is open.
    pub fn count_records(&mut self) -> Result<u64> {
        let Some(source) = &self.source else {
            return Ok(0);
        };
        if let Some(count) = self.record_count {
            return Ok(count);
        }

        let mut scan = LineSource::open(source.path())?;
        let count = F::count_records(&mut scan)?;
        self.record_count = Some(count);
        Ok(count)
    }

    /// Reads every remaining record in file order.
    pub fn read_all(&mut self) -> Result<Vec<F::Record>> {
        let mut records = Vec::with_capacity(self.count_records()? as usize);
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Iterates the remaining records. Iteration stops after the first error.
    pub fn records(&mut self) -> Records<'_, F> {
        Records {
            reader: self,
            failed: false,
        }
    }
}

pub struct Records<'a, F: SequenceFormat> {
    reader: &'a mut SequenceReader<F>,
    failed: bool,
}

impl<F: SequenceFormat> Iterator for Records<'_, F> {
    type Item = Result<F::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<F: SequenceFormat> std::iter::FusedIterator for Records<'_, F> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_push_back_returns_same_line() {
        let file = write_temp("one\r\ntwo\nthree");
        let mut lines = LineSource::open(file.path()).unwrap();

        assert_eq!(lines.next_line().unwrap().as_deref(), Some("one"));
        let second = lines.next_line().unwrap().unwrap();
        assert_eq!(second, "two");
        assert_eq!(lines.line_number(), 2);

        lines.push_back(second);
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(lines.line_number(), 2);
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn test_fastq_count_skips_quality_lines() {
        let file = write_temp("@r1\nACGT\n+\n@@@@\n@r2\nGG\n+r2\nII\n");
        let mut lines = LineSource::open(file.path()).unwrap();
        assert_eq!(Fastq::count_records(&mut lines).unwrap(), 2);
    }

    #[test]
    fn test_records_stop_after_first_error() {
        let file = write_temp("ACGT\nTTGA\n>a\nAC\n");
        let mut reader = FastaReader::from_path(file.path()).unwrap();

        let results: Vec<_> = reader.records().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::Format { line: 1, .. })));
    }

    #[test]
    fn test_compressed_extension_detection() {
        assert!(is_compressed(Path::new("reads.fq.gz")));
        assert!(is_compressed(Path::new("contigs.fa.zst")));
        assert!(!is_compressed(Path::new("contigs.fasta")));
        assert!(!is_compressed(Path::new("noext")));
    }
}
