use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read placements per contig, as produced by the read linker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadCoverage {
    pub average_read_length: f64,
    /// Start positions of reads, one list per contig in contig order.
    pub read_locations: Vec<Vec<i64>>,
}

impl ReadCoverage {
    pub fn contig_count(&self) -> usize {
        self.read_locations.len()
    }

    /// Reads a placement listing:
    ///
    /// ```text
    /// # comment
    /// <contig count> <average read length>
    /// <n> <start_1> ... <start_n>     (one line per contig)
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut header: Option<(usize, f64)> = None;
        let mut read_locations = Vec::new();
        let mut last_line = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let line_number = index as u64 + 1;
            last_line = line_number;

            let data = line.split('#').next().unwrap_or("").trim();
            if data.is_empty() {
                continue;
            }
            let fields: Vec<&str> = data.split_whitespace().collect();

            match header {
                None => {
                    if fields.len() != 2 {
                        return Err(Error::format(
                            path,
                            line_number,
                            "expected '<contig count> <average read length>'",
                        ));
                    }
                    let count = fields[0].parse::<usize>().map_err(|_| {
                        let message = format!("invalid contig count '{}'", fields[0]);
                        Error::format(path, line_number, message)
                    })?;
                    let average = fields[1]
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && *v >= 0.0)
                        .ok_or_else(|| {
                            Error::format(
                                path,
                                line_number,
                                format!("invalid average read length '{}'", fields[1]),
                            )
                        })?;
                    read_locations.reserve(count);
                    header = Some((count, average));
                }
                Some((count, _)) => {
                    if read_locations.len() == count {
                        return Err(Error::format(
                            path,
                            line_number,
                            format!("more than {} contig lines", count),
                        ));
                    }
                    read_locations.push(parse_contig_line(&fields, path, line_number)?);
                }
            }
        }

        let Some((count, average_read_length)) = header else {
            return Err(Error::format(path, last_line, "missing coverage header"));
        };
        if read_locations.len() != count {
            return Err(Error::format(
                path,
                last_line,
                format!("expected {} contig lines, found {}", count, read_locations.len()),
            ));
        }

        Ok(Self {
            average_read_length,
            read_locations,
        })
    }
}

fn parse_contig_line(fields: &[&str], path: &Path, line_number: u64) -> Result<Vec<i64>> {
    let declared = fields[0].parse::<usize>().map_err(|_| {
        Error::format(path, line_number, format!("invalid read count '{}'", fields[0]))
    })?;
    let starts = fields[1..]
        .iter()
        .map(|field| {
            field.parse::<i64>().map_err(|_| {
                Error::format(path, line_number, format!("invalid start position '{}'", field))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if starts.len() != declared {
        return Err(Error::format(
            path,
            line_number,
            format!("declared {} reads, found {}", declared, starts.len()),
        ));
    }
    Ok(starts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<ReadCoverage> {
        ReadCoverage::from_reader(Cursor::new(text), Path::new("coverage.txt"))
    }

    #[test]
    fn test_parse_listing() {
        let coverage = parse("# linker output\n2 36.5\n3 -4 0 17\n\n0\n").unwrap();
        assert_eq!(coverage.contig_count(), 2);
        assert_eq!(coverage.average_read_length, 36.5);
        assert_eq!(coverage.read_locations[0], vec![-4, 0, 17]);
        assert!(coverage.read_locations[1].is_empty());
    }

    #[test]
    fn test_missing_contig_line() {
        let err = parse("2 36\n1 5\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_extra_contig_line() {
        let err = parse("1 36\n1 5\n1 9\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
    }

    #[test]
    fn test_read_count_mismatch() {
        let err = parse("1 36\n2 5\n").unwrap_err();
        assert!(err.to_string().contains("declared 2 reads, found 1"));
    }

    #[test]
    fn test_non_finite_read_length_rejected() {
        for header in ["1 inf", "1 NaN", "1 -3"] {
            let err = parse(&format!("{}\n1 2\n", header)).unwrap_err();
            assert!(matches!(err, Error::Format { line: 1, .. }), "accepted '{}'", header);
        }
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse("").unwrap_err(), Error::Format { .. }));
    }
}
