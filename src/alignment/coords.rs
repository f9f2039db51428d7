use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One local alignment between a reference and a query sequence.
///
/// Positions are the 1-based leftmost coordinates of the aligned region on
/// each sequence; orientation is carried separately.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentCoordinate {
    pub reference_id: String,
    pub query_id: String,
    pub reference_position: u64,
    pub query_position: u64,
    pub is_reference_reverse: bool,
    pub is_query_reverse: bool,
    pub reference_length: u64,
    pub query_length: u64,
    pub identity: f64,
}

impl AlignmentCoordinate {
    pub fn new(
        reference_id: impl Into<String>,
        query_id: impl Into<String>,
        reference_position: u64,
        query_position: u64,
        is_reference_reverse: bool,
        is_query_reverse: bool,
    ) -> Self {
        Self {
            reference_id: reference_id.into(),
            query_id: query_id.into(),
            reference_position,
            query_position,
            is_reference_reverse,
            is_query_reverse,
            reference_length: 0,
            query_length: 0,
            identity: 0.0,
        }
    }

    /// Number of aligned bases, taking the shorter side.
    pub fn aligned_bases(&self) -> u64 {
        self.reference_length.min(self.query_length)
    }

    /// Parses one `show-coords -T -H` row:
    /// `S1 E1 S2 E2 LEN1 LEN2 %IDY REF_TAG QUERY_TAG [...]`.
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 9 {
            return Err(format!("expected at least 9 columns, found {}", fields.len()));
        }

        let number = |index: usize, name: &str| -> std::result::Result<u64, String> {
            fields[index]
                .parse::<u64>()
                .map_err(|_| format!("invalid {} '{}'", name, fields[index]))
        };
        let s1 = number(0, "S1")?;
        let e1 = number(1, "E1")?;
        let s2 = number(2, "S2")?;
        let e2 = number(3, "E2")?;
        let reference_length = number(4, "LEN1")?;
        let query_length = number(5, "LEN2")?;
        let identity = fields[6]
            .parse::<f64>()
            .map_err(|_| format!("invalid %IDY '{}'", fields[6]))?;

        if fields[7].is_empty() || fields[8].is_empty() {
            return Err("missing sequence tag".to_string());
        }

        Ok(Self {
            reference_id: fields[7].to_string(),
            query_id: fields[8].to_string(),
            reference_position: s1.min(e1),
            query_position: s2.min(e2),
            is_reference_reverse: s1 > e1,
            is_query_reverse: s2 > e2,
            reference_length,
            query_length,
            identity,
        })
    }
}

/// Reads a tab-delimited MUMmer coordinate file.
///
/// Blank lines and banner/header lines (first field not numeric) are skipped.
pub fn read_coords(path: &Path) -> Result<Vec<AlignmentCoordinate>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut coords = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let first = line.split('\t').next().unwrap_or("").trim();
        if first.is_empty() || first.parse::<u64>().is_err() {
            continue;
        }
        let coord = AlignmentCoordinate::parse_line(&line)
            .map_err(|message| Error::format(path, index as u64 + 1, message))?;
        coords.push(coord);
    }
    Ok(coords)
}

/// Stable sort into contiguous per-query runs ordered along each query.
pub fn group_by_query(coords: &mut [AlignmentCoordinate]) {
    coords.sort_by(|a, b| {
        a.query_id
            .cmp(&b.query_id)
            .then(a.query_position.cmp(&b.query_position))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forward_row() {
        let coord =
            AlignmentCoordinate::parse_line("100\t599\t1\t500\t500\t500\t99.80\tchr1\tscaffold_7")
                .unwrap();
        assert_eq!(coord.reference_id, "chr1");
        assert_eq!(coord.query_id, "scaffold_7");
        assert_eq!(coord.reference_position, 100);
        assert_eq!(coord.query_position, 1);
        assert!(!coord.is_reference_reverse);
        assert!(!coord.is_query_reverse);
        assert_eq!(coord.aligned_bases(), 500);
    }

    #[test]
    fn test_parse_reverse_query() {
        let row = "100\t599\t800\t301\t500\t500\t97.5\tchr1\tscf";
        let coord = AlignmentCoordinate::parse_line(row).unwrap();
        assert!(coord.is_query_reverse);
        assert_eq!(coord.query_position, 301);
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let err = AlignmentCoordinate::parse_line("1\t2\t3").unwrap_err();
        assert!(err.contains("9 columns"));
    }

    #[test]
    fn test_group_by_query_keeps_runs_contiguous() {
        let mut coords = vec![
            AlignmentCoordinate::new("r", "q2", 10, 5, false, false),
            AlignmentCoordinate::new("r", "q1", 30, 9, false, false),
            AlignmentCoordinate::new("r", "q2", 1, 1, false, false),
            AlignmentCoordinate::new("r", "q1", 20, 2, false, false),
        ];
        group_by_query(&mut coords);
        let order: Vec<(&str, u64)> = coords
            .iter()
            .map(|c| (c.query_id.as_str(), c.query_position))
            .collect();
        assert_eq!(order, vec![("q1", 2), ("q1", 9), ("q2", 1), ("q2", 5)]);
    }
}
