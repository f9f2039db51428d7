use super::coords::AlignmentCoordinate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointKind {
    /// Adjacent hits land on different reference sequences.
    Join,
    /// Relative orientation of the two hits differs between reference and query.
    Orientation,
    /// Reference positions do not increase along the query.
    Order,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakpointTally {
    pub total: u64,
    pub joins: u64,
    pub orientation: u64,
    pub order: u64,
}

impl BreakpointTally {
    fn record(&mut self, kind: BreakpointKind) {
        self.total += 1;
        match kind {
            BreakpointKind::Join => self.joins += 1,
            BreakpointKind::Orientation => self.orientation += 1,
            BreakpointKind::Order => self.order += 1,
        }
    }
}

/// Counts structural breakpoints between consecutive alignments of a query.
#[derive(Debug, Default)]
pub struct BreakpointDetector {
    tally: BreakpointTally,
}

impl BreakpointDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks are applied in order and the first match wins.
    pub fn classify(a: &AlignmentCoordinate, b: &AlignmentCoordinate) -> Option<BreakpointKind> {
        if a.reference_id != b.reference_id {
            return Some(BreakpointKind::Join);
        }
        let reference_flip = a.is_reference_reverse ^ b.is_reference_reverse;
        let query_flip = a.is_query_reverse ^ b.is_query_reverse;
        if reference_flip != query_flip {
            return Some(BreakpointKind::Orientation);
        }
        if a.reference_position >= b.reference_position
            && a.is_reference_reverse == a.is_query_reverse
        {
            return Some(BreakpointKind::Order);
        }
        None
    }

    /// Classifies the transition from `a` to `b` and tallies it.
    pub fn is_breakpoint(&mut self, a: &AlignmentCoordinate, b: &AlignmentCoordinate) -> bool {
        match Self::classify(a, b) {
            Some(kind) => {
                self.tally.record(kind);
                true
            }
            None => false,
        }
    }

    /// Sums breakpoints over every maximal run of coordinates sharing a query.
    ///
    /// `coords` must already be grouped by query; pairs are only compared
    /// within a run.
    pub fn process_alignments(&mut self, coords: &[AlignmentCoordinate]) -> u64 {
        coords
            .chunk_by(|a, b| a.query_id == b.query_id)
            .map(|group| self.process_group(group))
            .sum()
    }

    fn process_group(&mut self, group: &[AlignmentCoordinate]) -> u64 {
        group
            .windows(2)
            .filter(|pair| self.is_breakpoint(&pair[0], &pair[1]))
            .count() as u64
    }

    pub fn tally(&self) -> BreakpointTally {
        self.tally
    }
}
