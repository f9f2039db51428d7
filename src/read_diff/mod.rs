use crate::sequence::SequenceRecord;
use std::collections::HashSet;

/// Records of `a` whose identifier does not occur in `b`, in the order of `a`.
pub fn difference<R: SequenceRecord>(a: Vec<R>, b: &[R]) -> Vec<R> {
    let excluded: HashSet<&str> = b.iter().map(|record| record.identifier()).collect();
    a.into_iter()
        .filter(|record| !excluded.contains(record.identifier()))
        .collect()
}
