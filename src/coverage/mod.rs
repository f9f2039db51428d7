mod depth;
mod read_coverage;

pub use depth::{
    compute_depth, summary_statistics, write_depth, write_summary, ContigSummary, CoverageTable,
};
pub use read_coverage::ReadCoverage;
