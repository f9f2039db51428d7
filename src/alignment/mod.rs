mod aligner;
mod breakpoints;
mod coords;

pub use aligner::{Aligner, BwaAligner, MummerAligner, MummerTiler, NovoAlignAligner};
pub use breakpoints::{BreakpointDetector, BreakpointKind, BreakpointTally};
pub use coords::{group_by_query, read_coords, AlignmentCoordinate};

use crate::config::Config;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignerKind {
    #[value(name = "bwa")]
    Bwa,
    #[value(name = "novoalign")]
    NovoAlign,
    #[value(name = "mummer")]
    Mummer,
    #[value(name = "mummer-tiling")]
    MummerTiling,
}

impl AlignerKind {
    pub fn build(self, reference: PathBuf, query: PathBuf, config: &Config) -> Box<dyn Aligner> {
        let tmp_dir = config.tmp_dir.clone();
        match self {
            AlignerKind::Bwa => Box::new(BwaAligner::new(
                reference,
                query,
                config.bwa.clone(),
                tmp_dir,
            )),
            AlignerKind::NovoAlign => Box::new(NovoAlignAligner::new(
                reference,
                query,
                config.novoalign.clone(),
                tmp_dir,
            )),
            AlignerKind::Mummer => Box::new(MummerAligner::new(
                reference,
                query,
                config.mummer.clone(),
                tmp_dir,
            )),
            AlignerKind::MummerTiling => Box::new(MummerTiler::new(
                reference,
                query,
                config.mummer.clone(),
                tmp_dir,
            )),
        }
    }
}
