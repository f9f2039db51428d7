pub mod alignment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod error;
pub mod kmer;
pub mod read_diff;
pub mod sequence;
pub mod utils;

pub use error::{Error, Result};
