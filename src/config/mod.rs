#[allow(clippy::module_inception)]
mod config;

pub use config::{
    BwaConfig, CommandTemplate, Config, MummerConfig, NovoAlignConfig, RenderedCommand,
};
