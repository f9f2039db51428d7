use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Builds the stderr spinners shown while reading inputs or waiting on an aligner.
pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} [{elapsed_precise}] {msg}",
            message: message.into(),
            tick: None,
        }
    }

    pub(crate) fn with_tick(mut self, interval: Duration) -> Self {
        self.tick = Some(interval);
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(self.style_template)
            .map_err(|e| Error::Config(format!("invalid progress template: {}", e)))?;
        pb.set_style(style);
        pb.set_message(self.message);

        if let Some(interval) = self.tick {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}
