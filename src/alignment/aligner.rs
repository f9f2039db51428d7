use crate::config::{BwaConfig, CommandTemplate, MummerConfig, NovoAlignConfig};
use crate::error::{Error, Result};
use crate::utils::external_tools::{check_tool, run};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const BWA_INDEX_EXTENSIONS: [&str; 8] = [
    ".amb", ".ann", ".bwt", ".pac", ".rbwt", ".rpac", ".rsa", ".sa",
];

/// Wrapper around an external alignment pipeline.
pub trait Aligner {
    /// Aligns the query file against the reference file.
    ///
    /// Writes to `output` when given, otherwise to a fresh file in the
    /// scratch directory. On failure the partial output is removed.
    fn align(&mut self, output: Option<&Path>) -> Result<PathBuf>;

    /// Output of the last successful `align` call.
    fn output_file(&self) -> Option<&Path>;
}

/// Intermediate files of one pipeline run, removed when dropped.
#[derive(Default)]
struct Scratch {
    reserved: Vec<TempPath>,
    derived: Vec<PathBuf>,
}

impl Scratch {
    fn reserve(&mut self, dir: &Path) -> Result<PathBuf> {
        let path = reserve_path(dir)?;
        let owned = path.to_path_buf();
        self.reserved.push(path);
        Ok(owned)
    }

    /// Tracks a file that a tool creates next to `base`.
    fn derive(&mut self, base: &Path, suffix: &str) -> PathBuf {
        let path = PathBuf::from(format!("{}{}", base.display(), suffix));
        self.derived.push(path.clone());
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        for path in &self.derived {
            if path.exists() {
                remove_logged(path);
            }
        }
    }
}

fn reserve_path(dir: &Path) -> Result<TempPath> {
    tempfile::Builder::new()
        .prefix("scaffold-tools.")
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| Error::io(dir, e))
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn check_tools(templates: &[&CommandTemplate]) -> Result<()> {
    for template in templates {
        check_tool(&template.program)?;
    }
    Ok(())
}

/// Input and output bookkeeping shared by every aligner.
struct AlignerFiles {
    reference: PathBuf,
    query: PathBuf,
    tmp_dir: PathBuf,
    output: Option<PathBuf>,
    remove_output: bool,
}

impl AlignerFiles {
    fn new(reference: PathBuf, query: PathBuf, tmp_dir: PathBuf) -> Self {
        Self {
            reference,
            query,
            tmp_dir,
            output: None,
            remove_output: false,
        }
    }

    /// Returns the output path and whether it was reserved here rather than
    /// named by the caller.
    fn begin(&mut self, output: Option<&Path>) -> Result<(PathBuf, bool)> {
        self.output = None;
        match output {
            Some(path) => Ok((path.to_path_buf(), false)),
            None => reserve_path(&self.tmp_dir)?
                .keep()
                .map(|path| (path, true))
                .map_err(|e| Error::io(&self.tmp_dir, e.error)),
        }
    }

    /// A caller-named output is only removed once the step writing it has started.
    fn finish(
        &mut self,
        target: PathBuf,
        reserved: bool,
        writing: bool,
        result: Result<()>,
    ) -> Result<PathBuf> {
        match result {
            Ok(()) => {
                debug!("Alignment written to {}", target.display());
                self.output = Some(target.clone());
                Ok(target)
            }
            Err(e) => {
                if (reserved || writing) && target.exists() {
                    remove_logged(&target);
                }
                Err(e)
            }
        }
    }
}

fn remove_logged(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

impl Drop for AlignerFiles {
    fn drop(&mut self) {
        if let (true, Some(output)) = (self.remove_output, &self.output) {
            remove_logged(output);
        }
    }
}

macro_rules! impl_aligner {
    ($name:ident) => {
        impl $name {
            /// Delete the output file when the aligner is dropped.
            pub fn remove_output(mut self, remove: bool) -> Self {
                self.files.remove_output = remove;
                self
            }
        }

        impl Aligner for $name {
            fn align(&mut self, output: Option<&Path>) -> Result<PathBuf> {
                let (target, reserved) = self.files.begin(output)?;
                let mut writing = false;
                let result = self.pipeline(&target, &mut writing);
                self.files.finish(target, reserved, writing, result)
            }

            fn output_file(&self) -> Option<&Path> {
                self.files.output.as_deref()
            }
        }
    };
}

/// Single-end BWA: `index`, `aln`, then `samse`.
pub struct BwaAligner {
    files: AlignerFiles,
    config: BwaConfig,
}

impl BwaAligner {
    pub fn new(
        reference: impl Into<PathBuf>,
        query: impl Into<PathBuf>,
        config: BwaConfig,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            files: AlignerFiles::new(reference.into(), query.into(), tmp_dir.into()),
            config,
        }
    }

    fn pipeline(&self, output: &Path, writing: &mut bool) -> Result<()> {
        let config = &self.config;
        let suffix_array = if config.exact_match {
            &config.suffix_array_exact
        } else {
            &config.suffix_array
        };
        check_tools(&[&config.index, suffix_array, &config.align_single_end])?;

        let mut scratch = Scratch::default();
        let prefix = scratch.reserve(&self.files.tmp_dir)?;
        for extension in BWA_INDEX_EXTENSIONS {
            scratch.derive(&prefix, extension);
        }
        let sai = scratch.reserve(&self.files.tmp_dir)?;

        let prefix = lossy(&prefix);
        let sai = lossy(&sai);
        let reference = lossy(&self.files.reference);
        let query = lossy(&self.files.query);
        let threads = config.threads.to_string();
        let max_hits = (config.max_hits + 1).to_string();
        let output = lossy(output);

        run(&config.index.render(&[("prefix", &prefix), ("reference", &reference)]))?;
        run(&suffix_array.render(&[
            ("threads", &threads),
            ("sai", &sai),
            ("prefix", &prefix),
            ("query", &query),
        ]))?;
        *writing = true;
        run(&config.align_single_end.render(&[
            ("output", &output),
            ("max_hits", &max_hits),
            ("prefix", &prefix),
            ("sai", &sai),
            ("query", &query),
        ]))
    }
}

impl_aligner!(BwaAligner);

/// Single-end NovoAlign: `novoindex`, then `novoalign`.
pub struct NovoAlignAligner {
    files: AlignerFiles,
    config: NovoAlignConfig,
}

impl NovoAlignAligner {
    pub fn new(
        reference: impl Into<PathBuf>,
        query: impl Into<PathBuf>,
        config: NovoAlignConfig,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            files: AlignerFiles::new(reference.into(), query.into(), tmp_dir.into()),
            config,
        }
    }

    fn pipeline(&self, output: &Path, writing: &mut bool) -> Result<()> {
        let config = &self.config;
        check_tools(&[&config.index, &config.align_single_end])?;

        let mut scratch = Scratch::default();
        let prefix = lossy(&scratch.reserve(&self.files.tmp_dir)?);
        let reference = lossy(&self.files.reference);
        let query = lossy(&self.files.query);
        let output = lossy(output);

        run(&config.index.render(&[("prefix", &prefix), ("reference", &reference)]))?;
        *writing = true;
        run(&config.align_single_end.render(&[
            ("prefix", &prefix),
            ("query", &query),
            ("output", &output),
        ]))
    }
}

impl_aligner!(NovoAlignAligner);

/// MUMmer local alignment: `nucmer`, `delta-filter`, then `show-coords`.
pub struct MummerAligner {
    files: AlignerFiles,
    config: MummerConfig,
}

impl MummerAligner {
    pub fn new(
        reference: impl Into<PathBuf>,
        query: impl Into<PathBuf>,
        config: MummerConfig,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            files: AlignerFiles::new(reference.into(), query.into(), tmp_dir.into()),
            config,
        }
    }

    fn pipeline(&self, output: &Path, writing: &mut bool) -> Result<()> {
        let config = &self.config;
        check_tools(&[&config.nucmer, &config.delta_filter, &config.show_coords])?;

        let mut scratch = Scratch::default();
        let prefix = scratch.reserve(&self.files.tmp_dir)?;
        let delta = lossy(&scratch.derive(&prefix, ".delta"));
        let filtered = lossy(&scratch.reserve(&self.files.tmp_dir)?);
        let prefix = lossy(&prefix);
        let reference = lossy(&self.files.reference);
        let query = lossy(&self.files.query);
        let output = lossy(output);

        run(&config.nucmer.render(&[
            ("prefix", &prefix),
            ("reference", &reference),
            ("query", &query),
        ]))?;
        run(&config.delta_filter.render(&[("delta", &delta), ("filtered", &filtered)]))?;
        *writing = true;
        run(&config.show_coords.render(&[("delta", &filtered), ("output", &output)]))
    }
}

impl_aligner!(MummerAligner);

/// MUMmer tiling of the query contigs along the reference: `nucmer`, then `show-tiling`.
pub struct MummerTiler {
    files: AlignerFiles,
    config: MummerConfig,
}

impl MummerTiler {
    pub fn new(
        reference: impl Into<PathBuf>,
        query: impl Into<PathBuf>,
        config: MummerConfig,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            files: AlignerFiles::new(reference.into(), query.into(), tmp_dir.into()),
            config,
        }
    }

    fn pipeline(&self, output: &Path, writing: &mut bool) -> Result<()> {
        let config = &self.config;
        check_tools(&[&config.nucmer, &config.show_tiling])?;

        let mut scratch = Scratch::default();
        let prefix = scratch.reserve(&self.files.tmp_dir)?;
        let delta = lossy(&scratch.derive(&prefix, ".delta"));
        let prefix = lossy(&prefix);
        let reference = lossy(&self.files.reference);
        let query = lossy(&self.files.query);
        let output = lossy(output);

        run(&config.nucmer.render(&[
            ("prefix", &prefix),
            ("reference", &reference),
            ("query", &query),
        ]))?;
        *writing = true;
        run(&config.show_tiling.render(&[("delta", &delta), ("output", &output)]))
    }
}

impl_aligner!(MummerTiler);

#[cfg(test)]
mod tests {
    use super::*;

    fn stand_in(program: &str, stdout: bool) -> CommandTemplate {
        let template = CommandTemplate::new(program, &["{prefix}"]);
        if stdout {
            template.with_stdout("{output}")
        } else {
            template
        }
    }

    fn mummer_with(last_step: &str) -> MummerConfig {
        MummerConfig {
            nucmer: CommandTemplate::new("true", &["-p", "{prefix}"]),
            delta_filter: CommandTemplate::new("true", &[]).with_stdout("{filtered}"),
            show_coords: stand_in(last_step, true),
            show_tiling: stand_in(last_step, true),
        }
    }

    #[test]
    fn test_successful_run_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("coords.tsv");
        let mut aligner = MummerAligner::new("ref.fa", "scf.fa", mummer_with("true"), dir.path());

        let written = aligner.align(Some(&output)).unwrap();
        assert_eq!(written, output);
        assert!(output.exists());
        assert_eq!(aligner.output_file(), Some(output.as_path()));

        // Only the output survives in the scratch directory.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_step_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("coords.tsv");
        let mut aligner = MummerTiler::new("ref.fa", "scf.fa", mummer_with("false"), dir.path());

        let err = aligner.align(Some(&output)).unwrap_err();
        assert!(matches!(err, Error::External { .. }));
        assert!(!output.exists());
        assert!(aligner.output_file().is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_program_fails_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = NovoAlignConfig {
            index: CommandTemplate::new("no-such-novoindex", &[]),
            align_single_end: stand_in("true", true),
        };
        let mut aligner = NovoAlignAligner::new("ref.fa", "reads.fq", config, dir.path());

        let err = aligner.align(None).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { ref tool } if tool == "no-such-novoindex"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_output_kept_when_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("existing.sam");
        fs::write(&output, "user data").unwrap();
        let config = NovoAlignConfig {
            index: CommandTemplate::new("no-such-novoindex", &[]),
            align_single_end: stand_in("true", true),
        };
        let mut aligner = NovoAlignAligner::new("ref.fa", "reads.fq", config, dir.path());

        let err = aligner.align(Some(&output)).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "user data");
    }

    #[test]
    fn test_existing_output_kept_when_early_step_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("existing.tsv");
        fs::write(&output, "user data").unwrap();
        let config = MummerConfig {
            nucmer: CommandTemplate::new("false", &[]),
            ..mummer_with("true")
        };
        let mut aligner = MummerAligner::new("ref.fa", "scf.fa", config, dir.path());

        let err = aligner.align(Some(&output)).unwrap_err();
        assert!(matches!(err, Error::External { ref tool, .. } if tool == "false"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "user data");
    }

    #[test]
    fn test_remove_output_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let config = BwaConfig {
            index: CommandTemplate::new("true", &[]),
            suffix_array: CommandTemplate::new("true", &[]),
            suffix_array_exact: CommandTemplate::new("true", &[]),
            align_single_end: stand_in("true", true),
            ..BwaConfig::default()
        };
        let output = {
            let mut aligner =
                BwaAligner::new("ref.fa", "reads.fq", config, dir.path()).remove_output(true);
            let output = aligner.align(None).unwrap();
            assert!(output.exists());
            output
        };
        assert!(!output.exists());
    }
}
