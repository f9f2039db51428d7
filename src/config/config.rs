use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// An external command line with `{name}` placeholders.
///
/// When `stdout` is set, the rendered value names the file that receives the
/// program's standard output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTemplate {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub stdout: Option<String>,
}

/// A command with every placeholder substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub stdout: Option<PathBuf>,
}

impl CommandTemplate {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            stdout: None,
        }
    }

    pub fn with_stdout(mut self, target: &str) -> Self {
        self.stdout = Some(target.to_string());
        self
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> RenderedCommand {
        let substitute = |template: &str| {
            vars.iter().fold(template.to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{}}}", name), value)
            })
        };
        RenderedCommand {
            program: self.program.clone(),
            args: self.args.iter().map(|arg| substitute(arg)).collect(),
            stdout: self.stdout.as_deref().map(|target| PathBuf::from(substitute(target))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BwaConfig {
    pub threads: usize,
    pub max_hits: usize,
    pub exact_match: bool,
    pub index: CommandTemplate,
    pub suffix_array: CommandTemplate,
    pub suffix_array_exact: CommandTemplate,
    pub align_single_end: CommandTemplate,
}

impl Default for BwaConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            max_hits: 1,
            exact_match: false,
            index: CommandTemplate::new("bwa", &["index", "-p", "{prefix}", "{reference}"]),
            suffix_array: CommandTemplate::new(
                "bwa",
                &["aln", "-t", "{threads}", "-f", "{sai}", "{prefix}", "{query}"],
            ),
            suffix_array_exact: CommandTemplate::new(
                "bwa",
                &[
                    "aln", "-n", "0", "-o", "0", "-t", "{threads}", "-f", "{sai}", "{prefix}",
                    "{query}",
                ],
            ),
            align_single_end: CommandTemplate::new(
                "bwa",
                &["samse", "-f", "{output}", "-n", "{max_hits}", "{prefix}", "{sai}", "{query}"],
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NovoAlignConfig {
    pub index: CommandTemplate,
    pub align_single_end: CommandTemplate,
}

impl Default for NovoAlignConfig {
    fn default() -> Self {
        Self {
            index: CommandTemplate::new("novoindex", &["{prefix}", "{reference}"]),
            align_single_end: CommandTemplate::new(
                "novoalign",
                &["-d", "{prefix}", "-f", "{query}", "-o", "SAM", "-r", "All"],
            )
            .with_stdout("{output}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MummerConfig {
    pub nucmer: CommandTemplate,
    pub delta_filter: CommandTemplate,
    pub show_coords: CommandTemplate,
    pub show_tiling: CommandTemplate,
}

impl Default for MummerConfig {
    fn default() -> Self {
        Self {
            nucmer: CommandTemplate::new("nucmer", &["-p", "{prefix}", "{reference}", "{query}"]),
            delta_filter: CommandTemplate::new("delta-filter", &["-1", "{delta}"])
                .with_stdout("{filtered}"),
            show_coords: CommandTemplate::new("show-coords", &["-T", "-H", "-r", "{delta}"])
                .with_stdout("{output}"),
            show_tiling: CommandTemplate::new("show-tiling", &["{delta}"]).with_stdout("{output}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scratch directory for aligner temporaries.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: PathBuf,
    #[serde(default)]
    pub bwa: BwaConfig,
    #[serde(default)]
    pub novoalign: NovoAlignConfig,
    #[serde(default)]
    pub mummer: MummerConfig,
}

fn default_tmp_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmp_dir: default_tmp_dir(),
            bwa: BwaConfig::default(),
            novoalign: NovoAlignConfig::default(),
            mummer: MummerConfig::default(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the user's config directory, or defaults.
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("org", "scaffoldtools", "scaffold-tools") {
            let config_path = proj_dirs.config_dir().join("config.toml");

            if config_path.exists() {
                match Self::from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_tmp_dir(mut self, tmp_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = tmp_dir {
            self.tmp_dir = dir;
        }
        self
    }
}
