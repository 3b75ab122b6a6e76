use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InterflatError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Candidate discovery configuration
    pub discovery: DiscoveryConfig,

    /// Flattening/generation settings
    pub generation: GenerationConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Source directories to scan for interface declarations
    pub source_dirs: Vec<PathBuf>,

    /// Directory generated files are written to
    pub generated_dir: PathBuf,
}

/// The fixed external contract marking flattening candidates: two attributes
/// plus a naming convention (see `GenerationMode` for when each applies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Marker attribute every candidate must carry
    pub marker_attribute: String,

    /// Second attribute whose argument selects the object model
    pub model_attribute: String,

    /// Required first argument of the model attribute
    pub model_argument: String,

    /// Prefix marking an interface name as internal (stripped on output)
    pub internal_prefix: String,
}

/// Output strategy for the synthesized declaration.
///
/// `Fragment` relies on the compiler merging the generated partial with the
/// user's own fragment, and inter-fragment member ordering is unspecified by
/// the language; it is retained only as a legacy/debug path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Full,
    Fragment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Full (self-contained, default) or fragment (compiler-merged) output
    pub mode: GenerationMode,

    /// Maximum ancestor chain depth before a chain is treated as malformed
    pub max_chain_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Include a metadata header (tool version) in generated files
    pub include_metadata: bool,

    /// Emit #region/#endregion provenance markers around ancestor members
    pub emit_regions: bool,

    /// Suffix appended to the public name to form the output file name
    pub file_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                source_dirs: vec![PathBuf::from("src")],
                generated_dir: PathBuf::from("generated"),
            },
            discovery: DiscoveryConfig {
                marker_attribute: "BindingInterface".to_string(),
                model_attribute: "InheritanceModel".to_string(),
                model_argument: "None".to_string(),
                internal_prefix: "_".to_string(),
            },
            generation: GenerationConfig {
                mode: GenerationMode::Full,
                max_chain_depth: 64,
            },
            output: OutputConfig {
                include_metadata: true,
                emit_regions: true,
                file_suffix: ".g.cs".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| InterflatError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| InterflatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Interflat.toml",
                    "interflat.toml",
                    ".interflat.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
