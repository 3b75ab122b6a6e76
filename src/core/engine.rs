use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::InterflatError;
use super::emitter::Emitter;
use super::filter::CandidateFilter;
use super::frontend::CSharpFrontend;
use super::model::{DeclarationSet, GeneratedUnit};
use super::reconstructor::StructuralReconstructor;
use super::rewriter::NameRewriter;

/// Cooperative cancellation signal, checked between independent roots.
/// No partial output for a root is ever emitted.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one generation pass, before anything touches disk.
#[derive(Debug)]
pub struct PassOutcome {
    /// (file name, rendered content) in root discovery order
    pub units: Vec<(String, String)>,

    /// Roots skipped with their isolated failures
    pub skipped: Vec<(String, InterflatError)>,

    /// Number of candidate roots considered
    pub candidates: usize,
}

/// Main orchestration engine: snapshot, filter, flatten, emit.
pub struct Engine {
    config: Config,
    frontend: CSharpFrontend,
    filter: CandidateFilter,
    rewriter: NameRewriter,
    reconstructor: StructuralReconstructor,
    emitter: Emitter,
    cancel: CancelFlag,
}

impl Engine {
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let frontend = CSharpFrontend::new()?;
        let filter = CandidateFilter::new(&config.discovery, config.generation.mode);
        let rewriter = NameRewriter::new(config.discovery.internal_prefix.clone());
        let reconstructor =
            StructuralReconstructor::new(config.generation.mode, config.generation.max_chain_depth);
        let emitter = Emitter::new(&config.output);

        Ok(Self {
            config,
            frontend,
            filter,
            rewriter,
            reconstructor,
            emitter,
            cancel: CancelFlag::default(),
        })
    }

    /// Shared handle for wiring an external cancellation source (Ctrl-C).
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Write a starter configuration file.
    pub async fn init(&self, path: Option<PathBuf>, force: bool) -> Result<()> {
        let target = path
            .unwrap_or_else(|| PathBuf::from("."))
            .join("interflat.toml");

        if target.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
        }

        Config::default().save(&target)?;
        info!("Wrote {}", target.display());
        Ok(())
    }

    /// Run a full pass and write generated files.
    pub async fn generate(
        &mut self,
        source: Option<PathBuf>,
        output: Option<PathBuf>,
        force: bool,
    ) -> Result<()> {
        let sources = match source {
            Some(dir) => vec![dir],
            None => self.config.project.source_dirs.clone(),
        };
        let output_dir = output.unwrap_or_else(|| self.config.project.generated_dir.clone());

        let outcome = self.run_pass(&sources)?;

        let mut written = 0usize;
        let mut unchanged = 0usize;
        for (file_name, content) in &outcome.units {
            let path = output_dir.join(file_name);
            if self.emitter.write_if_changed(&path, content, force)? {
                info!("Generated {}", path.display());
                written += 1;
            } else {
                debug!("Unchanged {}", path.display());
                unchanged += 1;
            }
        }

        info!(
            "{} candidate(s): {} written, {} unchanged, {} skipped",
            outcome.candidates,
            written,
            unchanged,
            outcome.skipped.len()
        );
        Ok(())
    }

    /// Run a full pass without writing; report would-be outputs and stale
    /// files. With `fail_on_changes`, fail when anything is stale.
    pub async fn check(&mut self, fail_on_changes: bool, dump: bool) -> Result<()> {
        let sources = self.config.project.source_dirs.clone();
        let output_dir = self.config.project.generated_dir.clone();

        if dump {
            let snapshot = self.frontend.snapshot(&sources)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }

        let outcome = self.run_pass(&sources)?;

        let mut stale = 0usize;
        for (file_name, content) in &outcome.units {
            let path = output_dir.join(file_name);
            let current = std::fs::read_to_string(&path).unwrap_or_default();
            if current != *content {
                warn!("Stale: {}", path.display());
                stale += 1;
            }
        }

        info!(
            "{} candidate(s), {} output(s), {} stale, {} skipped",
            outcome.candidates,
            outcome.units.len(),
            stale,
            outcome.skipped.len()
        );

        if fail_on_changes && stale > 0 {
            anyhow::bail!("{} generated file(s) are stale", stale);
        }
        Ok(())
    }

    /// One generation pass over a fresh snapshot. Per-root failures are
    /// isolated; output-name collisions abort the pass.
    pub fn run_pass<P: AsRef<Path>>(&mut self, sources: &[P]) -> crate::error::Result<PassOutcome> {
        let snapshot = self.frontend.snapshot(sources)?;
        info!("Snapshot contains {} interface declaration(s)", snapshot.len());

        self.flatten_snapshot(&snapshot)
    }

    /// Flattens every candidate root in an already-built snapshot.
    pub fn flatten_snapshot(
        &self,
        snapshot: &DeclarationSet,
    ) -> crate::error::Result<PassOutcome> {
        let roots: Vec<_> = snapshot
            .iter()
            .filter(|decl| self.filter.is_candidate(decl))
            .collect();
        debug!("{} flattening candidate(s)", roots.len());

        let mut units: Vec<GeneratedUnit> = Vec::new();
        let mut skipped = Vec::new();

        for &root in &roots {
            if self.cancel.is_cancelled() {
                return Err(InterflatError::Cancelled);
            }

            match self.reconstructor.flatten(root, snapshot, &self.rewriter) {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    // Isolated failure: other roots proceed
                    warn!("Skipping '{}': {}", root.name, e);
                    skipped.push((root.name.clone(), e));
                }
            }
        }

        // Output keys must be unique per pass; collisions are surfaced,
        // never resolved by picking one.
        let mut first_collision = None;
        for (i, unit) in units.iter().enumerate() {
            if let Some(earlier) = units[..i].iter().find(|u| u.key == unit.key) {
                let collision = InterflatError::NameCollision {
                    public_name: unit.key.clone(),
                    first: earlier.root_name.clone(),
                    second: unit.root_name.clone(),
                };
                error!("{}", collision);
                if first_collision.is_none() {
                    first_collision = Some(collision);
                }
            }
        }
        if let Some(collision) = first_collision {
            return Err(collision);
        }

        let rendered = units
            .iter()
            .map(|unit| (self.emitter.file_name(unit), self.emitter.render(unit)))
            .collect();

        Ok(PassOutcome {
            units: rendered,
            skipped,
            candidates: roots.len(),
        })
    }
}
