//! # Generation Pipeline
//!
//! The orchestrator composes registry lookups, gateway injection,
//! validation, and strategy rendering into the two user-facing
//! operations:
//!
//! - [`Orchestrator::preview`] returns the rendered manifest and env
//!   texts without touching the filesystem.
//! - [`Orchestrator::generate`] runs the same pipeline and then writes
//!   both files, optionally backing up what was there before.
//!
//! Sequence: normalize the selection (gateway prepended when VPN mode is
//! on) → resolve ids through the registry (an unknown id aborts before
//! any validation) → sort by category then name → run all validators and
//! merge → abort on any blocking finding, surfacing the merged report →
//! render. Both documents are complete in-memory strings before any file
//! is opened; there are no partial writes.

use crate::compose::strategy_for;
use crate::constants::{BACKUP_TIMESTAMP_FORMAT, COMPOSE_FILE_NAME, ENV_FILE_NAME};
use crate::env::{render_env, EnvSettings, VpnSettings};
use crate::error::{Error, Result};
use crate::probe::{PortProbe, TcpProbe};
use crate::registry::Registry;
use crate::selection::{normalize_selection, SelectionContext};
use crate::validate::{validate_all, ValidationReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One generation request.
#[derive(Debug, Clone)]
pub struct StackRequest {
    /// User-chosen service ids, in any order.
    pub service_ids: Vec<String>,
    /// Whether the stack deploys through the VPN gateway.
    pub vpn_enabled: bool,
    /// Directory the rendered files are written to.
    pub output_dir: PathBuf,
    /// Environment settings; `env.base_path` doubles as the volume base
    /// path for the whole request.
    pub env: EnvSettings,
}

impl StackRequest {
    /// A request with default environment settings, writing to `.`.
    pub fn new(service_ids: Vec<String>, vpn_enabled: bool) -> Self {
        Self {
            service_ids,
            vpn_enabled,
            output_dir: PathBuf::from("."),
            env: EnvSettings::default(),
        }
    }
}

/// The rendered output of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct RenderedStack {
    /// Manifest text (`docker-compose.yml`).
    pub compose: String,
    /// Environment text (`.env`).
    pub env: String,
    /// The merged validation report; may carry warnings.
    pub report: ValidationReport,
}

/// Composes registry, validators, and strategies into one pipeline.
pub struct Orchestrator<'a> {
    registry: &'a Registry,
    probe: Box<dyn PortProbe>,
}

impl<'a> Orchestrator<'a> {
    /// An orchestrator probing host ports over real TCP binds.
    pub fn new(registry: &'a Registry) -> Self {
        Self::with_probe(registry, Box::new(TcpProbe::new()))
    }

    /// An orchestrator with a caller-supplied port probe.
    pub fn with_probe(registry: &'a Registry, probe: Box<dyn PortProbe>) -> Self {
        Self { registry, probe }
    }

    /// Runs the pipeline and returns the rendered texts.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceNotFound`] for an unknown id (before validation)
    /// - [`Error::ValidationFailed`] carrying the merged report when any
    ///   blocking finding is present
    pub fn preview(&self, request: &StackRequest) -> Result<RenderedStack> {
        let ids = normalize_selection(&request.service_ids, request.vpn_enabled);
        let mut services = self.registry.resolve(&ids)?;
        services.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));

        let ctx = SelectionContext {
            services,
            vpn_enabled: request.vpn_enabled,
            base_path: request.env.base_path.clone(),
            output_dir: request.output_dir.clone(),
        };

        let report = validate_all(&ctx, self.registry, self.probe.as_ref());
        if report.has_errors() {
            return Err(Error::ValidationFailed(report));
        }

        let strategy = strategy_for(ctx.vpn_enabled);
        debug!(mode = strategy.mode(), services = ctx.services.len(), "rendering manifest");
        let compose = strategy.render(&ctx.services)?;

        let env = render_env(&self.env_for(request));

        Ok(RenderedStack {
            compose,
            env,
            report,
        })
    }

    /// Runs the pipeline and writes `docker-compose.yml` and `.env` into
    /// the request's output directory.
    ///
    /// With `backup` set, existing files are copied aside to
    /// `<name>.backup.<timestamp>` first.
    pub fn generate(&self, request: &StackRequest, backup: bool) -> Result<RenderedStack> {
        let rendered = self.preview(request)?;

        fs::create_dir_all(&request.output_dir)?;

        let compose_path = request.output_dir.join(COMPOSE_FILE_NAME);
        let env_path = request.output_dir.join(ENV_FILE_NAME);

        if backup {
            backup_existing(&compose_path)?;
            backup_existing(&env_path)?;
        }

        fs::write(&compose_path, &rendered.compose)?;
        write_private(&env_path, &rendered.env)?;

        info!(
            compose = %compose_path.display(),
            env = %env_path.display(),
            "stack files written"
        );

        Ok(rendered)
    }

    /// Environment settings made coherent with the request's VPN flag:
    /// the VPN section is present exactly when VPN mode is on.
    fn env_for(&self, request: &StackRequest) -> EnvSettings {
        let mut env = request.env.clone();
        if request.vpn_enabled {
            if env.vpn.is_none() {
                env.vpn = Some(VpnSettings::default());
            }
        } else {
            env.vpn = None;
        }
        env
    }
}

/// Copies an existing file aside as `<name>.backup.<timestamp>`.
fn backup_existing(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let backup_path = path.with_file_name(format!("{}.backup.{}", file_name, stamp));

    fs::copy(path, &backup_path)?;
    warn!(original = %path.display(), backup = %backup_path.display(), "backed up existing file");
    Ok(())
}

/// Writes a file readable by the owner only; the env file carries VPN
/// credentials.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write as _;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
    #[cfg(not(unix))]
    {
        fs::write(path, contents)?;
        Ok(())
    }
}
