//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bazaar_cache::{Cache, SessionId};
use bazaar_commerce::catalog::StaticCatalog;
use bazaar_commerce::store::StoreRepository;
use bazaar_observability::{LogLevel, StructuredLogger};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// File under the storage directory remembering the current session.
const SESSION_FILE: &str = "current-session";

/// Execution context for CLI commands.
pub struct Context {
    pub config: CliConfig,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
    session_override: Option<String>,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found upward.
    pub fn load(config_path: Option<&str>, session: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            session_override: session,
        })
    }

    /// Directory relative paths in the config resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Resolve a config path relative to the config file's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Load the catalog snapshot.
    pub fn catalog(&self) -> Result<StaticCatalog> {
        let path = self.resolve_path(&self.config.catalog.path);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        self.output.debug(&format!("Catalog: {}", path.display()));
        StaticCatalog::from_json(&json)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    /// Open the session-backed store repository.
    pub fn repository(&self) -> Result<StoreRepository> {
        let dir = self.resolve_path(&self.config.storage.dir);
        let cache = Cache::open_dir(&dir)?;
        Ok(StoreRepository::new(cache, self.config.currency()?))
    }

    /// The shopper session: `--session`, else the remembered one, else a new one.
    pub fn session(&self) -> Result<SessionId> {
        if let Some(id) = &self.session_override {
            return Ok(SessionId::new(id.clone()));
        }

        let dir = self.resolve_path(&self.config.storage.dir);
        let file = dir.join(SESSION_FILE);
        if let Ok(existing) = std::fs::read_to_string(&file) {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(SessionId::new(existing));
            }
        }

        let id = SessionId::generate();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        std::fs::write(&file, id.as_str())
            .with_context(|| format!("Failed to write {}", file.display()))?;
        tracing::info!(session = %id, dir = %dir.display(), "started new session");
        self.output.debug(&format!("Started session {id}"));
        Ok(id)
    }

    /// Logger for order records, correlated with the session.
    pub fn order_logger(&self, session: &SessionId) -> StructuredLogger {
        StructuredLogger::new()
            .with_session(session.as_str())
            .with_component("orders")
            .with_format(self.config.logging.format)
            .with_min_level(if self.output.is_verbose() {
                LogLevel::Debug
            } else {
                LogLevel::Info
            })
    }
}

/// Find a config file in the directory tree, starting at `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
