//! Persisted scraper endpoint: the only state kept between runs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Injected provider for the scraper endpoint URL.
///
/// `get` returning `None` means "not configured" and blocks searches.
pub trait EndpointStore: Send + Sync {
    /// Returns the effective endpoint.
    fn get(&self) -> Option<String>;

    /// Stores an endpoint. An empty value clears the stored endpoint.
    fn set(&self, url: &str) -> Result<()>;

    /// Removes the stored endpoint.
    fn clear(&self) -> Result<()>;
}

/// Validates an endpoint URL, returning it trimmed.
pub fn validate_endpoint(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("Invalid endpoint URL: {}", trimmed))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => anyhow::bail!("Unsupported endpoint scheme '{}': use http or https", other),
    }
}

/// Endpoint persisted as a single-line file, with an optional fallback used when
/// nothing is stored (e.g. from config.toml or `ASP_ENDPOINT`).
pub struct FileEndpointStore {
    path: PathBuf,
    fallback: Option<String>,
}

impl FileEndpointStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), fallback: None }
    }

    /// Creates a store at the default location (`<config_dir>/appstore-prices/endpoint`).
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("Could not determine the user config directory")?;
        Ok(Self::new(dir.join("appstore-prices").join("endpoint")))
    }

    /// Sets the endpoint used when no override is stored. Blank or invalid values
    /// are ignored.
    pub fn with_fallback(mut self, fallback: Option<String>) -> Self {
        self.fallback = fallback.filter(|f| !f.trim().is_empty()).and_then(|f| {
            validate_endpoint(&f)
                .map_err(|e| warn!("Ignoring configured endpoint: {:#}", e))
                .ok()
        });
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored override only, ignoring the fallback.
    pub fn stored(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let trimmed = content.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl EndpointStore for FileEndpointStore {
    fn get(&self) -> Option<String> {
        self.stored().or_else(|| self.fallback.clone())
    }

    fn set(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return self.clear();
        }

        let url = validate_endpoint(url)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        debug!("Saving endpoint to {}", self.path.display());
        std::fs::write(&self.path, format!("{}\n", url))
            .with_context(|| format!("Failed to write endpoint file: {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed endpoint file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove endpoint file: {}", self.path.display())
            }),
        }
    }
}

/// In-memory endpoint store.
#[derive(Default)]
pub struct MemoryEndpointStore {
    value: RwLock<Option<String>>,
}

impl MemoryEndpointStore {
    /// Creates an empty (unconfigured) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `url`.
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self { value: RwLock::new(Some(url.into())) }
    }
}

impl EndpointStore for MemoryEndpointStore {
    fn get(&self) -> Option<String> {
        self.value.read().ok().and_then(|v| v.clone())
    }

    fn set(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return self.clear();
        }

        let url = validate_endpoint(url)?;
        let mut guard = self.value.write().map_err(|_| anyhow::anyhow!("Endpoint store poisoned"))?;
        *guard = Some(url);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.value.write().map_err(|_| anyhow::anyhow!("Endpoint store poisoned"))?;
        *guard = None;
        Ok(())
    }
}
