//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! core crate never sees it; it only receives a [`WorkflowConfig`].
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `CRAFTVISTA__SECTION__KEY`
//! 3. Config file (`--config`, or [`AppConfig::config_path`] when it exists)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use craftvista_core::application::WorkflowConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CRAFTVISTA";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub workflow: WorkflowSection,
    pub generator: GeneratorSection,
    pub identity: IdentitySection,
    pub store: StoreSection,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSection {
    pub generation_timeout_secs: u64,
    pub publish_timeout_secs: u64,
    pub require_artisan: bool,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 30,
            publish_timeout_secs: 15,
            require_artisan: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    /// Offline category templates.
    #[default]
    Template,
    Gemini,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub provider: GeneratorProvider,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: Option<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::Template,
            model: craftvista_adapters::generator::gemini::DEFAULT_MODEL.into(),
            api_key_env: "CRAFTVISTA_LLM_KEY".into(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderKind {
    /// Built-in credential table with the demo artisan.
    #[default]
    Static,
    Google,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySection {
    pub provider: IdentityProviderKind,
    pub tokeninfo_url: String,
    /// Expected OAuth client id on Google tokens.
    pub audience: Option<String>,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            provider: IdentityProviderKind::Static,
            tokeninfo_url: craftvista_adapters::identity::google::GOOGLE_TOKENINFO_URL.into(),
            audience: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Listings vanish when the process exits.
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackend,
    /// Directory for the file backend. Defaults to the platform data dir.
    pub path: Option<PathBuf>,
}

impl StoreSection {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("com", "craftvista", "craftvista")
                .map(|d| d.data_dir().join("listings"))
                .unwrap_or_else(|| PathBuf::from(".craftvista/listings"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = serde_json::to_string(&Self::default())
            .context("Failed to serialize default configuration")?;
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults,
            config::FileFormat::Json,
        ));

        match config_file {
            Some(path) => {
                builder = builder.add_source(
                    config::File::from(path.as_path()).format(config::FileFormat::Toml),
                );
            }
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    builder = builder.add_source(
                        config::File::from(default_path).format(config::FileFormat::Toml),
                    );
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "craftvista", "craftvista")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".craftvista.toml"))
    }

    pub fn to_workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            generation_timeout: Duration::from_secs(self.workflow.generation_timeout_secs),
            publish_timeout: Duration::from_secs(self.workflow.publish_timeout_secs),
            require_artisan: self.workflow.require_artisan,
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
