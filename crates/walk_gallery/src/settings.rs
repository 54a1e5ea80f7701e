//! Layered application settings.
//!
//! Sources, later ones winning:
//!
//! 1. Bundled defaults (`walk_gallery.toml` shipped with the crate)
//! 2. `./walk_gallery.toml`, or the file given with `--config`
//! 3. `GALLERY_BACKEND`, `GALLERY_SQLITE_PATH`, `GALLERY_BIND`
//! 4. `IS_PROD`, `DATABASE_URL` / `POSTGRES_URL`, `CLOUDINARY_*`

use gallery_database::{connect, Backend, DatabaseConfig};
use gallery_error::{ConfigError, GalleryResult};
use gallery_interface::PostRepository;
use gallery_server::{AppState, ServerConfig};
use gallery_storage::{CloudinaryConfig, CloudinaryStore, MediaEncoder, DEFAULT_API_BASE};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../walk_gallery.toml");

/// Settings for the `[media]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Remote folder uploads are placed in
    pub folder: String,
    /// Upload request timeout in seconds
    pub timeout_secs: u64,
    /// Remote store API base URL
    pub api_base: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            folder: "walk_gallery".to_string(),
            timeout_secs: 30,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl MediaSettings {
    fn apply(&self, config: CloudinaryConfig) -> CloudinaryConfig {
        config
            .with_folder(self.folder.clone())
            .with_api_base(self.api_base.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1)))
    }
}

/// Everything needed to start the gallery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,
    /// Post store
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Remote media store options
    #[serde(default)]
    pub media: MediaSettings,
    /// Remote media store credentials; only ever read from the environment
    #[serde(skip)]
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Settings {
    /// Load settings from files and the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a file cannot be parsed or a value is
    /// invalid.
    pub fn load(path: Option<&Path>) -> GalleryResult<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Load settings, reading environment variables through `env`.
    ///
    /// An explicit `path` must exist; otherwise `./walk_gallery.toml` is read
    /// when present.
    #[instrument(skip(env))]
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> GalleryResult<Self> {
        let var = |name: &str| {
            env(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("walk_gallery").required(false)),
        };

        let backend = match var("GALLERY_BACKEND") {
            Some(raw) => Some(Backend::from_str(&raw).map_err(|_| {
                ConfigError::new(format!(
                    "GALLERY_BACKEND must be \"sqlite\" or \"postgres\", got \"{}\"",
                    raw
                ))
            })?),
            None if var("IS_PROD").is_some_and(|v| v.eq_ignore_ascii_case("true")) => {
                debug!("IS_PROD set, selecting the postgres backend");
                Some(Backend::Postgres)
            }
            None => None,
        };
        let url = var("DATABASE_URL").or_else(|| var("POSTGRES_URL"));

        let settings: Settings = builder
            .set_override_option("database.backend", backend.map(|b| b.to_string()))
            .and_then(|b| b.set_override_option("database.sqlite_path", var("GALLERY_SQLITE_PATH")))
            .and_then(|b| b.set_override_option("database.url", url))
            .and_then(|b| b.set_override_option("server.bind", var("GALLERY_BIND")))
            .and_then(|b| b.build())
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        let cloudinary = CloudinaryConfig::from_vars(&env).map(|c| settings.media.apply(c));

        debug!(
            backend = %settings.database.backend,
            bind = %settings.server.bind,
            remote_media = cloudinary.is_some(),
            "Loaded settings"
        );
        Ok(Self {
            cloudinary,
            ..settings
        })
    }

    /// Open the configured post store.
    pub async fn open_repository(&self) -> GalleryResult<Arc<dyn PostRepository>> {
        connect(&self.database).await
    }

    /// Media encoder for the configured remote store, or inline-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote store client cannot be built.
    pub fn media_encoder(&self) -> GalleryResult<MediaEncoder> {
        match &self.cloudinary {
            Some(config) => Ok(MediaEncoder::with_remote(Arc::new(CloudinaryStore::new(
                config.clone(),
            )?))),
            None => Ok(MediaEncoder::inline_only()),
        }
    }

    /// Open the store and build the state shared by request handlers.
    pub async fn app_state(&self) -> GalleryResult<AppState> {
        let repo = self.open_repository().await?;
        Ok(AppState::new(repo, self.media_encoder()?))
    }
}
