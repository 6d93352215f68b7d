//! Layered runtime configuration.
//!
//! Settings resolve with later sources overriding earlier ones:
//! 1. Built-in defaults (every key has one, so no file is required)
//! 2. `melies.toml` in the working directory, if present
//! 3. The file named by `MELIES_CONFIG`, if the variable is set
//! 4. Environment variables prefixed `MELIES_`, with `__` separating
//!    nesting levels (`MELIES_SERVER__PORT=8080`)
//!
//! A `.env` file is folded into the process environment first, so API keys
//! and overrides can live alongside the checkout during development.

use config::{Config, Environment, File};
use melies_error::{ConfigError, ConfigErrorKind, MeliesResult};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level runtime settings for the binary.
///
/// # Examples
///
/// ```no_run
/// use melies::config::Settings;
///
/// # fn main() -> melies::MeliesResult<()> {
/// let settings = Settings::load()?;
/// println!("binding {}", settings.socket_addr()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// HTTP bind address
    pub server: ServerSettings,
    /// Published media store
    pub media: MediaSettings,
    /// Job record store
    pub jobs: JobsSettings,
    /// External renderer invocation
    pub render: RenderSettings,
    /// External muxer invocation
    pub mux: MuxSettings,
    /// Generative model selection
    pub model: ModelSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address, an IP literal
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Where media files live and how published objects are addressed.
///
/// The staging tree and the published store must not share a directory:
/// stages write intermediates under `root` and publication copies the
/// finished files into `store_root`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Staging tree where stages write intermediate files
    pub root: PathBuf,
    /// Root directory of the published store, served under `/media`
    pub store_root: PathBuf,
    /// URL prefix clients use to reach published objects
    pub public_base_url: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            store_root: PathBuf::from("public"),
            public_base_url: "http://localhost:3001/media".to_string(),
        }
    }
}

/// Where job records persist.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobsSettings {
    /// Root directory of the JSON record store
    pub root: PathBuf,
}

impl Default for JobsSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("jobs"),
        }
    }
}

/// How the animation renderer is invoked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Renderer executable, multiple tokens allowed (`python -m manim`)
    pub command: String,
    /// Quality argv entry passed before the output name
    pub quality_flag: String,
    /// Seconds a render may run before it is killed, 0 for no limit
    pub timeout_secs: u64,
}

impl RenderSettings {
    /// The render deadline, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            command: "manim".to_string(),
            quality_flag: "-qm".to_string(),
            timeout_secs: 600,
        }
    }
}

/// How the audio/video muxer is invoked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MuxSettings {
    /// Muxer executable
    pub command: String,
}

impl Default for MuxSettings {
    fn default() -> Self {
        Self {
            command: "ffmpeg".to_string(),
        }
    }
}

/// Which generative models the pipeline drives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Text model for refinement, scripts and animation code
    pub text: String,
    /// Speech model for narration
    pub speech: String,
    /// Prebuilt narration voice
    pub voice: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            text: "gemini-2.5-flash".to_string(),
            speech: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
        }
    }
}

impl Settings {
    /// Load settings with the full layering described at module level.
    ///
    /// Optional files are skipped silently when absent; a file named by
    /// `MELIES_CONFIG` must exist.
    pub fn load() -> MeliesResult<Self> {
        dotenvy::dotenv().ok();
        debug!("loading configuration: defaults, melies.toml, MELIES_CONFIG, environment");

        let mut builder =
            Config::builder().add_source(File::with_name("melies").required(false));
        if let Ok(path) = std::env::var("MELIES_CONFIG") {
            builder = builder.add_source(File::from(PathBuf::from(path)));
        }
        builder = builder.add_source(Environment::with_prefix("MELIES").separator("__"));

        builder
            .build()
            .map_err(|err| {
                ConfigError::new(ConfigErrorKind::FileRead(err.to_string())).into()
            })
            .and_then(deserialize)
    }

    /// Load settings from one explicit file over the built-in defaults.
    pub fn from_file(path: impl AsRef<Path>) -> MeliesResult<Self> {
        let path = path.as_ref();
        Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|err| {
                ConfigError::new(ConfigErrorKind::FileRead(format!(
                    "{}: {err}",
                    path.display()
                )))
                .into()
            })
            .and_then(deserialize)
    }

    /// The address the HTTP server binds, from `server.host` and
    /// `server.port`.
    pub fn socket_addr(&self) -> MeliesResult<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|err| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    key: "server.host".to_string(),
                    message: format!("{}: {err}", self.server.host),
                })
                .into()
            })
    }
}

fn deserialize(config: Config) -> MeliesResult<Settings> {
    config
        .try_deserialize()
        .map_err(|err| ConfigError::new(ConfigErrorKind::Parse(err.to_string())).into())
}
