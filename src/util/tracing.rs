use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{filter, prelude::*};

// default name (fixed)
const APP_SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Logging settings, read from `LOG_*` environment variables
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub app_name: Option<String>,
    pub level: Option<String>,
    pub file_name: Option<String>,
    pub file_dir: Option<String>,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_use_stdout")]
    pub use_stdout: bool,
}

fn default_use_stdout() -> bool {
    true
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self {
            app_name: None,
            level: None,
            file_name: None,
            file_dir: None,
            use_json: false,
            use_stdout: true,
        }
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(APP_SERVICE_NAME)
    }

    /// Configured level, INFO when absent or unparsable
    pub fn max_level(&self) -> tracing::Level {
        self.level
            .as_deref()
            .and_then(|lv| tracing::Level::from_str(lv).ok())
            .unwrap_or(tracing::Level::INFO)
    }

    /// Log file path when `file_name` is set (relative to `file_dir` or the cwd)
    pub fn log_file_path(&self) -> Result<Option<PathBuf>> {
        let Some(file_name) = self.file_name.as_deref() else {
            return Ok(None);
        };
        let dir = match self.file_dir.as_deref() {
            Some(d) => PathBuf::from_str(d).context("Invalid log file directory")?,
            None => env::current_dir().context("cannot resolve current directory")?,
        };
        Ok(Some(dir.join(file_name)))
    }

    fn open_log_file(&self) -> Result<Option<File>> {
        match self.log_file_path()? {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir).context("create log file directory")?;
                }
                let file = File::create(&path)
                    .with_context(|| format!("create log file to {:?}", path.as_os_str()))?;
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_tracing_config_from_env() -> Result<LoggingConfig> {
    envy::prefixed("LOG_")
        .from_env::<LoggingConfig>()
        .context("cannot read logging config from env:")
}

pub fn tracing_init(conf: LoggingConfig) -> Result<()> {
    let layer = setup_layer_from_logging_config(&conf)?;
    tracing::subscriber::set_global_default(layer).context("setting default subscriber failed")?;
    tracing::debug!("logging initialized for {}", conf.app_name());
    Ok(())
}

pub fn tracing_init_from_env() -> Result<()> {
    match load_tracing_config_from_env() {
        Ok(conf) => tracing_init(conf),
        Err(e) => {
            eprintln!("failed to load logging config from env: {:?}", e);
            Err(e)
        }
    }
}

pub fn setup_layer_from_logging_config(
    conf: &LoggingConfig,
) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
    let lv = conf.max_level();
    let filter = filter::Targets::new().with_default(lv);
    // RUST_LOG directives refine the configured level
    let env_filter = EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::from_level(lv).into())
        .from_env_lossy();

    let (json_file, plain_file) = match conf.open_log_file()? {
        Some(f) if conf.use_json => (Some(f), None),
        Some(f) => (None, Some(f)),
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(env_filter)
        .with(json_file.map(|f| {
            Layer::new()
                .with_writer(Mutex::new(f).with_max_level(lv))
                .with_ansi(false)
                .json()
        }))
        .with(plain_file.map(|f| {
            Layer::new()
                .with_writer(Mutex::new(f).with_max_level(lv))
                .with_ansi(false)
        }))
        .with((!conf.use_json && conf.use_stdout).then(|| tracing_subscriber::fmt::layer().pretty()))
        .with((conf.use_json && conf.use_stdout).then(|| tracing_subscriber::fmt::layer().json()));

    Ok(Box::new(subscriber))
}

// for simple stdout logging
pub fn tracing_init_test(level: tracing::Level) {
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}
