use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub poster_dir: String,
    /// Prefix of every `posterUrl`, without a trailing slash.
    pub base_url: String,
    pub database_url: String,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Movie catalog API with poster storage")]
pub struct Args {
    /// Host to bind to (overrides MOVIE_CATALOG_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides MOVIE_CATALOG_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where poster files are stored (overrides MOVIE_CATALOG_POSTER_DIR)
    #[arg(long)]
    pub poster_dir: Option<String>,

    /// Public base URL used to build poster URLs (overrides MOVIE_CATALOG_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Database URL (overrides MOVIE_CATALOG_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Largest accepted request body in MiB (overrides MOVIE_CATALOG_MAX_UPLOAD_MB)
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::resolve(args)?, migrate))
    }

    /// Merge parsed CLI args over environment variables over defaults.
    pub fn resolve(args: Args) -> Result<Self> {
        let env_host = env::var("MOVIE_CATALOG_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_parse("MOVIE_CATALOG_PORT", 8080u16)?;
        let env_poster_dir =
            env::var("MOVIE_CATALOG_POSTER_DIR").unwrap_or_else(|_| "./data/posters".into());
        let env_db = env::var("MOVIE_CATALOG_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/movies.db".into());
        let env_max_upload_mb = env_parse("MOVIE_CATALOG_MAX_UPLOAD_MB", 10usize)?;

        let port = args.port.unwrap_or(env_port);
        let base_url = args
            .base_url
            .or_else(|| env::var("MOVIE_CATALOG_BASE_URL").ok())
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        let max_upload_mb = args.max_upload_mb.unwrap_or(env_max_upload_mb);

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port,
            poster_dir: args.poster_dir.unwrap_or(env_poster_dir),
            base_url: base_url.trim_end_matches('/').to_string(),
            database_url: args.database_url.unwrap_or(env_db),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
