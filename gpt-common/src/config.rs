//! Configuration loading and root folder resolution
//!
//! Database location follows the original deployment: a remote PostgreSQL
//! server when `pg_host` is configured, otherwise the embedded SQLite file
//! `local_guitar_data.db` inside the root folder.

use crate::{Error, Result};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "GPT_ROOT_FOLDER";

/// File name of the embedded fallback database
pub const LOCAL_DB_FILE: &str = "local_guitar_data.db";

/// Schema used when none is configured (SQLite's built-in schema name)
pub const DEFAULT_SCHEMA: &str = "main";

/// Default PostgreSQL port when `pg_host` is set without `pg_port`
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Default HTTP port of the data entry service
pub const DEFAULT_DE_PORT: u16 = 5730;

/// Default HTTP port of the dashboard service
pub const DEFAULT_DASH_PORT: u16 = 5731;

/// Connection parameters for the remote PostgreSQL store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl RemoteConfig {
    /// Connection options for sqlx
    ///
    /// Unset user and password fall back to the libpq environment
    /// (`PGUSER`, `PGPASSWORD`).
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname);
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }
}

/// Where the backing store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Remote(RemoteConfig),
    Local(PathBuf),
}

/// Fully resolved database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub location: StoreLocation,
    pub schema: String,
    /// Tables are opened read-only; callers must refuse writes
    pub read_only: bool,
}

/// `[database]` table of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileDatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub schema: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub read_only: Option<bool>,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub root_folder: Option<String>,
    #[serde(default)]
    pub database: FileDatabaseSection,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

impl DatabaseConfig {
    /// Resolve from an environment lookup and an optional config file.
    ///
    /// Environment values win over the file. Without a host the local SQLite
    /// file under `root_folder` is used.
    pub fn from_sources<F>(env: F, file: Option<&FileConfig>, root_folder: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = file.map(|f| f.database.clone()).unwrap_or_default();
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let host = env("pg_host").or(section.host);
        let schema = env("pg_schema")
            .or(section.schema)
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        let read_only = match env("GPT_READ_ONLY") {
            Some(v) => parse_bool(&v)?,
            None => section.read_only.unwrap_or(false),
        };

        let location = match host {
            Some(host) => {
                let port = match env("pg_port") {
                    Some(p) => p
                        .parse::<u16>()
                        .map_err(|_| Error::Config(format!("Invalid pg_port: {}", p)))?,
                    None => section.port.unwrap_or(DEFAULT_PG_PORT),
                };
                let dbname = env("pg_dbname").or(section.dbname).ok_or_else(|| {
                    Error::Config("pg_host is set but pg_dbname is missing".to_string())
                })?;
                StoreLocation::Remote(RemoteConfig {
                    host,
                    port,
                    dbname,
                    user: env("pg_user").or(section.user),
                    password: env("pg_pw").or(section.password),
                })
            }
            None => StoreLocation::Local(root_folder.join(LOCAL_DB_FILE)),
        };

        Ok(Self {
            location,
            schema,
            read_only,
        })
    }

    /// Resolve from the process environment and the default config file
    pub fn load(root_folder: &Path) -> Result<Self> {
        let file = load_file_config()?;
        let config = Self::from_sources(|k| std::env::var(k).ok(), file.as_ref(), root_folder)?;
        match &config.location {
            StoreLocation::Remote(remote) => info!(
                "Using PostgreSQL store {}:{}/{} (schema {})",
                remote.host, remote.port, remote.dbname, config.schema
            ),
            StoreLocation::Local(path) => {
                info!("No remote database configured, using local SQLite database {}", path.display())
            }
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("Invalid boolean: {}", other))),
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(Some(config)) = load_file_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Config file path for the platform, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("gpt").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/gpt/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Read and parse the config file; a missing file is not an error
pub fn load_file_config() -> Result<Option<FileConfig>> {
    match config_file_path() {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            FileConfig::parse(&content).map(Some)
        }
        None => Ok(None),
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("gpt"))
        .unwrap_or_else(|| PathBuf::from("./gpt_data"))
}
