use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Directory Docker-style secret files are mounted into. Each file becomes
/// an upper-cased variable that overrides the environment.
const SECRETS_PATH: &str = "/run/secrets";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Request credential for the upstream provider.
    pub zwsid: String,
    /// OAuth audience the identity provider must have issued tokens for.
    pub google_client_id: String,
    /// Substitute a fixed principal instead of verifying tokens. Local
    /// testing only.
    pub insecure_fake_principal: bool,
    /// Base URL of the IP geolocation service; `location` resolves to null
    /// when unset.
    pub geoip_url: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment, with `/run/secrets`
    /// files taking precedence over same-named variables.
    pub fn load() -> Result<Self> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();
        apply_secrets_dir(Path::new(SECRETS_PATH), &mut vars);
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let server = ServerConfig {
            port: parse_or(vars, "PORT", 3000)?,
            ..ServerConfig::default()
        };
        let database = DatabaseConfig {
            url: required(vars, "DATABASE_URL")?,
            max_connections: parse_or(vars, "DATABASE_MAX_CONNECTIONS", 10)?,
            connect_timeout_ms: parse_or(vars, "DATABASE_TIMEOUT", 2000)?,
        };
        Ok(Self {
            server,
            database,
            zwsid: required(vars, "ZWSID")?,
            google_client_id: required(vars, "GOOGLE_CLIENT_ID")?,
            insecure_fake_principal: flag(vars, "INSECURE_FAKE_PRINCIPAL"),
            geoip_url: vars.get("GEOIP_URL").map(|s| s.trim().to_string()),
        })
    }
}

fn required(vars: &HashMap<String, String>, key: &str) -> Result<String> {
    vars.get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Config(format!("Missing required {key} environment parameter")))
}

fn parse_or<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {key}: {raw:?}"))),
        None => Ok(default),
    }
}

fn flag(vars: &HashMap<String, String>, key: &str) -> bool {
    matches!(
        vars.get(key).map(|s| s.trim()),
        Some("1") | Some("true") | Some("TRUE")
    )
}

/// Reads every file in `dir` into `vars`, upper-casing the file name as the
/// key. Logs when a secret overrides a differing environment value.
fn apply_secrets_dir(dir: &Path, vars: &mut HashMap<String, String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to load secrets: {e}");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let value = match fs::read_to_string(&path) {
            Ok(v) => v.trim_end_matches('\n').to_string(),
            Err(e) => {
                warn!("Failed to read secret {}: {e}", path.display());
                continue;
            }
        };
        let key = entry.file_name().to_string_lossy().to_uppercase();
        if let Some(prev) = vars.get(&key) {
            if prev != &value {
                info!("[secrets] {key} value overridden");
            }
        }
        vars.insert(key, value);
    }
}
