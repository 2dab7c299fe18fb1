use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where the built dashboard (index.html, wasm bundle, styles) is served from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with environment variable substitution
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML content, expanding `$(VAR_NAME)` placeholders first
    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content);
        let mut config: Config = serde_yaml::from_str(&expanded)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    /// Environment overrides apply in both cases.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// `SERVER_HOST` and `SERVER_PORT` win over whatever the file says
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("SERVER_PORT is not a valid port: {}", port)))?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(AppError::Config("Server host cannot be empty".to_string()));
        }

        self.bind_addr()?;

        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if self.dashboard.static_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Dashboard static_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address to listen on. `server.host` must be an IPv4 or IPv6 literal.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.server.host.parse().map_err(|_| {
            AppError::Config(format!(
                "Server host is not an IP address: {}",
                self.server.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// Expand environment variables in the format $(VAR_NAME)
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    let re = regex::Regex::new(r"\$\(([A-Z_][A-Z0-9_]*)\)").expect("placeholder regex is valid");

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    result
}
