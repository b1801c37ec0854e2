//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to listen, which database to open, and where the front-end lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file (default: "database.sqlite3")
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory served at the site root (default: "static")
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database() -> PathBuf {
    PathBuf::from("database.sqlite3")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
