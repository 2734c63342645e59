use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings. Every field has a default, so a TOML file only needs
/// the keys it wants to change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Location of the JSON document holding the collection.
    pub data_path: PathBuf,
    /// Single origin allowed by CORS. `None` allows any origin.
    pub cors_allow_origin: Option<String>,
    /// Hold a process-wide lock around every mutating request.
    ///
    /// Off by default: the store itself performs unguarded read-modify-write
    /// cycles, and concurrent writers can lose updates.
    pub serialize_writes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
            data_path: PathBuf::from("data/items.json"),
            cors_allow_origin: None,
            serialize_writes: false,
        }
    }
}

impl ServerConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
