//! Static configuration loaded once at startup.
//! These settings affect server binding or storage layout and require a
//! restart to change.

use serde::Deserialize;
use std::path::PathBuf;

/// Static configuration loaded from `config.*` and `PDFPLUCK__*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageConfig,

    #[serde(default = "default_limits")]
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL used when building public image links. When unset, links
    /// are derived from the request's Host header.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Staging directory for uploaded PDFs.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory extracted images are persisted to and served from.
    #[serde(default = "default_extracted_dir")]
    pub extracted_dir: PathBuf,
}

/// Request limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
        public_base_url: None,
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_storage() -> StorageConfig {
    StorageConfig {
        upload_dir: default_upload_dir(),
        extracted_dir: default_extracted_dir(),
    }
}

pub(crate) fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

pub(crate) fn default_extracted_dir() -> PathBuf {
    PathBuf::from("./extracted_images")
}

pub(crate) fn default_limits() -> LimitsConfig {
    LimitsConfig {
        max_upload_size_bytes: default_max_upload_size(),
    }
}

pub(crate) fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}
