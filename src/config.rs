//! Configuration management for Pumpify.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `PUMPIFY_` prefix
//! - Sensible defaults for all settings
//!
//! # Environment Variables
//!
//! - `PUMPIFY_HOST` - Server bind address (default: 0.0.0.0)
//! - `PUMPIFY_PORT` - Server port (default: 3000)
//! - `PUMPIFY_OVERLAY` - Overlay asset path (default: pill.png)
//! - `PUMPIFY_MAX_UPLOAD_BYTES` - Request body limit (default: 20 MiB)
//! - `PUMPIFY_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;

use clap::Parser;

use crate::server::{RouterConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::transform::{ImageTransformer, DEFAULT_OVERLAY_PATH};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pumpify - green/white duotone image service.
///
/// Accepts multipart image uploads, recolors them and stamps a watermark
/// overlay, and returns the result as PNG.
#[derive(Parser, Debug, Clone)]
#[command(name = "pumpify")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PUMPIFY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PUMPIFY_PORT")]
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "PUMPIFY_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // Overlay Configuration
    // =========================================================================
    /// Path to the watermark overlay image.
    ///
    /// A missing file is tolerated; images are then returned without overlay.
    #[arg(long, default_value = DEFAULT_OVERLAY_PATH, env = "PUMPIFY_OVERLAY")]
    pub overlay: PathBuf,

    /// Disable the watermark overlay entirely.
    #[arg(long, default_value_t = false)]
    pub no_overlay: bool,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PUMPIFY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        if !self.no_overlay && self.overlay.as_os_str().is_empty() {
            return Err(
                "Overlay path is empty. Set --overlay or PUMPIFY_OVERLAY, or pass --no-overlay"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the image transformer described by this configuration.
    pub fn transformer(&self) -> ImageTransformer {
        if self.no_overlay {
            ImageTransformer::without_overlay()
        } else {
            ImageTransformer::new(&self.overlay)
        }
    }

    /// Build the router configuration described by this configuration.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new()
            .with_max_upload_bytes(self.max_upload_bytes)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Tests
// =============================================================================
