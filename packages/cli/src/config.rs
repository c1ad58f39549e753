//! CLI configuration, populated from environment variables.

/// Settings that apply to every `bftx` subcommand.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `BFTX_LOG` | `bftx=warn` | `tracing` filter directive (`RUST_LOG` wins if set) |
/// | `BFTX_SIGNING_SEED` | (absent) | 64 hex chars; Ed25519 seed used by `bftx sign` |
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Filter directive passed to `tracing_subscriber::EnvFilter`.
    pub log_filter: String,

    /// Hex-encoded 32-byte signing seed, if configured.
    pub signing_seed: Option<String>,
}

impl CliConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("BFTX_LOG").unwrap_or_else(|_| "bftx=warn".into()),
            signing_seed: std::env::var("BFTX_SIGNING_SEED").ok(),
        }
    }

    /// Decode [`signing_seed`](Self::signing_seed) into raw seed bytes.
    pub fn seed_bytes(&self) -> Result<[u8; 32], String> {
        let hex_seed = self
            .signing_seed
            .as_deref()
            .ok_or("BFTX_SIGNING_SEED is not set")?;
        let bytes = hex::decode(hex_seed.trim())
            .map_err(|e| format!("BFTX_SIGNING_SEED is not valid hex: {e}"))?;
        bytes
            .try_into()
            .map_err(|_| "BFTX_SIGNING_SEED must be exactly 32 bytes (64 hex chars)".to_string())
    }
}
