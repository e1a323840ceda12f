//! Status codes and the error taxonomy.
//!
//! Every resolution or lifecycle failure maps to exactly one [`StatusCode`].
//! The codes form a closed set consumed by embedding callers and are stable
//! across calls; tests assert on them directly.

use std::path::PathBuf;

use thiserror::Error;

/// Status codes returned to embedding callers.
///
/// Values mirror the wire-level convention of the native host: `Success` is
/// zero, failures live in the `0x8000_80xx` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StatusCode {
    Success = 0,
    InvalidArgFailure = 0x8000_8081,
    InvalidConfigFile = 0x8000_8082,
    CoreHostLibMissingFailure = 0x8000_8083,
    CoreHostIncompatibleConfig = 0x8000_8084,
    SdkResolverResolveFailure = 0x8000_8085,
    FrameworkMissingFailure = 0x8000_8086,
    FrameworkCompatFailure = 0x8000_8087,
    AppArgNotRunnable = 0x8000_8088,
    HostInvalidState = 0x8000_8089,
}

impl StatusCode {
    /// Raw numeric value, as surfaced over the embedding ABI.
    pub fn value(self) -> u32 {
        self as u32
    }
}

/// Crate-wide error type. One variant per failure family.
///
/// Resolution failures carry enough context to render the "requested X,
/// found Y, Z, W" diagnostics a user needs to pick the right install.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("invalid runtime config '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error(
        "framework '{name}' not found: requested {requested} (oldest acceptable {oldest})\n\
         searched:\n{}\ninstalled versions of '{name}':\n{}",
        format_paths(.search_roots),
        format_found(.installed),
    )]
    FrameworkMissing {
        name: String,
        requested: String,
        oldest: String,
        search_roots: Vec<PathBuf>,
        installed: Vec<String>,
    },

    #[error(
        "incompatible references to framework '{name}': {first_requester} wants {first_reference}, \
         {second_requester} wants {second_reference}"
    )]
    FrameworkCompat {
        name: String,
        first_requester: String,
        first_reference: String,
        second_requester: String,
        second_reference: String,
    },

    #[error(
        "could not resolve SDK: requested {requested}\nsearched:\n{}\ninstalled SDKs:\n{}{}",
        format_paths(.search_roots),
        format_found(.installed),
        .message.as_deref().map(|m| format!("\n{m}")).unwrap_or_default(),
    )]
    SdkNotFound {
        requested: String,
        search_roots: Vec<PathBuf>,
        installed: Vec<String>,
        /// Custom `errorMessage` override from global.json, if any.
        message: Option<String>,
    },

    #[error("runtime config at '{path}' is incompatible with the active runtime: {reason}")]
    IncompatibleConfig { path: PathBuf, reason: String },

    #[error("hostpolicy library not found in '{0}'")]
    HostpolicyMissing(PathBuf),

    #[error("operation not valid in the current host state: {0}")]
    InvalidState(String),

    #[error("target '{0}' is not a runnable application")]
    NotRunnable(PathBuf),
}

impl HostError {
    /// Total mapping onto the closed status-code set.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HostError::InvalidVersion(_) | HostError::InvalidArg(_) => {
                StatusCode::InvalidArgFailure
            }
            HostError::InvalidConfig { .. } => StatusCode::InvalidConfigFile,
            HostError::FrameworkMissing { .. } => StatusCode::FrameworkMissingFailure,
            HostError::FrameworkCompat { .. } => StatusCode::FrameworkCompatFailure,
            HostError::SdkNotFound { .. } => StatusCode::SdkResolverResolveFailure,
            HostError::IncompatibleConfig { .. } => StatusCode::CoreHostIncompatibleConfig,
            HostError::HostpolicyMissing(_) => StatusCode::CoreHostLibMissingFailure,
            HostError::InvalidState(_) => StatusCode::HostInvalidState,
            HostError::NotRunnable(_) => StatusCode::AppArgNotRunnable,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "  (no install locations)".to_string();
    }
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_found(found: &[String]) -> String {
    if found.is_empty() {
        return "  (none)".to_string();
    }
    found
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
