//! Native host bootstrap library for .NET-style runtime layouts.
//!
//! The crate answers two questions a host binary has to settle before any
//! managed code runs: *which SDK* should handle a CLI command (driven by
//! the nearest `global.json`), and *which shared frameworks* should an
//! application load (driven by its `runtimeconfig.json` and the
//! roll-forward rules). On top of those it implements the process-wide
//! activation protocol: exactly one runtime per process, later
//! initializations validated against it and attached as secondaries.
//!
//! # Layout model
//!
//! Installs live under prioritized roots ("hives"): `<root>/sdk/<version>`
//! for SDKs and `<root>/shared/<name>/<version>` for frameworks. A version
//! directory only counts when its marker file is present. See [`install`].
//!
//! # Resolution
//!
//! - [`version`] — four-field versions with SemVer-style prerelease
//!   ordering.
//! - [`rollforward`] — the nine roll-forward policies and the dual-mode
//!   (closest vs. latest) matcher.
//! - [`sdk`] — `global.json`-driven SDK selection.
//! - [`fx`] — transitive framework resolution with reference
//!   reconciliation.
//! - [`context`] — host-context lifecycle and the activation registry.

pub mod config;
pub mod context;
pub mod fx;
pub mod install;
pub mod rollforward;
pub mod sdk;
pub mod status;
pub mod version;

pub use config::global::SdkSettings;
pub use config::runtime::{FrameworkReference, RuntimeConfig};
pub use context::{
    ActivationRegistry, ContextKind, DelegateKind, HostContext, HostMode, HostpolicyContract,
    RawDelegate,
};
pub use fx::{FxDefinition, resolve_frameworks_for_app};
pub use install::InstalledComponent;
pub use rollforward::RollForwardPolicy;
pub use sdk::SdkResolver;
pub use status::{HostError, StatusCode};
pub use version::FxVersion;
