//! Host-context lifecycle and the process-wide activation protocol.
//!
//! A context is created over a resolved framework set and driven through
//! `Initialized -> Active` (or `Invalid` on load failure). At most one
//! context process-wide ever reaches `Active`; the slot is set once and
//! never cleared, because the underlying runtime cannot be unloaded.
//! Later initializations become `Secondary` contexts that reuse the
//! active runtime after validating framework compatibility against it.
//!
//! The whole protocol hangs off one mutex/condvar pair in the
//! [`ActivationRegistry`]: an `initializing` flag spans from the moment a
//! first context starts resolving until its runtime loads, fails, or the
//! context is closed. Every state change broadcasts. Waits have no
//! timeout; a caller that never finishes first-context creation starves
//! all others, which is accepted behavior and preserved here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::runtime::{FrameworkReference, RuntimeConfig};
use crate::fx::{self, FxDefinition};
use crate::rollforward::{self, RollForwardPolicy, VersionKind};
use crate::status::HostError;

/// The fixed, finite set of host operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Dispatches to either SDK commands or app execution.
    Muxer,
    /// A renamed host bound to one specific application.
    Apphost,
    /// Framework and host installed separately.
    SplitFx,
}

impl HostMode {
    /// Where the runtime config for `target` lives in this mode.
    pub fn runtime_config_path(self, target: &Path) -> PathBuf {
        match self {
            HostMode::Muxer | HostMode::Apphost => RuntimeConfig::path_for_app(target),
            HostMode::SplitFx => target.to_path_buf(),
        }
    }
}

/// Lifecycle states of a host context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Placeholder for a runtime loaded through a non-context API.
    Empty,
    Initialized,
    Active,
    Secondary,
    Invalid,
}

/// Runtime delegate selector, matched exhaustively by contract
/// implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateKind {
    LoadAssembly,
    LoadAssemblyAndGetFunctionPointer,
    GetFunctionPointer,
}

/// An opaque function pointer handed back by the loaded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDelegate(pub usize);

/// The contract the resolved hostpolicy library must satisfy.
///
/// The core never inspects the implementation, only calls through it.
pub trait HostpolicyContract: Send + Sync {
    fn load(&self, frameworks: &[FxDefinition]) -> Result<(), HostError>;
    fn initialize(
        &self,
        properties: &BTreeMap<String, String>,
        argv: &[String],
    ) -> Result<(), HostError>;
    fn run_app(&self) -> Result<i32, HostError>;
    fn get_runtime_delegate(&self, kind: DelegateKind) -> Result<RawDelegate, HostError>;
    fn get_property(&self, key: &str) -> Option<String>;
    fn set_property(&self, _key: &str, _value: &str) -> Result<(), HostError> {
        Err(HostError::InvalidState(
            "runtime properties are immutable once loaded".to_string(),
        ))
    }
    fn unload(&self) {}
}

/// Platform name of the hostpolicy shared library.
#[cfg(target_os = "windows")]
pub const HOSTPOLICY_LIB: &str = "hostpolicy.dll";
#[cfg(target_os = "macos")]
pub const HOSTPOLICY_LIB: &str = "libhostpolicy.dylib";
#[cfg(all(unix, not(target_os = "macos")))]
pub const HOSTPOLICY_LIB: &str = "libhostpolicy.so";

/// Find the hostpolicy library next to the resolved frameworks, nearest
/// the root framework first (the last definition), falling back to the
/// app directory for self-contained layouts.
pub fn locate_hostpolicy(frameworks: &[FxDefinition]) -> Result<PathBuf, HostError> {
    for definition in frameworks.iter().rev() {
        let candidate = definition.dir.join(HOSTPOLICY_LIB);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    let searched = frameworks
        .last()
        .map(|d| d.dir.clone())
        .unwrap_or_default();
    Err(HostError::HostpolicyMissing(searched))
}

/// The published record of one initialization attempt. Immutable once
/// published; re-publication (populating the `Empty` placeholder)
/// replaces the record rather than mutating it.
#[derive(Clone)]
pub struct HostContextRecord {
    pub kind: ContextKind,
    pub contract: Option<Arc<dyn HostpolicyContract>>,
    pub frameworks: Vec<FxDefinition>,
    pub included_frameworks: Vec<FrameworkReference>,
    pub properties: BTreeMap<String, String>,
    pub is_app: bool,
    pub argv: Vec<String>,
}

impl HostContextRecord {
    fn placeholder() -> Self {
        Self {
            kind: ContextKind::Empty,
            contract: None,
            frameworks: Vec::new(),
            included_frameworks: Vec::new(),
            properties: BTreeMap::new(),
            is_app: false,
            argv: Vec::new(),
        }
    }
}

#[derive(Default)]
struct ActivationState {
    initializing: bool,
    active: Option<Arc<HostContextRecord>>,
}

/// Process-wide activation state: one mutex-guarded slot for the active
/// record plus the `initializing` flag, broadcast on every change.
///
/// Injectable so tests construct independent registries; the process
/// itself holds exactly one for its lifetime with no explicit teardown.
#[derive(Default)]
pub struct ActivationRegistry {
    state: Mutex<ActivationState>,
    cond: Condvar,
}

enum JoinOutcome {
    /// Caller owns the `initializing` flag and must clear it on failure.
    First,
    Secondary(Arc<HostContextRecord>),
}

impl ActivationRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, ActivationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The record that reached `Active`, if any. Never cleared.
    pub fn active_context(&self) -> Option<Arc<HostContextRecord>> {
        self.lock().active.clone()
    }

    /// Gate for app-mode first-context creation: wait out a concurrent
    /// creation, then claim the `initializing` flag. Fails if a runtime
    /// is already active; an app host cannot reuse someone else's
    /// runtime.
    fn begin_first(&self) -> Result<(), HostError> {
        let mut st = self.lock();
        while st.initializing {
            st = self.cond.wait(st).unwrap_or_else(|p| p.into_inner());
        }
        if st.active.is_some() {
            return Err(HostError::InvalidState(
                "a runtime is already active in this process".to_string(),
            ));
        }
        st.initializing = true;
        Ok(())
    }

    /// Gate for config-mode creation: become the first context, or join
    /// an active runtime as a secondary. Blocks while another creation is
    /// in flight and while the active slot holds only the `Empty`
    /// placeholder.
    fn begin_or_join(&self) -> JoinOutcome {
        let mut st = self.lock();
        loop {
            if st.initializing {
                st = self.cond.wait(st).unwrap_or_else(|p| p.into_inner());
                continue;
            }
            match &st.active {
                None => {
                    st.initializing = true;
                    return JoinOutcome::First;
                }
                Some(record) if record.kind == ContextKind::Empty => {
                    // Runtime loaded through a non-context API; wait for
                    // the record to be populated before validating
                    // against it.
                    st = self.cond.wait(st).unwrap_or_else(|p| p.into_inner());
                }
                Some(record) => return JoinOutcome::Secondary(record.clone()),
            }
        }
    }

    /// Failure-style rollback: clear `initializing` and wake every
    /// blocked creator. Must run before the error is returned.
    fn rollback(&self) {
        let mut st = self.lock();
        st.initializing = false;
        self.cond.notify_all();
    }

    /// Publish the one record that reached `Active`, clearing
    /// `initializing` and waking contexts blocked on it.
    fn publish_active(&self, record: Arc<HostContextRecord>) {
        let mut st = self.lock();
        st.active = Some(record);
        st.initializing = false;
        self.cond.notify_all();
    }

    /// Mark the runtime as active without a populated record, for loads
    /// that bypass the context API.
    pub fn publish_placeholder(&self) {
        let mut st = self.lock();
        if st.active.is_none() {
            st.active = Some(Arc::new(HostContextRecord::placeholder()));
        }
        self.cond.notify_all();
    }

    /// Replace the `Empty` placeholder with the populated record.
    pub fn populate_placeholder(&self, record: Arc<HostContextRecord>) {
        let mut st = self.lock();
        st.active = Some(record);
        self.cond.notify_all();
    }

    #[cfg(test)]
    fn is_initializing(&self) -> bool {
        self.lock().initializing
    }
}

/// One initialization attempt, driven by its creator's thread.
pub struct HostContext {
    registry: Arc<ActivationRegistry>,
    kind: ContextKind,
    contract: Arc<dyn HostpolicyContract>,
    frameworks: Vec<FxDefinition>,
    included_frameworks: Vec<FrameworkReference>,
    properties: BTreeMap<String, String>,
    is_app: bool,
    argv: Vec<String>,
    target: PathBuf,
    closed: bool,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("kind", &self.kind)
            .field("frameworks", &self.frameworks)
            .field("included_frameworks", &self.included_frameworks)
            .field("properties", &self.properties)
            .field("is_app", &self.is_app)
            .field("argv", &self.argv)
            .field("target", &self.target)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl HostContext {
    /// Initialize a context to run the app at `app_path`.
    ///
    /// Claims the first-context gate; any failure between here and the
    /// runtime load rolls the gate back before returning.
    pub fn initialize_for_app(
        registry: &Arc<ActivationRegistry>,
        app_path: &Path,
        argv: Vec<String>,
        hives: &[PathBuf],
        roll_forward_override: Option<RollForwardPolicy>,
        contract: Arc<dyn HostpolicyContract>,
    ) -> Result<HostContext, HostError> {
        registry.begin_first()?;
        Self::build_first(
            registry, app_path, argv, hives, roll_forward_override, contract, true,
        )
        .inspect_err(|_| registry.rollback())
    }

    /// Initialize a context from a runtime config path (component mode).
    ///
    /// The first such call behaves like app-mode creation; once a runtime
    /// is active, later calls validate compatibility and come back as
    /// `Secondary` contexts over the same runtime.
    pub fn initialize_for_runtime_config(
        registry: &Arc<ActivationRegistry>,
        config_path: &Path,
        hives: &[PathBuf],
        contract: Arc<dyn HostpolicyContract>,
    ) -> Result<HostContext, HostError> {
        match registry.begin_or_join() {
            JoinOutcome::First => Self::build_first(
                registry,
                config_path,
                Vec::new(),
                hives,
                None,
                contract,
                false,
            )
            .inspect_err(|_| registry.rollback()),
            JoinOutcome::Secondary(active) => {
                Self::build_secondary(registry, config_path, active)
            }
        }
    }

    fn build_first(
        registry: &Arc<ActivationRegistry>,
        target: &Path,
        argv: Vec<String>,
        hives: &[PathBuf],
        roll_forward_override: Option<RollForwardPolicy>,
        contract: Arc<dyn HostpolicyContract>,
        is_app: bool,
    ) -> Result<HostContext, HostError> {
        let config_path = if is_app {
            RuntimeConfig::path_for_app(target)
        } else {
            target.to_path_buf()
        };
        let config = RuntimeConfig::from_file(&config_path)?;
        let included_frameworks = config.included_frameworks().to_vec();

        let frameworks = if config.is_framework_dependent() {
            fx::resolve_frameworks_for_app(target, config, hives, roll_forward_override)?
        } else {
            fx::resolve_frameworks_for_app(target, config, hives, None)?
        };

        let mut properties = BTreeMap::new();
        for definition in &frameworks {
            definition.config.combine_properties(&mut properties);
        }

        debug!(path = %target.display(), frameworks = frameworks.len(), "context initialized");
        Ok(HostContext {
            registry: Arc::clone(registry),
            kind: ContextKind::Initialized,
            contract,
            frameworks,
            included_frameworks,
            properties,
            is_app,
            argv,
            target: target.to_path_buf(),
            closed: false,
        })
    }

    fn build_secondary(
        registry: &Arc<ActivationRegistry>,
        config_path: &Path,
        active: Arc<HostContextRecord>,
    ) -> Result<HostContext, HostError> {
        let config = RuntimeConfig::from_file(config_path)?;
        validate_against_active(config.frameworks(), &active, config_path)?;

        let contract = active.contract.clone().ok_or_else(|| {
            HostError::InvalidState("active context has no hostpolicy contract".to_string())
        })?;

        // The active context's properties win on collision; novel
        // properties ride along on the secondary record.
        let mut properties = active.properties.clone();
        let mut requested = BTreeMap::new();
        config.combine_properties(&mut requested);
        for (key, value) in requested {
            match properties.get(&key) {
                Some(existing) if *existing != value => {
                    warn!(key, "property differs from the active context; keeping active value");
                }
                Some(_) => {}
                None => {
                    properties.insert(key, value);
                }
            }
        }

        Ok(HostContext {
            registry: Arc::clone(registry),
            kind: ContextKind::Secondary,
            contract,
            frameworks: active.frameworks.clone(),
            included_frameworks: active.included_frameworks.clone(),
            properties,
            is_app: false,
            argv: Vec::new(),
            target: config_path.to_path_buf(),
            closed: false,
        })
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Resolved definitions, app at index 0.
    pub fn frameworks(&self) -> &[FxDefinition] {
        &self.frameworks
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Properties are only writable before the runtime loads.
    pub fn set_property(&mut self, key: &str, value: &str) -> Result<(), HostError> {
        if self.closed || self.kind != ContextKind::Initialized {
            return Err(HostError::InvalidState(
                "properties are immutable once the runtime is loading".to_string(),
            ));
        }
        self.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Load the runtime (once) and run the app to completion.
    pub fn run_app(&mut self) -> Result<i32, HostError> {
        if !self.is_app {
            return Err(HostError::NotRunnable(self.target.clone()));
        }
        self.ensure_active()?;
        self.contract.run_app()
    }

    /// Load the runtime if this context owns that step, then fetch a
    /// delegate from it.
    pub fn get_runtime_delegate(&mut self, kind: DelegateKind) -> Result<RawDelegate, HostError> {
        self.ensure_active()?;
        self.contract.get_runtime_delegate(kind)
    }

    /// The lazy `Initialized -> Active` transition, performed exactly
    /// once per context: load through the contract, publish the global
    /// active slot, clear `initializing`, and wake everyone blocked on
    /// it. A load failure rolls back the same way before surfacing.
    fn ensure_active(&mut self) -> Result<(), HostError> {
        match self.kind {
            ContextKind::Active | ContextKind::Secondary => return Ok(()),
            ContextKind::Initialized => {}
            ContextKind::Empty | ContextKind::Invalid => {
                return Err(HostError::InvalidState(format!(
                    "cannot load the runtime from a {:?} context",
                    self.kind
                )));
            }
        }
        if self.closed {
            return Err(HostError::InvalidState("context is closed".to_string()));
        }

        let loaded = locate_hostpolicy(&self.frameworks)
            .and_then(|_| self.contract.load(&self.frameworks))
            .and_then(|_| self.contract.initialize(&self.properties, &self.argv));
        if let Err(err) = loaded {
            self.kind = ContextKind::Invalid;
            self.registry.rollback();
            return Err(err);
        }

        self.kind = ContextKind::Active;
        let record = Arc::new(HostContextRecord {
            kind: ContextKind::Active,
            contract: Some(Arc::clone(&self.contract)),
            frameworks: self.frameworks.clone(),
            included_frameworks: self.included_frameworks.clone(),
            properties: self.properties.clone(),
            is_app: self.is_app,
            argv: self.argv.clone(),
        });
        self.registry.publish_active(record);
        debug!(path = %self.target.display(), "runtime activated");
        Ok(())
    }

    /// Close the context. A context that never reached `Active` rolls the
    /// activation gate back exactly like a creation failure; the active
    /// context is kept alive for the process lifetime because the runtime
    /// cannot be unloaded.
    pub fn close(&mut self) -> Result<(), HostError> {
        if self.closed {
            return Err(HostError::InvalidState(
                "context is already closed".to_string(),
            ));
        }
        self.closed = true;
        match self.kind {
            ContextKind::Active => Ok(()),
            ContextKind::Invalid => Ok(()),
            _ => {
                self.registry.rollback();
                Ok(())
            }
        }
    }
}

impl Drop for HostContext {
    /// A context discarded without `close()` must not wedge the process:
    /// release the activation gate exactly as `close()` would. The active
    /// record stays published for the process lifetime either way.
    fn drop(&mut self) {
        if !self.closed && !matches!(self.kind, ContextKind::Active | ContextKind::Invalid) {
            self.registry.rollback();
        }
    }
}

/// A secondary context may only require frameworks the active runtime
/// already loaded (or carries, for self-contained apps), at versions its
/// references can accept.
fn validate_against_active(
    references: &[FrameworkReference],
    active: &HostContextRecord,
    config_path: &Path,
) -> Result<(), HostError> {
    let incompatible = |reason: String| HostError::IncompatibleConfig {
        path: config_path.to_path_buf(),
        reason,
    };
    for reference in references {
        // Loaded definitions with an empty found version are the app
        // entry itself, not frameworks.
        let loaded = active
            .frameworks
            .iter()
            .filter(|d| !d.found_version.is_empty())
            .find(|d| d.name == reference.name)
            .map(|d| d.found_version.clone())
            .or_else(|| {
                active
                    .included_frameworks
                    .iter()
                    .find(|f| f.name == reference.name)
                    .map(|f| f.version.clone())
            });
        let Some(loaded) = loaded else {
            return Err(incompatible(format!(
                "framework '{}' is not part of the active runtime",
                reference.name
            )));
        };
        let compatible = rollforward::matches_policy(
            &loaded,
            Some(&reference.version),
            reference.roll_forward,
            true,
            VersionKind::Framework,
        );
        if !compatible {
            return Err(incompatible(format!(
                "framework '{}' is loaded at {} but the config requires {} ({})",
                reference.name, loaded, reference.version, reference.roll_forward
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::FxVersion;
    use tempfile::TempDir;

    struct NoopContract;

    impl HostpolicyContract for NoopContract {
        fn load(&self, _frameworks: &[FxDefinition]) -> Result<(), HostError> {
            Ok(())
        }
        fn initialize(
            &self,
            _properties: &BTreeMap<String, String>,
            _argv: &[String],
        ) -> Result<(), HostError> {
            Ok(())
        }
        fn run_app(&self) -> Result<i32, HostError> {
            Ok(0)
        }
        fn get_runtime_delegate(&self, _kind: DelegateKind) -> Result<RawDelegate, HostError> {
            Ok(RawDelegate(0x1000))
        }
        fn get_property(&self, _key: &str) -> Option<String> {
            None
        }
    }

    fn definition(name: &str, found: &str, dir: &Path) -> FxDefinition {
        FxDefinition {
            name: name.to_string(),
            dir: dir.to_path_buf(),
            requested_version: FxVersion::parse(found).unwrap(),
            found_version: FxVersion::parse(found).unwrap(),
            config: RuntimeConfig::default(),
        }
    }

    fn active_record(frameworks: Vec<FxDefinition>) -> HostContextRecord {
        HostContextRecord {
            kind: ContextKind::Active,
            contract: Some(Arc::new(NoopContract)),
            frameworks,
            included_frameworks: Vec::new(),
            properties: BTreeMap::new(),
            is_app: true,
            argv: Vec::new(),
        }
    }

    #[test]
    fn test_host_mode_config_paths() {
        assert_eq!(
            HostMode::Muxer.runtime_config_path(Path::new("/a/app.dll")),
            PathBuf::from("/a/app.runtimeconfig.json")
        );
        assert_eq!(
            HostMode::SplitFx.runtime_config_path(Path::new("/a/component.runtimeconfig.json")),
            PathBuf::from("/a/component.runtimeconfig.json")
        );
    }

    #[test]
    fn test_locate_hostpolicy_prefers_root_framework() {
        let dir = TempDir::new().unwrap();
        let fx_dir = dir.path().join("shared/Microsoft.NETCore.App/6.0.1");
        std::fs::create_dir_all(&fx_dir).unwrap();
        std::fs::write(fx_dir.join(HOSTPOLICY_LIB), "").unwrap();

        let defs = vec![
            definition("app", "0.0.0", dir.path()),
            definition("Microsoft.NETCore.App", "6.0.1", &fx_dir),
        ];
        // Walked from the end: the root framework wins over the app dir.
        assert_eq!(
            locate_hostpolicy(&defs).unwrap(),
            fx_dir.join(HOSTPOLICY_LIB)
        );
    }

    #[test]
    fn test_locate_hostpolicy_missing() {
        let dir = TempDir::new().unwrap();
        let defs = vec![definition("Microsoft.NETCore.App", "6.0.1", dir.path())];
        let err = locate_hostpolicy(&defs).unwrap_err();
        assert_eq!(
            err.status_code(),
            crate::status::StatusCode::CoreHostLibMissingFailure
        );
    }

    #[test]
    fn test_registry_first_gate_and_rollback() {
        let registry = ActivationRegistry::new();
        registry.begin_first().unwrap();
        assert!(registry.is_initializing());
        registry.rollback();
        assert!(!registry.is_initializing());
        // A later creation proceeds after the rollback.
        registry.begin_first().unwrap();
    }

    #[test]
    fn test_begin_first_fails_once_active() {
        let registry = ActivationRegistry::new();
        registry.begin_first().unwrap();
        registry.publish_active(Arc::new(active_record(Vec::new())));
        assert!(!registry.is_initializing());
        let err = registry.begin_first().unwrap_err();
        assert_eq!(
            err.status_code(),
            crate::status::StatusCode::HostInvalidState
        );
    }

    #[test]
    fn test_placeholder_population() {
        let registry = ActivationRegistry::new();
        registry.publish_placeholder();
        assert_eq!(
            registry.active_context().unwrap().kind,
            ContextKind::Empty
        );
        registry.populate_placeholder(Arc::new(active_record(Vec::new())));
        assert_eq!(
            registry.active_context().unwrap().kind,
            ContextKind::Active
        );
    }

    #[test]
    fn test_secondary_compat_accepts_loaded_version() {
        let dir = TempDir::new().unwrap();
        let active = active_record(vec![definition("Microsoft.NETCore.App", "6.0.5", dir.path())]);
        let refs = vec![FrameworkReference::new(
            "Microsoft.NETCore.App",
            FxVersion::new(6, 0, 0),
            RollForwardPolicy::Minor,
        )];
        assert!(validate_against_active(&refs, &active, Path::new("/c.json")).is_ok());
    }

    #[test]
    fn test_secondary_compat_rejects_newer_requirement() {
        let dir = TempDir::new().unwrap();
        let active = active_record(vec![definition("Microsoft.NETCore.App", "6.0.5", dir.path())]);
        let refs = vec![FrameworkReference::new(
            "Microsoft.NETCore.App",
            FxVersion::new(7, 0, 0),
            RollForwardPolicy::Minor,
        )];
        let err = validate_against_active(&refs, &active, Path::new("/c.json")).unwrap_err();
        assert_eq!(
            err.status_code(),
            crate::status::StatusCode::CoreHostIncompatibleConfig
        );
    }

    #[test]
    fn test_secondary_compat_rejects_unknown_framework() {
        let dir = TempDir::new().unwrap();
        let active = active_record(vec![definition("Microsoft.NETCore.App", "6.0.5", dir.path())]);
        let refs = vec![FrameworkReference::new(
            "Microsoft.AspNetCore.App",
            FxVersion::new(6, 0, 0),
            RollForwardPolicy::Minor,
        )];
        assert!(validate_against_active(&refs, &active, Path::new("/c.json")).is_err());
    }

    #[test]
    fn test_secondary_compat_uses_included_frameworks_for_self_contained() {
        let mut active = active_record(Vec::new());
        active.included_frameworks = vec![FrameworkReference::new(
            "Microsoft.NETCore.App",
            FxVersion::new(6, 0, 5),
            RollForwardPolicy::Minor,
        )];
        let refs = vec![FrameworkReference::new(
            "Microsoft.NETCore.App",
            FxVersion::new(6, 0, 0),
            RollForwardPolicy::Minor,
        )];
        assert!(validate_against_active(&refs, &active, Path::new("/c.json")).is_ok());
    }
}
