//! # Registry Module
//!
//! The [`Registry`] coordinates namespace attachment, path composition, deferred
//! registration and the specification document for one API.
//!
//! ## Lifecycle
//!
//! A registry is either **lazy** (no host application yet) or **bound**.
//! Registrations made while lazy are queued; [`Registry::init_app`] binds the
//! registry and drains the queue once, in FIFO order. The transition is one-way.
//!
//! ```rust
//! use brrtplus::{host::RecordingHost, InfoOverrides, Registry, RouteOptions, StaticResource};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = Registry::default();
//! let ns = registry.namespace("TestNamespace");
//! ns.route(["/some_endpoint"], RouteOptions::new().arg("reply", "[0]"))
//!     .to(StaticResource::new("SomeHandler"))?;
//!
//! let host = Arc::new(RecordingHost::new());
//! registry.init_app(host.clone(), InfoOverrides::default())?;
//! assert_eq!(host.patterns(), vec!["/TestNamespace/some_endpoint"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Path composition
//!
//! A binding on namespace `ns` registers at `compose(prefix, template)` where
//! `prefix` is this registry's override for `ns`, or `ns.path()` when there is
//! none. The registry has no structural path of its own; mounting it under a
//! prefix is the host application's business (see [`crate::host::Mount`]).

use crate::host::HostApp;
use crate::namespace::{Namespace, NamespaceBuilder, ResourceBinding};
use crate::path;
use crate::resource::{ResourceHandle, RouteOptions, UrlSpec};
use crate::spec::{SchemaSource, SpecAggregator, SpecDocument};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the namespace every registry creates at construction.
pub const DEFAULT_NAMESPACE: &str = "default";

/// API metadata carried into the specification document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub terms_url: Option<String>,
    pub contact: Option<String>,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0".to_string(),
            description: None,
            terms_url: None,
            contact: None,
            contact_url: None,
            contact_email: None,
            license: None,
            license_url: None,
        }
    }
}

impl ApiInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn apply(&mut self, overrides: InfoOverrides) {
        let InfoOverrides {
            title,
            description,
            terms_url,
            contact,
            contact_url,
            contact_email,
            license,
            license_url,
        } = overrides;
        if let Some(title) = title {
            self.title = title;
        }
        self.description = description.or(self.description.take());
        self.terms_url = terms_url.or(self.terms_url.take());
        self.contact = contact.or(self.contact.take());
        self.contact_url = contact_url.or(self.contact_url.take());
        self.contact_email = contact_email.or(self.contact_email.take());
        self.license = license.or(self.license.take());
        self.license_url = license_url.or(self.license_url.take());
    }
}

/// Metadata overrides accepted by [`Registry::init_app`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub terms_url: Option<String>,
    pub contact: Option<String>,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
}

enum Mode {
    Lazy { pending: Vec<QueuedRoute> },
    Bound { host: Arc<dyn HostApp> },
}

/// A deferred registration and the namespace binding it was composed from.
struct QueuedRoute {
    spec: UrlSpec,
    origin: Option<Arc<ResourceBinding>>,
}

/// Paths one binding produced under one registry.
#[derive(Debug, Clone)]
pub(crate) struct ComposedBinding {
    pub binding: Arc<ResourceBinding>,
    pub paths: Vec<String>,
}

struct Attachment {
    namespace: Namespace,
    path_override: Option<String>,
    composed: Vec<ComposedBinding>,
}

struct RegistryState {
    info: ApiInfo,
    attachments: Vec<Attachment>,
    mode: Mode,
    definitions: BTreeMap<String, Arc<dyn SchemaSource>>,
}

pub(crate) struct RegistryShared {
    default_namespace: Namespace,
    state: Mutex<RegistryState>,
}

/// What the specification builder reads, taken under a single lock.
pub(crate) struct RegistrySnapshot {
    pub info: ApiInfo,
    pub namespaces: Vec<(Namespace, Vec<ComposedBinding>)>,
    pub definitions: Vec<(String, Arc<dyn SchemaSource>)>,
}

/// Handle to an API registry. Clones share the same registry.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryShared>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(ApiInfo::default())
    }
}

impl Registry {
    /// Create a lazy registry; registrations queue until [`Registry::init_app`].
    pub fn new(info: ApiInfo) -> Self {
        Self::with_mode(info, Mode::Lazy { pending: Vec::new() })
    }

    /// Create a registry already bound to `app`.
    pub fn with_app(app: Arc<dyn HostApp>, info: ApiInfo) -> Self {
        Self::with_mode(info, Mode::Bound { host: app })
    }

    fn with_mode(info: ApiInfo, mode: Mode) -> Self {
        let default_namespace = Namespace::builder(DEFAULT_NAMESPACE)
            .description("Default namespace")
            .path("/")
            .build();
        let registry = Self {
            inner: Arc::new(RegistryShared {
                default_namespace: default_namespace.clone(),
                state: Mutex::new(RegistryState {
                    info,
                    attachments: Vec::new(),
                    mode,
                    definitions: BTreeMap::new(),
                }),
            }),
        };
        registry.attach(&default_namespace, None);
        registry
    }

    pub(crate) fn from_shared(inner: Arc<RegistryShared>) -> Self {
        Self { inner }
    }

    /// Whether both handles refer to the same registry.
    #[must_use]
    pub fn same_as(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn info(&self) -> ApiInfo {
        self.inner.state.lock().info.clone()
    }

    /// The namespace created at construction, mounted at `/`.
    #[must_use]
    pub fn default_namespace(&self) -> Namespace {
        self.inner.default_namespace.clone()
    }

    /// Attached namespaces in attachment order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.inner
            .state
            .lock()
            .attachments
            .iter()
            .map(|a| a.namespace.clone())
            .collect()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.inner.state.lock().mode, Mode::Bound { .. })
    }

    /// Number of registrations waiting for a host application.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        match &self.inner.state.lock().mode {
            Mode::Lazy { pending } => pending.len(),
            Mode::Bound { .. } => 0,
        }
    }

    /// Create a namespace and attach it with no override.
    ///
    /// Accepts a bare name or a [`NamespaceBuilder`] carrying a path and
    /// description.
    pub fn namespace(&self, ns: impl Into<NamespaceBuilder>) -> Namespace {
        let ns = ns.into().build();
        // A fresh namespace has no bindings, so attaching registers nothing.
        self.attach(&ns, None);
        ns
    }

    /// Attach `ns`, optionally with a path override used by this registry only.
    ///
    /// On first attach every binding already recorded on `ns` is registered
    /// here. Attaching again only replaces the override when `path` is given;
    /// routes registered under the previous override stay where they are.
    pub fn add_namespace(&self, ns: &Namespace, path: Option<&str>) -> anyhow::Result<()> {
        let Some(backlog) = self.attach(ns, path) else {
            return Ok(());
        };
        info!(
            namespace = %ns.name(),
            path_override = ?path,
            backfill = backlog.len(),
            "Namespace attached to registry"
        );
        for binding in &backlog {
            self.register_binding(ns, binding)?;
        }
        Ok(())
    }

    /// Returns the bindings to back-fill, or `None` if `ns` was already attached.
    fn attach(&self, ns: &Namespace, path: Option<&str>) -> Option<Vec<Arc<ResourceBinding>>> {
        {
            let mut state = self.inner.state.lock();
            if let Some(existing) = state
                .attachments
                .iter_mut()
                .find(|a| a.namespace.same_as(ns))
            {
                if let Some(path) = path {
                    debug!(namespace = %ns.name(), path_override = %path, "Namespace override replaced");
                    existing.path_override = Some(path.to_string());
                }
                return None;
            }
            state.attachments.push(Attachment {
                namespace: ns.clone(),
                path_override: path.map(str::to_string),
                composed: Vec::new(),
            });
        }
        Some(ns.attach(Arc::downgrade(&self.inner)))
    }

    /// Compose the final paths for `urls` under `ns` as seen by this registry.
    #[must_use]
    pub fn ns_urls<I, S>(&self, ns: &Namespace, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = self.ns_prefix(ns);
        urls.into_iter()
            .map(|url| path::compose([prefix.as_str(), url.as_ref()]))
            .collect()
    }

    fn ns_prefix(&self, ns: &Namespace) -> String {
        let state = self.inner.state.lock();
        state
            .attachments
            .iter()
            .find(|a| a.namespace.same_as(ns))
            .and_then(|a| a.path_override.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ns.path())
    }

    /// Compose, record and register one namespace binding.
    pub(crate) fn register_binding(
        &self,
        ns: &Namespace,
        binding: &Arc<ResourceBinding>,
    ) -> anyhow::Result<()> {
        let paths = self.ns_urls(ns, &binding.urls);
        {
            let mut state = self.inner.state.lock();
            if let Some(attachment) = state
                .attachments
                .iter_mut()
                .find(|a| a.namespace.same_as(ns))
            {
                attachment.composed.push(ComposedBinding {
                    binding: Arc::clone(binding),
                    paths: paths.clone(),
                });
            }
        }
        let specs: Vec<UrlSpec> = paths
            .into_iter()
            .map(|pattern| UrlSpec {
                pattern,
                handler: binding.handler.clone(),
                options: binding.options.clone(),
            })
            .collect();
        self.submit(Some(ns), &specs, Some(binding))
    }

    /// Register `handler` at already composed `urls`.
    ///
    /// Bound registries call the host right away; lazy ones queue the entries.
    /// `namespace` is informational. Host errors are returned unchanged.
    pub fn register_resource<I, S>(
        &self,
        namespace: Option<&Namespace>,
        handler: impl Into<ResourceHandle>,
        urls: I,
        options: RouteOptions,
    ) -> anyhow::Result<Vec<UrlSpec>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handler = handler.into();
        let specs: Vec<UrlSpec> = urls
            .into_iter()
            .map(|url| UrlSpec {
                pattern: url.into(),
                handler: handler.clone(),
                options: options.clone(),
            })
            .collect();
        self.submit(namespace, &specs, None)?;
        Ok(specs)
    }

    /// Queue `specs` while lazy, or hand every one of them to the host.
    fn submit(
        &self,
        namespace: Option<&Namespace>,
        specs: &[UrlSpec],
        origin: Option<&Arc<ResourceBinding>>,
    ) -> anyhow::Result<()> {
        let host = {
            let mut state = self.inner.state.lock();
            match &mut state.mode {
                Mode::Lazy { pending } => {
                    pending.extend(specs.iter().map(|spec| QueuedRoute {
                        spec: spec.clone(),
                        origin: origin.cloned(),
                    }));
                    debug!(
                        namespace = ?namespace.map(Namespace::name),
                        queued = specs.len(),
                        pending = pending.len(),
                        "Registration deferred until a host application is attached"
                    );
                    return Ok(());
                }
                Mode::Bound { host } => Arc::clone(host),
            }
        };

        let mut first_error = None;
        for spec in specs {
            debug!(
                namespace = ?namespace.map(Namespace::name),
                handler = %spec.handler.name(),
                pattern = %spec.pattern,
                "Registering route"
            );
            if let Err(err) = self.deliver(host.as_ref(), spec, origin) {
                first_error = first_error.or(Some(err));
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Call the host for one route. A rejected path is dropped from the
    /// composed record so the document only lists what the host accepted.
    fn deliver(
        &self,
        host: &dyn HostApp,
        spec: &UrlSpec,
        origin: Option<&Arc<ResourceBinding>>,
    ) -> anyhow::Result<()> {
        host.add_route(&spec.pattern, &spec.handler, &spec.options)
            .inspect_err(|err| {
                warn!(
                    pattern = %spec.pattern,
                    handler = %spec.handler.name(),
                    error = %err,
                    "Host rejected route"
                );
                if let Some(binding) = origin {
                    self.retract(binding, &spec.pattern);
                }
            })
    }

    fn retract(&self, binding: &Arc<ResourceBinding>, pattern: &str) {
        let mut state = self.inner.state.lock();
        for attachment in &mut state.attachments {
            let Some(at) = attachment
                .composed
                .iter()
                .position(|c| Arc::ptr_eq(&c.binding, binding))
            else {
                continue;
            };
            let composed = &mut attachment.composed[at];
            if let Some(i) = composed.paths.iter().position(|p| p == pattern) {
                composed.paths.remove(i);
            }
            if composed.paths.is_empty() {
                attachment.composed.remove(at);
            }
            return;
        }
    }

    /// Bind the registry to `app` and flush queued registrations in order.
    ///
    /// The queue is drained exactly once. Calling this on a registry that is
    /// already bound applies the metadata overrides and switches later
    /// registrations to `app`, but registers nothing itself. Every queued entry
    /// is offered to the host even if an earlier one is rejected; the first
    /// error is returned and rejected paths leave the document.
    pub fn init_app(&self, app: Arc<dyn HostApp>, overrides: InfoOverrides) -> anyhow::Result<()> {
        let pending = {
            let mut state = self.inner.state.lock();
            state.info.apply(overrides);
            match std::mem::replace(
                &mut state.mode,
                Mode::Bound {
                    host: Arc::clone(&app),
                },
            ) {
                Mode::Lazy { pending } => pending,
                Mode::Bound { .. } => Vec::new(),
            }
        };

        info!(flushed = pending.len(), "Registry bound to host application");
        let mut first_error = None;
        for queued in &pending {
            if let Err(err) = self.deliver(app.as_ref(), &queued.spec, queued.origin.as_ref()) {
                first_error = first_error.or(Some(err));
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Store a schema definition that belongs to no particular namespace.
    pub fn definition(&self, name: impl Into<String>, schema: impl SchemaSource + 'static) {
        self.inner
            .state
            .lock()
            .definitions
            .insert(name.into(), Arc::new(schema));
    }

    /// Build the specification document with the default documentation parser.
    pub fn spec(&self) -> anyhow::Result<SpecDocument> {
        SpecAggregator::new().build(self)
    }

    pub(crate) fn snapshot(&self) -> RegistrySnapshot {
        let state = self.inner.state.lock();
        RegistrySnapshot {
            info: state.info.clone(),
            namespaces: state
                .attachments
                .iter()
                .map(|a| (a.namespace.clone(), a.composed.clone()))
                .collect(),
            definitions: state
                .definitions
                .iter()
                .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
                .collect(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Registry")
            .field("title", &state.info.title)
            .field("namespaces", &state.attachments.len())
            .field("bound", &matches!(state.mode, Mode::Bound { .. }))
            .finish()
    }
}
