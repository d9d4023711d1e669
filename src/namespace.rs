//! # Namespace Module
//!
//! A namespace groups resource bindings under a common path and can be attached
//! to any number of [`Registry`] instances.
//!
//! Bindings are recorded on the namespace first. Every registry attached at the
//! time of the call registers the binding right away (in attachment order);
//! registries attached later pick it up when they attach.
//!
//! ```rust
//! use brrtplus::{Namespace, Registry, RouteOptions, StaticResource};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ns = Namespace::new("pets");
//! ns.route(["/", "/list"], RouteOptions::new())
//!     .to(StaticResource::new("ListPets"))?;
//!
//! let registry = Registry::default();
//! registry.add_namespace(&ns, None)?;
//! assert_eq!(registry.pending_len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::path;
use crate::registry::{Registry, RegistryShared};
use crate::resource::{ResourceHandle, RouteOptions};
use crate::spec::SchemaSource;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// One handler bound to one or more raw URL templates.
///
/// Immutable once recorded on a namespace.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    pub handler: ResourceHandle,
    pub urls: Vec<String>,
    pub options: RouteOptions,
}

pub(crate) struct NamespaceShared {
    name: String,
    description: Option<String>,
    path: Option<String>,
    state: Mutex<NamespaceState>,
}

#[derive(Default)]
struct NamespaceState {
    bindings: Vec<Arc<ResourceBinding>>,
    definitions: BTreeMap<String, Arc<dyn SchemaSource>>,
    registries: Vec<Weak<RegistryShared>>,
}

/// Handle to a namespace. Clones share the same namespace.
///
/// Identity is the shared allocation, not the name: two namespaces built with
/// the same name are distinct.
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<NamespaceShared>,
}

/// Builder for namespaces that need more than a name.
#[derive(Debug, Clone)]
pub struct NamespaceBuilder {
    name: String,
    description: Option<String>,
    path: Option<String>,
}

impl NamespaceBuilder {
    /// Explicit path prefix. Defaults to `/` + name.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Namespace {
        Namespace {
            inner: Arc::new(NamespaceShared {
                name: self.name,
                description: self.description,
                path: self.path,
                state: Mutex::new(NamespaceState::default()),
            }),
        }
    }
}

impl From<&str> for NamespaceBuilder {
    fn from(name: &str) -> Self {
        Namespace::builder(name)
    }
}

impl From<String> for NamespaceBuilder {
    fn from(name: String) -> Self {
        Namespace::builder(name)
    }
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder {
            name: name.into(),
            description: None,
            path: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// Normalized path prefix: the explicit path if one was given, else `/` + name.
    /// An empty explicit path counts as none.
    #[must_use]
    pub fn path(&self) -> String {
        match self.inner.path.as_deref().filter(|p| !p.is_empty()) {
            Some(explicit) => path::normalize(explicit),
            None => path::normalize(&format!("/{}", self.inner.name)),
        }
    }

    /// Whether both handles refer to the same namespace.
    #[must_use]
    pub fn same_as(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Record a binding and register it with every attached registry.
    ///
    /// Registries are visited in the order they attached this namespace, and
    /// each registers the templates in argument order. A registry offers every
    /// template to its host even after a rejection; the first host error then
    /// stops the walk over registries and is returned as is. The binding stays
    /// recorded.
    pub fn add_resource<I, S>(
        &self,
        handler: impl Into<ResourceHandle>,
        urls: I,
        options: RouteOptions,
    ) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let binding = Arc::new(ResourceBinding {
            handler: handler.into(),
            urls: urls.into_iter().map(Into::into).collect(),
            options,
        });

        let registries: Vec<Arc<RegistryShared>> = {
            let mut state = self.inner.state.lock();
            state.bindings.push(Arc::clone(&binding));
            state.registries.retain(|r| r.strong_count() > 0);
            state.registries.iter().filter_map(Weak::upgrade).collect()
        };

        debug!(
            namespace = %self.inner.name,
            handler = %binding.handler.name(),
            urls = ?binding.urls,
            registries = registries.len(),
            "Resource added to namespace"
        );

        for shared in registries {
            Registry::from_shared(shared).register_binding(self, &binding)?;
        }
        Ok(())
    }

    /// Start a route declaration; finish it with [`RouteBuilder::to`].
    ///
    /// Stacking several routes on one handler means calling `route(..).to(..)`
    /// once per declaration, innermost first:
    ///
    /// ```rust
    /// use brrtplus::{Namespace, RouteOptions, StaticResource};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let ns = Namespace::new("ns");
    /// let handler = ns.route(["/third"], RouteOptions::new()).to(StaticResource::new("H"))?;
    /// let handler = ns.route(["/second"], RouteOptions::new()).to(handler)?;
    /// ns.route(["/first"], RouteOptions::new()).to(handler)?;
    /// assert_eq!(ns.bindings().len(), 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn route<I, S>(&self, urls: I, options: RouteOptions) -> RouteBuilder<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RouteBuilder {
            namespace: self,
            urls: urls.into_iter().map(Into::into).collect(),
            options,
        }
    }

    /// Store a schema definition on this namespace.
    ///
    /// Definitions are read by the specification builder of each attached
    /// registry; nothing is pushed to registries here.
    pub fn definition(&self, name: impl Into<String>, schema: impl SchemaSource + 'static) {
        self.inner
            .state
            .lock()
            .definitions
            .insert(name.into(), Arc::new(schema));
    }

    /// Snapshot of the recorded bindings, in recording order.
    #[must_use]
    pub fn bindings(&self) -> Vec<Arc<ResourceBinding>> {
        self.inner.state.lock().bindings.clone()
    }

    pub(crate) fn definitions(&self) -> Vec<(String, Arc<dyn SchemaSource>)> {
        self.inner
            .state
            .lock()
            .definitions
            .iter()
            .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
            .collect()
    }

    /// Number of live registries this namespace is attached to.
    #[must_use]
    pub fn registry_count(&self) -> usize {
        self.inner
            .state
            .lock()
            .registries
            .iter()
            .filter(|r| r.strong_count() > 0)
            .count()
    }

    /// Add the back-reference and take the bindings to back-fill under one lock,
    /// so a binding cannot be both back-filled and pushed by `add_resource`.
    pub(crate) fn attach(&self, registry: Weak<RegistryShared>) -> Vec<Arc<ResourceBinding>> {
        let mut state = self.inner.state.lock();
        if !state.registries.iter().any(|r| r.ptr_eq(&registry)) {
            state.registries.push(registry);
        }
        state.bindings.clone()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.inner.name)
            .field("path", &self.path())
            .finish()
    }
}

/// Pending route declaration returned by [`Namespace::route`].
#[must_use = "a route is only recorded once `to` is called"]
pub struct RouteBuilder<'a> {
    namespace: &'a Namespace,
    urls: Vec<String>,
    options: RouteOptions,
}

impl RouteBuilder<'_> {
    /// Bind `handler` and hand it back unchanged, ready for the next declaration.
    pub fn to(self, handler: impl Into<ResourceHandle>) -> anyhow::Result<ResourceHandle> {
        let handler = handler.into();
        self.namespace
            .add_resource(handler.clone(), self.urls, self.options)?;
        Ok(handler)
    }
}
