//! # Resource Module
//!
//! The handler side of a route: what a namespace binds, what a registry hands to
//! its host application, and the options that travel with it.
//!
//! The registry never calls a handler. It only needs a stable identity to pass
//! along and, for documentation, the per-method fragments returned by
//! [`Resource::methods`].

use http::Method;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Documentation attached to one HTTP method of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDoc {
    pub method: Method,
    /// Free text, optionally followed by a `---` line and a structured block.
    pub doc: Option<String>,
}

impl MethodDoc {
    pub fn new(method: Method, doc: Option<&str>) -> Self {
        Self {
            method,
            doc: doc.map(str::to_string),
        }
    }
}

/// A request handler type as seen by the registry.
///
/// Implementors are normally zero-sized marker types or small descriptors; the
/// host application is responsible for turning them into something that serves
/// requests.
pub trait Resource: Send + Sync + 'static {
    /// Display name, used in logs and by host applications.
    fn name(&self) -> &str;

    /// Methods the resource handles, with their documentation fragments.
    fn methods(&self) -> Vec<MethodDoc> {
        Vec::new()
    }
}

/// Shared, cheaply clonable reference to a [`Resource`].
///
/// Two handles are the same handler only if they point at the same allocation.
#[derive(Clone)]
pub struct ResourceHandle(Arc<dyn Resource>);

impl ResourceHandle {
    pub fn new<R: Resource>(resource: R) -> Self {
        Self(Arc::new(resource))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    #[must_use]
    pub fn methods(&self) -> Vec<MethodDoc> {
        self.0.methods()
    }

    /// Pointer identity, not name equality.
    #[must_use]
    pub fn same_as(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<R: Resource> From<R> for ResourceHandle {
    fn from(resource: R) -> Self {
        Self::new(resource)
    }
}

impl From<Arc<dyn Resource>> for ResourceHandle {
    fn from(resource: Arc<dyn Resource>) -> Self {
        Self(resource)
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceHandle").field(&self.name()).finish()
    }
}

/// A [`Resource`] described entirely by data.
///
/// ```rust
/// use brrtplus::resource::{ResourceHandle, StaticResource};
/// use http::Method;
///
/// let greeter: ResourceHandle = StaticResource::new("Greeter")
///     .method(Method::GET, Some("Greet.\n---\ndescription: Get a greeting"))
///     .method(Method::POST, None)
///     .into();
/// assert_eq!(greeter.methods().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticResource {
    name: String,
    methods: Vec<MethodDoc>,
}

impl StaticResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method, doc: Option<&str>) -> Self {
        self.methods.push(MethodDoc::new(method, doc));
        self
    }
}

impl Resource for StaticResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> Vec<MethodDoc> {
        self.methods.clone()
    }
}

/// Registration options for one binding.
///
/// `doc` controls whether the binding appears in the specification document;
/// it never affects routing. `args` are handler-construction arguments passed
/// to the host application untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub doc: bool,
    pub args: Map<String, Value>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            doc: true,
            args: Map::new(),
        }
    }
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn doc(mut self, enabled: bool) -> Self {
        self.doc = enabled;
        self
    }

    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// One `(pattern, handler, options)` registration, as handed to a host.
#[derive(Debug, Clone)]
pub struct UrlSpec {
    pub pattern: String,
    pub handler: ResourceHandle,
    pub options: RouteOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_identity_is_pointer_based() {
        let a: ResourceHandle = StaticResource::new("Same").into();
        let b: ResourceHandle = StaticResource::new("Same").into();
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_route_options_default_documents() {
        let opts = RouteOptions::new().arg("reply", "[0]");
        assert!(opts.doc);
        assert_eq!(opts.args.get("reply"), Some(&Value::from("[0]")));
        assert!(!opts.doc(false).doc);
    }
}
