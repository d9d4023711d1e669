//! # brrtplus
//!
//! **brrtplus** is a declarative route and API-specification registry that sits on
//! top of an existing HTTP host application.
//!
//! ## Overview
//!
//! Call sites group handlers into named [`Namespace`]s, attach namespaces to one or
//! more [`Registry`] instances, and let each registry compose the final URL paths and
//! register them with its host. Each registry also assembles a specification document
//! (paths and schema definitions) from the documentation fragments of the handlers it
//! can see.
//!
//! ## Architecture
//!
//! - **[`path`]** - path chunk normalization and composition
//! - **[`resource`]** - the handler reference, registration options and url specs
//! - **[`namespace`]** - bindings grouped under a path, attachable to many registries
//! - **[`registry`]** - attachment, overrides, the lazy/bound state machine
//! - **[`spec`]** - specification document aggregation and fragment parsing
//! - **[`host`]** - the host application boundary and the hosts shipped with the crate
//! - **[`logging`]** / **[`runtime_config`]** - ambient logging setup
//!
//! ### Registration Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant NS as Namespace
//!     participant Reg as Registry
//!     participant Host as HostApp
//!
//!     Caller->>NS: route(["/first", "/second"]).to(handler)
//!     NS->>NS: record ResourceBinding
//!     loop every attached registry (attachment order)
//!         NS->>Reg: register_binding(ns, binding)
//!         Reg->>Reg: ns_urls: compose(override or ns.path, template)
//!         alt Lazy
//!             Reg->>Reg: push to pending queue
//!         else Bound
//!             Reg->>Host: add_route(path, handler, options)
//!         end
//!     end
//!
//!     Caller->>Reg: init_app(host)
//!     Reg->>Reg: Lazy -> Bound (one-way)
//!     loop pending queue (FIFO)
//!         Reg->>Host: add_route(path, handler, options)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtplus::host::RouteTable;
//! use brrtplus::{ApiInfo, InfoOverrides, Registry, RouteOptions, StaticResource};
//! use http::Method;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = Registry::new(ApiInfo::new("Pet Store"));
//! let pets = registry.namespace("pets");
//!
//! pets.route(["/", "/{id}"], RouteOptions::new()).to(
//!     StaticResource::new("Pets").method(
//!         Method::GET,
//!         Some("List or fetch pets.\n---\ndescription: Pets\n"),
//!     ),
//! )?;
//!
//! let app = Arc::new(RouteTable::new());
//! registry.init_app(app.clone(), InfoOverrides::default())?;
//!
//! assert_eq!(app.route("/pets/42").unwrap().get_path_param("id"), Some("42"));
//! assert!(registry.spec()?.operation("/pets/{id}", "get").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Considerations
//!
//! The registration graph is meant to be built at startup, before traffic. All
//! operations are synchronous; each registry and namespace guards its own state with
//! a mutex so handles can be shared across threads, but hosts are called with no
//! registry lock held and must not expect registration to be atomic across calls.

pub mod host;
pub mod logging;
pub mod namespace;
pub mod path;
pub mod registry;
pub mod resource;
pub mod runtime_config;
pub mod spec;

pub use host::HostApp;
pub use namespace::{Namespace, NamespaceBuilder, ResourceBinding, RouteBuilder};
pub use registry::{ApiInfo, InfoOverrides, Registry, DEFAULT_NAMESPACE};
pub use resource::{MethodDoc, Resource, ResourceHandle, RouteOptions, StaticResource, UrlSpec};
pub use spec::{SpecAggregator, SpecDocument};
