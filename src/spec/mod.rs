//! # Spec Module
//!
//! Builds the machine-readable specification document of a [`Registry`](crate::Registry).
//!
//! The document is assembled on demand by [`SpecAggregator`]: it walks every
//! namespace attached to the registry, parses the documentation fragment of
//! each handler method through a [`DocParser`], and merges the schema
//! definitions declared on the registry and its namespaces.
//!
//! - [`aggregator`] - the walk and merge
//! - [`docstring`] - the default fragment parser (free text, `---`, YAML)
//! - [`document`] - the serializable document types
//! - [`schema`] - the schema collaborator boundary

pub mod aggregator;
pub mod docstring;
pub mod document;
pub mod schema;

pub use aggregator::SpecAggregator;
pub use docstring::{DocParser, YamlDocParser};
pub use document::{SpecDocument, SWAGGER_VERSION};
pub use schema::SchemaSource;
