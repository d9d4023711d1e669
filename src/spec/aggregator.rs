//! Specification aggregation.
//!
//! The build is a pure read of the registry: it never registers, queues or
//! changes overrides, and two builds with no mutation in between are equal.

use super::docstring::{DocParser, YamlDocParser};
use super::document::{InfoObject, SpecDocument};
use super::schema::SchemaSource;
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Assembles a [`SpecDocument`] from a registry.
pub struct SpecAggregator {
    parser: Box<dyn DocParser>,
}

impl Default for SpecAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecAggregator {
    pub fn new() -> Self {
        Self::with_parser(YamlDocParser)
    }

    pub fn with_parser(parser: impl DocParser + 'static) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }

    /// Build the document for `registry`.
    ///
    /// Paths come from bindings with `doc` enabled on attached namespaces, in
    /// attachment order; a later operation for the same path and method
    /// replaces an earlier one. Definitions are the registry's own, overlaid
    /// by each namespace's in attachment order, last writer wins. Only schema
    /// expansion can fail.
    pub fn build(&self, registry: &Registry) -> anyhow::Result<SpecDocument> {
        let snapshot = registry.snapshot();
        let mut doc = SpecDocument::new(InfoObject::from(&snapshot.info));

        for (namespace, composed) in &snapshot.namespaces {
            for entry in composed {
                if !entry.binding.options.doc {
                    continue;
                }
                let methods = entry.binding.handler.methods();
                for path in &entry.paths {
                    for method in &methods {
                        let Some(fragment) = method.doc.as_deref() else {
                            continue;
                        };
                        let Some(operation) = self.parser.parse(fragment) else {
                            continue;
                        };
                        debug!(
                            namespace = %namespace.name(),
                            handler = %entry.binding.handler.name(),
                            path = %path,
                            method = %method.method,
                            "Operation documented"
                        );
                        doc.paths
                            .entry(path.clone())
                            .or_default()
                            .insert(method.method.as_str().to_ascii_lowercase(), operation);
                    }
                }
            }
        }

        let mut visible: BTreeMap<String, Arc<dyn SchemaSource>> =
            snapshot.definitions.into_iter().collect();
        for (namespace, _) in &snapshot.namespaces {
            visible.extend(namespace.definitions());
        }
        for (name, schema) in visible {
            let expanded = schema.expand()?;
            doc.definitions.insert(name, expanded);
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{RouteOptions, StaticResource};
    use http::Method;
    use serde_json::{json, Value};

    struct FixedParser;

    impl DocParser for FixedParser {
        fn parse(&self, fragment: &str) -> Option<Value> {
            Some(json!({ "description": fragment }))
        }
    }

    #[test]
    fn test_custom_parser_is_used() {
        let registry = Registry::default();
        let ns = registry.namespace("api");
        ns.add_resource(
            StaticResource::new("H").method(Method::PUT, Some("plain words")),
            ["/x"],
            RouteOptions::new(),
        )
        .unwrap();

        let doc = SpecAggregator::with_parser(FixedParser).build(&registry).unwrap();
        assert_eq!(
            doc.operation("/api/x", "put"),
            Some(&json!({"description": "plain words"}))
        );
    }

    #[test]
    fn test_schema_failure_surfaces_at_build() {
        struct Broken;
        impl SchemaSource for Broken {
            fn expand(&self) -> anyhow::Result<Value> {
                anyhow::bail!("cannot expand Broken")
            }
        }

        let registry = Registry::default();
        registry.definition("Broken", Broken);
        let err = registry.spec().unwrap_err();
        assert_eq!(err.to_string(), "cannot expand Broken");
    }
}
