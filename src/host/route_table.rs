//! In-memory route table.
//!
//! Patterns use `{param}` segments (`/users/{id}`) and are compiled into
//! anchored regexes at registration time. Matching is a linear scan in
//! registration order; the first matching pattern wins.

use super::HostApp;
use crate::resource::{ResourceHandle, RouteOptions};
use parking_lot::RwLock;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters extracted from a match, in pattern order.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Route table error
///
/// Returned by [`RouteTable::add_route`] when a pattern cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    /// The exact pattern is already registered
    DuplicatePattern {
        /// The pattern that was registered twice
        pattern: String,
        /// Handler that already owns the pattern
        existing: String,
    },
    /// The pattern does not compile to a valid matcher
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        reason: String,
    },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTableError::DuplicatePattern { pattern, existing } => {
                write!(
                    f,
                    "Route table error: pattern '{}' is already registered to handler '{}'",
                    pattern, existing
                )
            }
            RouteTableError::InvalidPattern { pattern, reason } => {
                write!(
                    f,
                    "Route table error: invalid pattern '{}': {}",
                    pattern, reason
                )
            }
        }
    }
}

impl std::error::Error for RouteTableError {}

/// Result of resolving a request path
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Pattern the path matched
    pub pattern: String,
    pub handler: ResourceHandle,
    /// Options the route was registered with
    pub options: RouteOptions,
    /// Path parameters (e.g. `{id}` -> `("id", "123")`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name; the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

struct TableEntry {
    pattern: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    handler: ResourceHandle,
    options: RouteOptions,
}

/// Host application keeping routes in memory.
#[derive(Default)]
pub struct RouteTable {
    routes: RwLock<Vec<TableEntry>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Registered patterns in registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.routes.read().iter().map(|e| e.pattern.clone()).collect()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        let routes = self.routes.read();
        println!("[routes] count={}", routes.len());
        for entry in routes.iter() {
            println!("[route] {} -> {}", entry.pattern, entry.handler.name());
        }
    }

    /// Resolve a request path to the first route that matches it.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<RouteMatch> {
        let routes = self.routes.read();
        for entry in routes.iter() {
            let Some(captures) = entry.regex.captures(path) else {
                continue;
            };
            let path_params: ParamVec = entry
                .param_names
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (Arc::clone(name), m.as_str().to_string())))
                .collect();

            debug!(
                path = %path,
                pattern = %entry.pattern,
                handler = %entry.handler.name(),
                path_params = ?path_params,
                "Route matched"
            );
            return Some(RouteMatch {
                pattern: entry.pattern.clone(),
                handler: entry.handler.clone(),
                options: entry.options.clone(),
                path_params,
            });
        }

        warn!(path = %path, "No route matched");
        None
    }

    /// Convert a path pattern to a regex and extract parameter names
    ///
    /// `/users/{id}` becomes `^/users/([^/]+)$` with parameters `["id"]`.
    /// Literal segments are escaped.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}') {
                pattern.push_str("/([^/]+)");
                param_names.push(segment[1..segment.len() - 1].to_string());
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}

impl HostApp for RouteTable {
    fn add_route(
        &self,
        pattern: &str,
        handler: &ResourceHandle,
        options: &RouteOptions,
    ) -> anyhow::Result<()> {
        let (regex, param_names) =
            Self::path_to_regex(pattern).map_err(|e| RouteTableError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        let mut routes = self.routes.write();
        if let Some(existing) = routes.iter().find(|e| e.pattern == pattern) {
            return Err(RouteTableError::DuplicatePattern {
                pattern: pattern.to_string(),
                existing: existing.handler.name().to_string(),
            }
            .into());
        }

        routes.push(TableEntry {
            pattern: pattern.to_string(),
            regex,
            param_names: param_names.into_iter().map(Arc::from).collect(),
            handler: handler.clone(),
            options: options.clone(),
        });
        info!(
            pattern = %pattern,
            handler = %handler.name(),
            routes_count = routes.len(),
            "Route added to table"
        );
        Ok(())
    }
}
