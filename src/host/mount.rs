use super::HostApp;
use crate::path;
use crate::resource::{ResourceHandle, RouteOptions};
use std::sync::Arc;

/// Host adapter that mounts everything it receives under `prefix`.
///
/// ```rust
/// use brrtplus::host::{Mount, RecordingHost};
/// use brrtplus::{ApiInfo, Registry, RouteOptions, StaticResource};
/// use std::sync::Arc;
///
/// # fn main() -> anyhow::Result<()> {
/// let app = Arc::new(RecordingHost::new());
/// let registry = Registry::with_app(Arc::new(Mount::new("/api", app.clone())), ApiInfo::default());
/// registry.register_resource(None, StaticResource::new("H"), ["/some_endpoint"], RouteOptions::new())?;
/// assert_eq!(app.patterns(), vec!["/api/some_endpoint"]);
/// # Ok(())
/// # }
/// ```
pub struct Mount {
    prefix: String,
    inner: Arc<dyn HostApp>,
}

impl Mount {
    pub fn new(prefix: &str, inner: Arc<dyn HostApp>) -> Self {
        Self {
            prefix: path::normalize(prefix),
            inner,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl HostApp for Mount {
    fn add_route(
        &self,
        pattern: &str,
        handler: &ResourceHandle,
        options: &RouteOptions,
    ) -> anyhow::Result<()> {
        let mounted = path::compose([self.prefix.as_str(), pattern]);
        self.inner.add_route(&mounted, handler, options)
    }
}
