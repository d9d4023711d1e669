use super::HostApp;
use crate::resource::{ResourceHandle, RouteOptions, UrlSpec};
use parking_lot::Mutex;
use std::collections::HashSet;

/// Host that keeps every `add_route` call, in call order.
///
/// Patterns marked with [`RecordingHost::reject`] fail with an error instead of
/// being recorded, which makes error propagation observable.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<UrlSpec>>,
    rejected: Mutex<HashSet<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make later registrations of `pattern` fail.
    pub fn reject(&self, pattern: impl Into<String>) {
        self.rejected.lock().insert(pattern.into());
    }

    #[must_use]
    pub fn calls(&self) -> Vec<UrlSpec> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.pattern.clone()).collect()
    }

    /// Forget recorded calls. Rejections stay in place.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl HostApp for RecordingHost {
    fn add_route(
        &self,
        pattern: &str,
        handler: &ResourceHandle,
        options: &RouteOptions,
    ) -> anyhow::Result<()> {
        if self.rejected.lock().contains(pattern) {
            anyhow::bail!("route {pattern} rejected by host");
        }
        self.calls.lock().push(UrlSpec {
            pattern: pattern.to_string(),
            handler: handler.clone(),
            options: options.clone(),
        });
        Ok(())
    }
}
