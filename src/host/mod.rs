//! # Host Module
//!
//! The boundary with the application that actually serves requests.
//!
//! A registry only ever calls [`HostApp::add_route`], once per composed path
//! per binding. Whatever the host returns as an error reaches the caller of
//! the registry operation unchanged.
//!
//! Three hosts ship with the crate:
//!
//! - [`RouteTable`] - in-memory table resolving request paths to handlers
//! - [`Mount`] - nests every pattern under a prefix before delegating
//! - [`RecordingHost`] - records calls in order, for tests and tooling

mod mount;
mod recording;
mod route_table;

pub use mount::Mount;
pub use recording::RecordingHost;
pub use route_table::{ParamVec, RouteMatch, RouteTable, RouteTableError, MAX_INLINE_PARAMS};

use crate::resource::{ResourceHandle, RouteOptions};

/// Application a registry registers routes into.
pub trait HostApp: Send + Sync {
    fn add_route(
        &self,
        pattern: &str,
        handler: &ResourceHandle,
        options: &RouteOptions,
    ) -> anyhow::Result<()>;
}
