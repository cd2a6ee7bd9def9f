//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_control_plane_client;
mod in_memory_control_plane;
mod system_clock;

pub use http_control_plane_client::{HttpControlPlaneClient, HttpControlPlaneConfig};
pub use in_memory_control_plane::{InMemoryControlPlane, StoredProject};
pub use system_clock::SystemClock;
