//! Core library modules for hexroute
//!
//! Layer derivation and route orchestration; nothing in here draws pixels.

pub mod camera;
pub mod centroid;
pub mod color;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod routing;
pub mod source;

// Re-export main types for internal use
pub use dashboard::Dashboard;
pub use routing::RoutingClient;
pub use source::DashboardConfig;
