//! Line numbers for multi-line text inputs, painted onto an off-screen raster
//! and applied to the host as a background image.
//!
//! The crate is platform neutral. Layout probing, style reads and writes,
//! raster painting and timers all go through the traits in [`host`],
//! [`raster`] and [`scheduler`], so the browser binding and the tests plug in
//! their own backends.

pub mod change;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod metrics;
pub mod raster;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod testing;
pub mod watcher;

pub use config::{ConfigOverride, GutterConfig};
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use error::{GutterError, Result};
pub use host::{BoxMetrics, ComputedStyle, Host, Measure, ProbeContent, ProbeStyle, StyleDeclaration};
pub use metrics::Metrics;
pub use raster::{Raster, TextAlign};
pub use registry::{InstanceId, NodeKey};
pub use render::RenderOutcome;
pub use scheduler::{TimerHandle, TimerHost};
