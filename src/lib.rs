// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod pipeline;
pub mod profile;
pub mod quality;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::config::Settings;
pub use crate::error::{FormatError, ProfilerError};
pub use crate::features::{CustomerFeatures, FeatureGroup};
pub use crate::pipeline::{build_profile, run, ProfileRun};
pub use crate::profile::{snapshot::ProfileSnapshot, ProfileTable};
