//! mocap-index: ingestion and temporal indexing of motion-capture study logs.
//!
//! Multi-file tabular logs are parsed concurrently into per-entity,
//! per-(session, condition) sample sequences normalized into one canonical
//! frame, then indexed for the per-frame "sample at time T" lookups a
//! playback front end performs.

pub mod api;
pub mod core;
pub mod error;
pub mod ingest;
pub mod telemetry;

pub use api::{ImportConfig, Study, StudyDescriptor, StudyEngine};
pub use error::{StudyError, StudyResult};
