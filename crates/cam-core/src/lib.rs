//! `cam-core`: foundational types for the CAM road-segment pipeline.
//!
//! This crate is a dependency of every other `cam-*` crate.  It intentionally
//! has no `cam-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `StationId`, `RoadHandle`, `RoadId`                        |
//! | [`geo`]         | `GeoPoint`, `BoundingBox`, planar + haversine distance     |
//! | [`telemetry`]   | `StationType`, `TelemetryPoint`, `MatchedPoint`            |
//! | [`segment`]     | `AggregatedSegment`                                        |
//! | [`config`]      | `PipelineConfig`, `MissingSpeedPolicy`                     |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and id types.      |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod segment;
pub mod telemetry;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MissingSpeedPolicy, PipelineConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{RoadHandle, RoadId, StationId};
pub use segment::AggregatedSegment;
pub use telemetry::{MatchedPoint, StationType, TelemetryPoint};
