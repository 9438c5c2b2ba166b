//! `cam-aggregate`: turns matched points into per-(station, road) segments.
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`aggregate`] | `aggregate`, `GroupKey`, `mean_speed`             |
//! | [`error`]     | `AggregateError`, `AggregateResult<T>`            |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | Use `rustc-hash`'s FxHashMap for the grouping map.      |

pub mod aggregate;
pub mod error;

#[cfg(test)]
mod tests;

pub use aggregate::{GroupKey, aggregate, mean_speed};
pub use error::{AggregateError, AggregateResult};
