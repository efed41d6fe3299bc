//! Data layer: survey tables, loading, normalization, reshaping, export.
//!
//! ```text
//!   .xlsx / .json               .geojson
//!        │                          │
//!        ▼                          ▼
//!   ┌──────────┐              ┌──────────┐
//!   │  loader  │              │   geo    │
//!   └──────────┘              └──────────┘
//!        │                          │
//!        ▼                          ▼
//!   ┌──────────────┐         ┌───────────────┐
//!   │ DatasetStore │         │ GeoBoundaries │
//!   └──────────────┘         └───────────────┘
//!        │                          │
//!        ├── reshape (melt) ──► long tables for charts
//!        ├── normalize ───────► join keys shared with GeoBoundaries
//!        └── export ──────────► CSV payloads
//! ```

pub mod export;
pub mod geo;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod reshape;
pub mod store;

use thiserror::Error;

/// Failure taxonomy of the data layer.
///
/// Geo-join mismatches are deliberately absent: a region with no matching
/// map geometry is a soft condition surfaced as a count on the resolved
/// view, never an error value.
#[derive(Debug, Error)]
pub enum DataError {
    /// Source workbook missing or malformed. Fatal: the dashboard shows an
    /// error state and renders no views.
    #[error("failed to load survey data: {reason}")]
    Load { reason: String },

    /// A caller asked for a sheet outside the survey contract. Programming
    /// error, not a user-facing condition.
    #[error("unknown table `{name}`")]
    UnknownTable { name: String },
}

impl DataError {
    /// Fold a loader error chain into the fatal load variant.
    pub(crate) fn load(err: anyhow::Error) -> Self {
        DataError::Load {
            reason: format!("{err:#}"),
        }
    }
}
