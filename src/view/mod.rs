//! View resolution: turning `(page, gender filter)` into renderable panels.
//!
//! ```text
//!   ViewSelector + GenderFilter
//!            |
//!            v
//!     resolver::resolve ----> ResolvedView { Panel { heading, Table, ChartSpec, filename } }
//!            |                                          |
//!            |  melt / sex filter / geo join            v
//!            +----- data layer                   ui renders it
//! ```
//!
//! Everything here is pure: the resolver reads the store and the boundary
//! file and builds fresh output on every call, so the UI can re-resolve
//! each frame without caches to invalidate.

pub mod chart;
pub mod resolver;

pub use chart::{ChartKind, ChartSpec, ChoroplethSpec, SeriesColor, SeriesSpec};
pub use resolver::{resolve, GenderFilter, Panel, ResolvedView, ViewSelector};
