//! # Mapviz
//!
//! Choropleth-style map plotting over shapefile regions.
//!
//! Mapviz loads region geometry from ESRI shapefiles (via the
//! [shapefile](https://crates.io/crates/shapefile) crate), groups it by a
//! caller-supplied key, and draws it on a retained-mode [`axes::Axes`]
//! rendered with [plotters](https://crates.io/crates/plotters). Drawn
//! regions keep live handles, so they can be restyled or recolored in place
//! after drawing, and value-based coloring retains its scale for a matching
//! colorbar.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use mapviz::prelude::*;
//!
//! let mut axes = Axes::new(MapExtent::new(5.5, 15.5, 47.0, 55.5)?);
//! let mut map = MapPlot::new(&mut axes);
//!
//! map.load_regions("states.shp", |rec| {
//!     mapviz::shapes::string_field(rec, "NAME").unwrap_or_default()
//! })?;
//! map.draw_regions(RegionStyleOverride::new())?;
//!
//! let population = BTreeMap::from([
//!     ("Bayern".to_string(), 13.1),
//!     ("Berlin".to_string(), 3.7),
//! ]);
//! map.color_from_values(&population, None, None)?;
//! map.add_colorbar(Some("population (millions)"))?;
//!
//! axes.render_to_file("states.png", (800, 600))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize/Deserialize on color, geometry and style types

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// RGBA color type and gray-level helpers.
pub mod color;

/// Geometric primitives (points, vertex runs, map extents).
pub mod geometry;

/// Styling for regions, lines, markers and text, with override merging.
pub mod style;

/// Colormaps and value-to-color scales.
pub mod colormap;

// ============================================================================
// Drawing Modules
// ============================================================================

/// Retained-mode drawing surface rendered through plotters.
pub mod axes;

/// Shapefile loading and record-keyed grouping.
pub mod shapes;

/// The high-level map plot wrapper.
pub mod mapplot;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for mapviz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use mapviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axes::{Axes, CollectionId, LineCollection};
    pub use crate::color::Rgba;
    pub use crate::colormap::{Colormap, ScalarMappable};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{MapExtent, Point, Segment};
    pub use crate::mapplot::{LineSpec, MapPlot, RegionKey};
    pub use crate::style::{
        HAlign, LineStyle, LineStyleOverride, MarkerShape, MarkerStyle, MarkerStyleOverride,
        RegionStyle, RegionStyleOverride, TextStyle, TextStyleOverride, VAlign,
    };
}

// ============================================================================
// Tests
// ============================================================================
