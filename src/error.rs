//! Error types for mapviz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mapviz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Shapefile read or format error, propagated from the shapefile reader.
    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Regions must be loaded before they can be drawn.
    #[error("regions must be loaded before they can be drawn")]
    RegionsNotLoaded,

    /// Regions must be drawn before they can be styled or colored.
    #[error("regions must be drawn before they can be styled or colored")]
    RegionsNotDrawn,

    /// A colorbar needs a color mapping from a prior `color_from_values` call.
    #[error("a colorbar requires color_from_values to have been called first")]
    NoColorMapping,

    /// A styling or coloring call referenced a region key that was never drawn.
    #[error("unknown region key: {0}")]
    UnknownRegion(String),

    /// A line spec referenced a point name missing from the named-point set.
    #[error("unknown point name: {0}")]
    UnknownPoint(String),

    /// Value mapping was empty where at least one value is required.
    #[error("empty value mapping")]
    EmptyValues,

    /// Normalization limits are not finite or not ordered.
    #[error("invalid color limits: {min}..{max}")]
    InvalidLimits {
        /// Lower limit.
        min: f64,
        /// Upper limit.
        max: f64,
    },

    /// Map extent is degenerate or not finite.
    #[error("invalid map extent: x {x_min}..{x_max}, y {y_min}..{y_max}")]
    InvalidExtent {
        /// Minimum x coordinate.
        x_min: f64,
        /// Maximum x coordinate.
        x_max: f64,
        /// Minimum y coordinate.
        y_min: f64,
        /// Maximum y coordinate.
        y_max: f64,
    },

    /// Rendering backend failure.
    #[error("rendering error: {0}")]
    Rendering(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_error_messages_name_prerequisite() {
        assert!(Error::RegionsNotLoaded.to_string().contains("loaded"));
        assert!(Error::RegionsNotDrawn.to_string().contains("drawn"));
        assert!(Error::NoColorMapping
            .to_string()
            .contains("color_from_values"));
    }

    #[test]
    fn test_invalid_limits_display() {
        let err = Error::InvalidLimits { min: 3.0, max: 1.0 };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn test_unknown_region_display() {
        let err = Error::UnknownRegion("DE".to_string());
        assert!(err.to_string().contains("DE"));
    }
}
