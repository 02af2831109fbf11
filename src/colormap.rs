//! Colormaps and the scalar-mappable that drives value coloring and the
//! colorbar legend.
//!
//! A [`Colormap`] is a table of RGBA stops interpolated linearly over the
//! normalized `[0, 1]` range. A [`ScalarMappable`] binds a colormap to
//! normalization limits so raw values can be converted to colors, and is
//! retained after `color_from_values` so a later colorbar reuses the same
//! scale.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// A colormap: evenly spaced RGBA stops, linearly interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<Rgba>,
}

impl Colormap {
    /// Create a colormap from explicit stops.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] if no stops are given.
    pub fn from_stops(stops: Vec<Rgba>) -> Result<Self> {
        if stops.is_empty() {
            return Err(Error::EmptyValues);
        }
        Ok(Self { stops })
    }

    /// Sequential blue scale (ColorBrewer Blues). The crate default.
    #[must_use]
    pub fn blues() -> Self {
        Self {
            stops: vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
        }
    }

    /// Diverging red-blue scale.
    #[must_use]
    pub fn red_blue() -> Self {
        Self {
            stops: vec![
                Rgba::rgb(178, 24, 43),
                Rgba::rgb(239, 138, 98),
                Rgba::rgb(247, 247, 247),
                Rgba::rgb(103, 169, 207),
                Rgba::rgb(33, 102, 172),
            ],
        }
    }

    /// Perceptually uniform viridis scale.
    #[must_use]
    pub fn viridis() -> Self {
        Self {
            stops: vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
        }
    }

    /// Black-to-white greyscale.
    #[must_use]
    pub fn greyscale() -> Self {
        Self {
            stops: vec![Rgba::BLACK, Rgba::WHITE],
        }
    }

    /// Heat scale (black, red, yellow, white).
    #[must_use]
    pub fn heat() -> Self {
        Self {
            stops: vec![
                Rgba::rgb(0, 0, 0),
                Rgba::rgb(128, 0, 0),
                Rgba::rgb(255, 0, 0),
                Rgba::rgb(255, 128, 0),
                Rgba::rgb(255, 255, 0),
                Rgba::rgb(255, 255, 255),
            ],
        }
    }

    /// Sample the colormap at a normalized position, clamped to `[0, 1]`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);

        if self.stops.len() == 1 {
            return self.stops[0];
        }

        let segments = self.stops.len() - 1;
        let scaled = t * segments as f64;
        let idx = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - idx as f64;

        self.stops[idx].lerp(self.stops[idx + 1], local)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::blues()
    }
}

/// A colormap bound to normalization limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMappable {
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
}

impl ScalarMappable {
    /// Bind a colormap to explicit limits.
    ///
    /// Equal limits are allowed; every value then maps to the colormap
    /// midpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLimits`] if the limits are non-finite or
    /// reversed.
    pub fn new(cmap: Colormap, vmin: f64, vmax: f64) -> Result<Self> {
        if !vmin.is_finite() || !vmax.is_finite() || vmin > vmax {
            return Err(Error::InvalidLimits { min: vmin, max: vmax });
        }
        Ok(Self { cmap, vmin, vmax })
    }

    /// Bind a colormap to the min/max of a value sequence (autoscale).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] for an empty sequence and
    /// [`Error::InvalidLimits`] if the resulting extent is non-finite.
    pub fn from_values<I>(cmap: Colormap, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for v in values {
            seen = true;
            min = min.min(v);
            max = max.max(v);
        }
        if !seen {
            return Err(Error::EmptyValues);
        }

        Self::new(cmap, min, max)
    }

    /// Normalization limits.
    #[must_use]
    pub fn limits(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }

    /// Normalized position of a value within the limits, clamped to `[0, 1]`.
    /// Degenerate limits map everything to 0.5.
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        if self.vmax > self.vmin {
            ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    /// Convert a value to its color under this scale.
    #[must_use]
    pub fn to_rgba(&self, value: f64) -> Rgba {
        self.cmap.sample(self.fraction(value))
    }

    /// Sample the underlying colormap at a normalized position (used by the
    /// colorbar renderer).
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgba {
        self.cmap.sample(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        let cmap = Colormap::greyscale();
        assert_eq!(cmap.sample(0.0), Rgba::BLACK);
        assert_eq!(cmap.sample(1.0), Rgba::WHITE);
        let mid = cmap.sample(0.5);
        assert!(mid.r > 120 && mid.r < 135);
    }

    #[test]
    fn test_sample_clamps() {
        let cmap = Colormap::blues();
        assert_eq!(cmap.sample(-2.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(3.0), cmap.sample(1.0));
    }

    #[test]
    fn test_single_stop() {
        let cmap = Colormap::from_stops(vec![Rgba::rgb(9, 9, 9)]).unwrap();
        assert_eq!(cmap.sample(0.0), Rgba::rgb(9, 9, 9));
        assert_eq!(cmap.sample(0.7), Rgba::rgb(9, 9, 9));
    }

    #[test]
    fn test_from_stops_empty() {
        assert!(Colormap::from_stops(vec![]).is_err());
    }

    #[test]
    fn test_autoscale_midpoint() {
        let sm =
            ScalarMappable::from_values(Colormap::greyscale(), [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sm.limits(), (1.0, 3.0));
        assert_relative_eq!(sm.fraction(2.0), 0.5);
        assert_relative_eq!(sm.fraction(1.0), 0.0);
        assert_relative_eq!(sm.fraction(3.0), 1.0);
        assert_eq!(sm.to_rgba(1.0), Rgba::BLACK);
        assert_eq!(sm.to_rgba(3.0), Rgba::WHITE);
    }

    #[test]
    fn test_explicit_limits_clamp() {
        let sm = ScalarMappable::new(Colormap::greyscale(), 0.0, 10.0).unwrap();
        assert_eq!(sm.to_rgba(-5.0), Rgba::BLACK);
        assert_eq!(sm.to_rgba(50.0), Rgba::WHITE);
    }

    #[test]
    fn test_degenerate_limits_map_to_midpoint() {
        let sm = ScalarMappable::new(Colormap::greyscale(), 4.0, 4.0).unwrap();
        assert_relative_eq!(sm.fraction(4.0), 0.5);
        assert_relative_eq!(sm.fraction(100.0), 0.5);
    }

    #[test]
    fn test_invalid_limits() {
        assert!(ScalarMappable::new(Colormap::blues(), 2.0, 1.0).is_err());
        assert!(ScalarMappable::new(Colormap::blues(), f64::NAN, 1.0).is_err());
        assert!(
            ScalarMappable::from_values(Colormap::blues(), std::iter::empty()).is_err()
        );
    }

    proptest! {
        #[test]
        fn fraction_is_always_normalized(vmin in -1e6f64..1e6, span in 0.0f64..1e6, v in -1e7f64..1e7) {
            let sm = ScalarMappable::new(Colormap::blues(), vmin, vmin + span).unwrap();
            let f = sm.fraction(v);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
