//! Style structs per drawing category, with documented defaults and
//! field-by-field override merging.
//!
//! Each category has a concrete style (what is actually applied) and an
//! override struct of optional fields. Merging takes the defaults and
//! replaces exactly the fields the caller set; unset fields keep their
//! default. Overrides are built with chained setters:
//!
//! ```
//! use mapviz::style::{RegionStyle, RegionStyleOverride};
//! use mapviz::color::Rgba;
//!
//! let style = RegionStyle::default().merge(
//!     &RegionStyleOverride::new().face_color(Rgba::rgb(200, 30, 30)),
//! );
//! assert_eq!(style.face_color, Rgba::rgb(200, 30, 30));
//! assert_eq!(style.edge_color, RegionStyle::default().edge_color);
//! ```

use crate::color::Rgba;

/// Marker glyph shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerShape {
    /// Filled circle with an edge ring.
    #[default]
    Circle,
    /// Filled square with an edge outline.
    Square,
    /// Upright cross, edge color only.
    Cross,
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HAlign {
    /// Anchor at the left edge of the text.
    Left,
    /// Anchor at the center of the text.
    #[default]
    Center,
    /// Anchor at the right edge of the text.
    Right,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VAlign {
    /// Anchor at the top of the text.
    Top,
    /// Anchor at the vertical center of the text.
    #[default]
    Center,
    /// Anchor at the bottom of the text.
    Bottom,
}

/// Style of a drawn region line collection.
///
/// Defaults: black edges, line width 0.2, white fill.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionStyle {
    /// Outline color.
    pub edge_color: Rgba,
    /// Outline width in pixels (fractional widths round up to one pixel).
    pub line_width: f64,
    /// Fill color.
    pub face_color: Rgba,
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self {
            edge_color: Rgba::BLACK,
            line_width: 0.2,
            face_color: Rgba::WHITE,
        }
    }
}

impl RegionStyle {
    /// Defaults overridden by the set fields of `ovr`.
    #[must_use]
    pub fn merge(&self, ovr: &RegionStyleOverride) -> Self {
        Self {
            edge_color: ovr.edge_color.unwrap_or(self.edge_color),
            line_width: ovr.line_width.unwrap_or(self.line_width),
            face_color: ovr.face_color.unwrap_or(self.face_color),
        }
    }
}

/// Partial [`RegionStyle`]; unset fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionStyleOverride {
    /// Outline color, if overridden.
    pub edge_color: Option<Rgba>,
    /// Outline width, if overridden.
    pub line_width: Option<f64>,
    /// Fill color, if overridden.
    pub face_color: Option<Rgba>,
}

impl RegionStyleOverride {
    /// Empty override (all fields default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outline color.
    #[must_use]
    pub fn edge_color(mut self, color: Rgba) -> Self {
        self.edge_color = Some(color);
        self
    }

    /// Set the outline width.
    #[must_use]
    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn face_color(mut self, color: Rgba) -> Self {
        self.face_color = Some(color);
        self
    }
}

/// Style of a drawn connecting line.
///
/// Defaults: width 2, dark gray (gray level 0.2).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStyle {
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke color.
    pub color: Rgba,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: Rgba::gray(0.2),
        }
    }
}

impl LineStyle {
    /// Defaults overridden by the set fields of `ovr`.
    #[must_use]
    pub fn merge(&self, ovr: &LineStyleOverride) -> Self {
        Self {
            width: ovr.width.unwrap_or(self.width),
            color: ovr.color.unwrap_or(self.color),
        }
    }
}

/// Partial [`LineStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStyleOverride {
    /// Stroke width, if overridden.
    pub width: Option<f64>,
    /// Stroke color, if overridden.
    pub color: Option<Rgba>,
}

impl LineStyleOverride {
    /// Empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stroke width.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the stroke color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

/// Style of point markers.
///
/// Defaults: circle, size 4, black edge, light gray fill (gray level 0.8).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerStyle {
    /// Glyph shape.
    pub shape: MarkerShape,
    /// Glyph size in pixels.
    pub size: f64,
    /// Edge color.
    pub edge_color: Rgba,
    /// Fill color.
    pub face_color: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: 4.0,
            edge_color: Rgba::BLACK,
            face_color: Rgba::gray(0.8),
        }
    }
}

impl MarkerStyle {
    /// Defaults overridden by the set fields of `ovr`.
    #[must_use]
    pub fn merge(&self, ovr: &MarkerStyleOverride) -> Self {
        Self {
            shape: ovr.shape.unwrap_or(self.shape),
            size: ovr.size.unwrap_or(self.size),
            edge_color: ovr.edge_color.unwrap_or(self.edge_color),
            face_color: ovr.face_color.unwrap_or(self.face_color),
        }
    }
}

/// Partial [`MarkerStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerStyleOverride {
    /// Glyph shape, if overridden.
    pub shape: Option<MarkerShape>,
    /// Glyph size, if overridden.
    pub size: Option<f64>,
    /// Edge color, if overridden.
    pub edge_color: Option<Rgba>,
    /// Fill color, if overridden.
    pub face_color: Option<Rgba>,
}

impl MarkerStyleOverride {
    /// Empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the glyph shape.
    #[must_use]
    pub fn shape(mut self, shape: MarkerShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the glyph size.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the edge color.
    #[must_use]
    pub fn edge_color(mut self, color: Rgba) -> Self {
        self.edge_color = Some(color);
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn face_color(mut self, color: Rgba) -> Self {
        self.face_color = Some(color);
        self
    }
}

/// Style of placed text labels.
///
/// Defaults: centered both ways, size 12, black.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    /// Horizontal anchor relative to the coordinate.
    pub h_align: HAlign,
    /// Vertical anchor relative to the coordinate.
    pub v_align: VAlign,
    /// Font size in points.
    pub size: f64,
    /// Text color.
    pub color: Rgba,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            size: 12.0,
            color: Rgba::BLACK,
        }
    }
}

impl TextStyle {
    /// Defaults overridden by the set fields of `ovr`.
    #[must_use]
    pub fn merge(&self, ovr: &TextStyleOverride) -> Self {
        Self {
            h_align: ovr.h_align.unwrap_or(self.h_align),
            v_align: ovr.v_align.unwrap_or(self.v_align),
            size: ovr.size.unwrap_or(self.size),
            color: ovr.color.unwrap_or(self.color),
        }
    }
}

/// Partial [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyleOverride {
    /// Horizontal anchor, if overridden.
    pub h_align: Option<HAlign>,
    /// Vertical anchor, if overridden.
    pub v_align: Option<VAlign>,
    /// Font size, if overridden.
    pub size: Option<f64>,
    /// Text color, if overridden.
    pub color: Option<Rgba>,
}

impl TextStyleOverride {
    /// Empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal anchor.
    #[must_use]
    pub fn h_align(mut self, h: HAlign) -> Self {
        self.h_align = Some(h);
        self
    }

    /// Set the vertical anchor.
    #[must_use]
    pub fn v_align(mut self, v: VAlign) -> Self {
        self.v_align = Some(v);
        self
    }

    /// Set the font size.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}
