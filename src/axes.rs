//! The drawing surface: a retained display list over a map extent.
//!
//! An [`Axes`] collects artists (region line collections, paths, marker
//! sets, text labels, a colorbar) in draw order. Line collections hand back
//! a [`CollectionId`] so they can be restyled in place after being added.
//! Nothing is rasterized until one of the `render_*` methods walks the list
//! and delegates every primitive to the plotters backend.

use std::path::Path;
use std::rc::Rc;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::Rgba;
use crate::colormap::ScalarMappable;
use crate::error::{Error, Result};
use crate::geometry::{MapExtent, Point, Segment};
use crate::style::{HAlign, LineStyle, MarkerShape, MarkerStyle, RegionStyle, TextStyle, VAlign};

/// Pixel width of the band reserved on the right edge for a colorbar.
const COLORBAR_BAND_WIDTH: u32 = 70;

/// Opaque handle to a line collection on an [`Axes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(usize);

/// A renderable batch of region outlines drawn and styled as a unit.
#[derive(Debug, Clone)]
pub struct LineCollection {
    segments: Vec<Segment>,
    /// Current style; mutated in place by styling calls.
    pub style: RegionStyle,
}

impl LineCollection {
    /// Number of vertex runs in this collection.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[derive(Debug, Clone)]
enum Artist {
    Collection(LineCollection),
    Path {
        points: Vec<Point>,
        style: LineStyle,
    },
    Markers {
        points: Vec<Point>,
        style: MarkerStyle,
    },
    Label {
        at: Point,
        text: String,
        style: TextStyle,
    },
    Colorbar {
        scale: Rc<ScalarMappable>,
        label: Option<String>,
    },
}

/// Retained drawing surface for one map view.
#[derive(Debug, Clone)]
pub struct Axes {
    extent: MapExtent,
    background: Option<Rgba>,
    artists: Vec<Artist>,
}

impl Axes {
    /// Create an empty surface for the given extent.
    #[must_use]
    pub fn new(extent: MapExtent) -> Self {
        Self {
            extent,
            background: None,
            artists: Vec::new(),
        }
    }

    /// The map extent this surface displays.
    #[must_use]
    pub fn extent(&self) -> MapExtent {
        self.extent
    }

    /// Background fill behind all artists, if any.
    #[must_use]
    pub fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// Set or clear the background fill.
    pub fn set_background(&mut self, color: Option<Rgba>) {
        self.background = color;
    }

    /// Add a line collection and return its handle.
    pub fn add_collection(&mut self, segments: Vec<Segment>, style: RegionStyle) -> CollectionId {
        let id = CollectionId(self.artists.len());
        self.artists
            .push(Artist::Collection(LineCollection { segments, style }));
        id
    }

    /// Look up a line collection by handle.
    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&LineCollection> {
        match self.artists.get(id.0) {
            Some(Artist::Collection(lc)) => Some(lc),
            _ => None,
        }
    }

    /// Look up a line collection by handle, mutably.
    pub fn collection_mut(&mut self, id: CollectionId) -> Option<&mut LineCollection> {
        match self.artists.get_mut(id.0) {
            Some(Artist::Collection(lc)) => Some(lc),
            _ => None,
        }
    }

    /// Add a polyline path.
    pub fn add_path(&mut self, points: Vec<Point>, style: LineStyle) {
        self.artists.push(Artist::Path { points, style });
    }

    /// Add a set of point markers.
    pub fn add_markers(&mut self, points: Vec<Point>, style: MarkerStyle) {
        self.artists.push(Artist::Markers { points, style });
    }

    /// Add a text label anchored at a coordinate.
    pub fn add_label(&mut self, at: Point, text: impl Into<String>, style: TextStyle) {
        self.artists.push(Artist::Label {
            at,
            text: text.into(),
            style,
        });
    }

    /// Add a colorbar bound to a scalar-mappable.
    pub fn add_colorbar(&mut self, scale: Rc<ScalarMappable>, label: Option<String>) {
        self.artists.push(Artist::Colorbar { scale, label });
    }

    /// Total number of artists on the surface.
    #[must_use]
    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    /// Number of text label artists.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Label { .. }))
            .count()
    }

    /// Number of polyline path artists.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Path { .. }))
            .count()
    }

    /// Total number of marker points across all marker artists.
    #[must_use]
    pub fn marker_point_count(&self) -> usize {
        self.artists
            .iter()
            .map(|a| match a {
                Artist::Markers { points, .. } => points.len(),
                _ => 0,
            })
            .sum()
    }

    /// Whether a colorbar artist is present.
    #[must_use]
    pub fn has_colorbar(&self) -> bool {
        self.artists
            .iter()
            .any(|a| matches!(a, Artist::Colorbar { .. }))
    }

    /// Render all artists onto a plotters drawing area.
    ///
    /// When a colorbar is present, a band on the right edge is split off for
    /// it and the map occupies the remainder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] when the backend rejects a primitive.
    pub fn render_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        if let Some(bg) = self.background {
            root.fill(&backend_color(bg)).map_err(render_err)?;
        }

        let (w, _) = root.dim_in_pixel();
        let wants_bar = self.has_colorbar();
        let (map_root, bar_root) = if wants_bar && w > COLORBAR_BAND_WIDTH {
            let (left, right) = root.split_horizontally(w - COLORBAR_BAND_WIDTH);
            (left, Some(right))
        } else {
            (root.clone(), None)
        };

        let (mw, mh) = map_root.dim_in_pixel();
        // y range is reversed so larger y draws toward the top of the image
        let area = map_root.apply_coord_spec(Cartesian2d::<RangedCoordf64, RangedCoordf64>::new(
            self.extent.x_min..self.extent.x_max,
            self.extent.y_max..self.extent.y_min,
            (0..mw as i32, 0..mh as i32),
        ));

        for artist in &self.artists {
            match artist {
                Artist::Collection(lc) => draw_collection(&area, lc)?,
                Artist::Path { points, style } => draw_path(&area, points, style)?,
                Artist::Markers { points, style } => draw_markers(&area, points, style)?,
                Artist::Label { at, text, style } => draw_label(&area, *at, text, style)?,
                Artist::Colorbar { scale, label } => {
                    if let Some(band) = &bar_root {
                        draw_colorbar(band, scale, label.as_deref())?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Render to a PNG file of the given pixel size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] on backend failure.
    pub fn render_to_file<P: AsRef<Path>>(&self, path: P, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        self.render_on(&root)?;
        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Render to an in-memory RGB buffer (3 bytes per pixel, row-major).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] on backend failure.
    pub fn render_to_rgb_buffer(&self, size: (u32, u32)) -> Result<Vec<u8>> {
        let (w, h) = size;
        let mut buf = vec![0u8; (w as usize) * (h as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            self.render_on(&root)?;
            root.present().map_err(render_err)?;
        }
        Ok(buf)
    }
}

type MapArea<DB> = DrawingArea<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::Rendering(e.to_string())
}

fn backend_color(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, f64::from(c.a) / 255.0)
}

fn stroke_px(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn draw_collection<DB: DrawingBackend>(area: &MapArea<DB>, lc: &LineCollection) -> Result<()> {
    let face = backend_color(lc.style.face_color);
    let edge = backend_color(lc.style.edge_color).stroke_width(stroke_px(lc.style.line_width));

    for seg in &lc.segments {
        let pts: Vec<(f64, f64)> = seg.iter().map(|p| (p.x, p.y)).collect();
        if pts.len() >= 3 && lc.style.face_color.a > 0 {
            area.draw(&Polygon::new(pts.clone(), face.filled()))
                .map_err(render_err)?;
        }

        let mut outline = pts;
        if outline.len() >= 3 && outline.first() != outline.last() {
            if let Some(&first) = outline.first() {
                outline.push(first);
            }
        }
        area.draw(&PathElement::new(outline, edge))
            .map_err(render_err)?;
    }

    Ok(())
}

fn draw_path<DB: DrawingBackend>(
    area: &MapArea<DB>,
    points: &[Point],
    style: &LineStyle,
) -> Result<()> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let stroke = backend_color(style.color).stroke_width(stroke_px(style.width));
    area.draw(&PathElement::new(pts, stroke)).map_err(render_err)
}

fn draw_markers<DB: DrawingBackend>(
    area: &MapArea<DB>,
    points: &[Point],
    style: &MarkerStyle,
) -> Result<()> {
    let face = backend_color(style.face_color).filled();
    let edge = backend_color(style.edge_color).stroke_width(1);
    let r = (style.size / 2.0).round().max(1.0) as i32;

    for p in points {
        let at = (p.x, p.y);
        match style.shape {
            MarkerShape::Circle => {
                area.draw(
                    &(EmptyElement::at(at)
                        + Circle::new((0, 0), r, face)
                        + Circle::new((0, 0), r, edge)),
                )
                .map_err(render_err)?;
            }
            MarkerShape::Square => {
                area.draw(
                    &(EmptyElement::at(at)
                        + Rectangle::new([(-r, -r), (r, r)], face)
                        + Rectangle::new([(-r, -r), (r, r)], edge)),
                )
                .map_err(render_err)?;
            }
            MarkerShape::Cross => {
                area.draw(
                    &(EmptyElement::at(at)
                        + PathElement::new(vec![(-r, 0), (r, 0)], edge)
                        + PathElement::new(vec![(0, -r), (0, r)], edge)),
                )
                .map_err(render_err)?;
            }
        }
    }

    Ok(())
}

fn draw_label<DB: DrawingBackend>(
    area: &MapArea<DB>,
    at: Point,
    text: &str,
    style: &TextStyle,
) -> Result<()> {
    let anchor = Pos::new(
        match style.h_align {
            HAlign::Left => HPos::Left,
            HAlign::Center => HPos::Center,
            HAlign::Right => HPos::Right,
        },
        match style.v_align {
            VAlign::Top => VPos::Top,
            VAlign::Center => VPos::Center,
            VAlign::Bottom => VPos::Bottom,
        },
    );
    let color = backend_color(style.color);
    let font = ("sans-serif", style.size).into_font().color(&color).pos(anchor);

    area.draw(&Text::new(text.to_string(), (at.x, at.y), font))
        .map_err(render_err)
}

fn draw_colorbar<DB: DrawingBackend>(
    band: &DrawingArea<DB, Shift>,
    scale: &ScalarMappable,
    label: Option<&str>,
) -> Result<()> {
    let (_, h) = band.dim_in_pixel();
    let margin = 16i32;
    let x0 = 8i32;
    let bar_w = 16i32;
    let bar_h = h as i32 - 2 * margin;
    if bar_h <= 1 {
        return Ok(());
    }

    // top of the bar is the maximum of the scale
    for i in 0..bar_h {
        let t = 1.0 - f64::from(i) / f64::from(bar_h - 1);
        let c = backend_color(scale.sample(t));
        band.draw(&Rectangle::new(
            [(x0, margin + i), (x0 + bar_w, margin + i + 1)],
            c.filled(),
        ))
        .map_err(render_err)?;
    }
    band.draw(&Rectangle::new(
        [(x0, margin), (x0 + bar_w, margin + bar_h)],
        BLACK.stroke_width(1),
    ))
    .map_err(render_err)?;

    let (vmin, vmax) = scale.limits();
    let ticks = ("sans-serif", 11.0).into_font().color(&BLACK);
    band.draw(&Text::new(
        format_tick(vmax),
        (x0 + bar_w + 4, margin - 5),
        ticks.clone(),
    ))
    .map_err(render_err)?;
    band.draw(&Text::new(
        format_tick(vmin),
        (x0 + bar_w + 4, margin + bar_h - 6),
        ticks.clone(),
    ))
    .map_err(render_err)?;

    if let Some(text) = label {
        band.draw(&Text::new(text.to_string(), (x0, 2), ticks))
            .map_err(render_err)?;
    }

    Ok(())
}

fn format_tick(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e7 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Colormap;

    fn extent() -> MapExtent {
        MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn pixel(buf: &[u8], w: u32, x: u32, y: u32) -> (u8, u8, u8) {
        let i = ((y * w + x) * 3) as usize;
        (buf[i], buf[i + 1], buf[i + 2])
    }

    #[test]
    fn test_handles_are_distinct_and_resolvable() {
        let mut axes = Axes::new(extent());
        let a = axes.add_collection(vec![square(0.0, 0.0, 1.0, 1.0)], RegionStyle::default());
        let b = axes.add_collection(vec![square(2.0, 2.0, 3.0, 3.0)], RegionStyle::default());
        assert_ne!(a, b);
        assert_eq!(axes.artist_count(), 2);
        assert_eq!(axes.collection(a).unwrap().segment_count(), 1);
    }

    #[test]
    fn test_collection_restyled_in_place() {
        let mut axes = Axes::new(extent());
        let id = axes.add_collection(vec![square(0.0, 0.0, 1.0, 1.0)], RegionStyle::default());

        let restyled = RegionStyle {
            face_color: Rgba::rgb(10, 20, 30),
            ..RegionStyle::default()
        };
        axes.collection_mut(id).unwrap().style = restyled;
        assert_eq!(axes.collection(id).unwrap().style, restyled);
        // still a single artist; no new collection was appended
        assert_eq!(axes.artist_count(), 1);
    }

    #[test]
    fn test_background_fill_renders() {
        let mut axes = Axes::new(extent());
        axes.set_background(Some(Rgba::rgb(200, 210, 220)));

        let buf = axes.render_to_rgb_buffer((20, 20)).unwrap();
        assert_eq!(pixel(&buf, 20, 10, 10), (200, 210, 220));
    }

    #[test]
    fn test_polygon_fill_renders_face_color() {
        let mut axes = Axes::new(extent());
        let style = RegionStyle {
            face_color: Rgba::rgb(255, 0, 0),
            ..RegionStyle::default()
        };
        axes.add_collection(vec![square(1.0, 1.0, 9.0, 9.0)], style);

        let buf = axes.render_to_rgb_buffer((40, 40)).unwrap();
        assert_eq!(pixel(&buf, 40, 20, 20), (255, 0, 0));
        // corner outside the polygon stays on the white page
        assert_eq!(pixel(&buf, 40, 1, 1), (255, 255, 255));
    }

    #[test]
    fn test_path_and_markers_render() {
        let mut axes = Axes::new(extent());
        axes.add_path(
            vec![Point::new(1.0, 5.0), Point::new(9.0, 5.0)],
            LineStyle {
                color: Rgba::rgb(0, 0, 255),
                width: 2.0,
            },
        );
        axes.add_markers(
            vec![Point::new(5.0, 5.0)],
            MarkerStyle {
                face_color: Rgba::rgb(0, 255, 0),
                size: 6.0,
                ..MarkerStyle::default()
            },
        );

        let buf = axes.render_to_rgb_buffer((40, 40)).unwrap();
        // marker face covers the line midpoint
        assert_eq!(pixel(&buf, 40, 20, 20), (0, 255, 0));
        // path pixel away from the marker
        assert_eq!(pixel(&buf, 40, 10, 20), (0, 0, 255));
    }

    #[test]
    fn test_colorbar_band_reserved() {
        let mut axes = Axes::new(extent());
        let scale =
            ScalarMappable::from_values(Colormap::greyscale(), [0.0, 1.0]).unwrap();
        axes.add_colorbar(Rc::new(scale), None);
        assert!(axes.has_colorbar());

        // a fill-only render through the split path must still succeed
        let mut fill_only = axes.clone();
        fill_only.set_background(Some(Rgba::WHITE));
        assert_eq!(fill_only.artist_count(), 1);
    }
}
