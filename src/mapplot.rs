//! The map-plot wrapper: load shapefile regions, draw them on an axes, and
//! color them from per-region values.
//!
//! `MapPlot` is a stateful decorator over a caller-owned [`Axes`]. The call
//! order is load → draw → style/color; operations invoked before their
//! prerequisite fail with a descriptive ordering error instead of silently
//! doing nothing.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use mapviz::prelude::*;
//!
//! # fn main() -> mapviz::Result<()> {
//! let mut axes = Axes::new(MapExtent::new(-180.0, 180.0, -90.0, 90.0)?);
//! let mut map = MapPlot::new(&mut axes);
//!
//! map.load_regions("countries.shp", |rec| {
//!     mapviz::shapes::string_field(rec, "ISO_A2").unwrap_or_default()
//! })?;
//! map.draw_regions(RegionStyleOverride::new())?;
//!
//! let values = BTreeMap::from([("DE".to_string(), 83.2), ("FR".to_string(), 67.8)]);
//! map.color_from_values(&values, None, None)?;
//! map.add_colorbar(Some("population (millions)"))?;
//!
//! axes.render_to_file("map.png", (800, 600))?;
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use shapefile::dbase::Record;
use tracing::warn;

use crate::axes::{Axes, CollectionId};
use crate::color::Rgba;
use crate::colormap::{Colormap, ScalarMappable};
use crate::error::{Error, Result};
use crate::geometry::{Point, Segment};
use crate::shapes;
use crate::style::{
    LineStyle, LineStyleOverride, MarkerStyle, MarkerStyleOverride, RegionStyle,
    RegionStyleOverride, TextStyle, TextStyleOverride,
};

/// Bounds required of a region key: cheap to copy around, orderable for
/// deterministic draw order, printable for labels and diagnostics.
pub trait RegionKey: Clone + Ord + fmt::Display {}

impl<T: Clone + Ord + fmt::Display> RegionKey for T {}

/// A line between two named points, with optional style overrides.
#[derive(Debug, Clone, Default)]
pub struct LineSpec {
    /// Name of the start point.
    pub from: String,
    /// Name of the end point.
    pub to: String,
    /// Style overrides for this line.
    pub style: LineStyleOverride,
}

impl LineSpec {
    /// Line between two named points with default styling.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style: LineStyleOverride::default(),
        }
    }

    /// Attach style overrides.
    #[must_use]
    pub fn style(mut self, style: LineStyleOverride) -> Self {
        self.style = style;
        self
    }
}

/// Map plot over a borrowed drawing surface.
#[derive(Debug)]
pub struct MapPlot<'a, K: RegionKey = String> {
    axes: &'a mut Axes,
    regions: Option<BTreeMap<K, Vec<Segment>>>,
    datasets: HashMap<String, BTreeMap<K, Vec<Segment>>>,
    handles: Option<BTreeMap<K, CollectionId>>,
    scale: Option<Rc<ScalarMappable>>,
}

/// Default continent fill, gray level 0.9.
pub const DEFAULT_CONTINENT_COLOR: Rgba = Rgba::rgb(230, 230, 230);

impl<'a, K: RegionKey> MapPlot<'a, K> {
    /// Wrap an axes, filling its background with the default continent
    /// color.
    pub fn new(axes: &'a mut Axes) -> Self {
        Self::with_continent_color(axes, Some(DEFAULT_CONTINENT_COLOR))
    }

    /// Wrap an axes with an explicit continent fill, or none.
    pub fn with_continent_color(axes: &'a mut Axes, continent_color: Option<Rgba>) -> Self {
        if let Some(color) = continent_color {
            axes.set_background(Some(color));
        }

        Self {
            axes,
            regions: None,
            datasets: HashMap::new(),
            handles: None,
            scale: None,
        }
    }

    /// The wrapped drawing surface.
    #[must_use]
    pub fn axes(&self) -> &Axes {
        self.axes
    }

    /// The wrapped drawing surface, mutably.
    pub fn axes_mut(&mut self) -> &mut Axes {
        self.axes
    }

    /// Load the regions to plot, grouped by `key_fn` over attribute records.
    ///
    /// Replaces any previously loaded region set.
    pub fn load_regions<P, F>(&mut self, path: P, key_fn: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: Fn(&Record) -> K,
    {
        self.regions = Some(shapes::read_grouped(path, key_fn, NO_FILTER)?);
        Ok(())
    }

    /// Load regions, keeping only records the filter accepts.
    pub fn load_regions_filtered<P, F, G>(
        &mut self,
        path: P,
        key_fn: F,
        filter_fn: G,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        F: Fn(&Record) -> K,
        G: Fn(&Record) -> bool,
    {
        self.regions = Some(shapes::read_grouped(path, key_fn, Some(filter_fn))?);
        Ok(())
    }

    /// Load an auxiliary per-region dataset under a name of the caller's
    /// choosing (for example label anchor geometry).
    pub fn load_data<P, F>(&mut self, path: P, name: &str, key_fn: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: Fn(&Record) -> K,
    {
        let groups = shapes::read_grouped(path, key_fn, NO_FILTER)?;
        self.datasets.insert(name.to_string(), groups);
        Ok(())
    }

    /// Load an auxiliary dataset with a record filter.
    pub fn load_data_filtered<P, F, G>(
        &mut self,
        path: P,
        name: &str,
        key_fn: F,
        filter_fn: G,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        F: Fn(&Record) -> K,
        G: Fn(&Record) -> bool,
    {
        let groups = shapes::read_grouped(path, key_fn, Some(filter_fn))?;
        self.datasets.insert(name.to_string(), groups);
        Ok(())
    }

    /// The loaded region groups, if any.
    #[must_use]
    pub fn regions(&self) -> Option<&BTreeMap<K, Vec<Segment>>> {
        self.regions.as_ref()
    }

    /// A named auxiliary dataset, if loaded.
    #[must_use]
    pub fn dataset(&self, name: &str) -> Option<&BTreeMap<K, Vec<Segment>>> {
        self.datasets.get(name)
    }

    /// The scalar-mappable retained by the last `color_from_values` call.
    #[must_use]
    pub fn scalar_mappable(&self) -> Option<&ScalarMappable> {
        self.scale.as_deref()
    }

    /// Draw every loaded region group as a line collection, retaining one
    /// handle per region key for later restyling.
    ///
    /// Re-invoking replaces the handle table; previously drawn collections
    /// stay on the axes.
    ///
    /// # Errors
    ///
    /// [`Error::RegionsNotLoaded`] when called before `load_regions`.
    pub fn draw_regions(&mut self, style: RegionStyleOverride) -> Result<()> {
        let regions = self.regions.as_ref().ok_or(Error::RegionsNotLoaded)?;
        let merged = RegionStyle::default().merge(&style);

        let mut handles = BTreeMap::new();
        for (key, segments) in regions {
            let id = self.axes.add_collection(segments.clone(), merged);
            handles.insert(key.clone(), id);
        }
        self.handles = Some(handles);

        Ok(())
    }

    /// Restyle drawn regions in place. Each override is merged onto the
    /// region-style defaults, not onto the collection's current style.
    ///
    /// # Errors
    ///
    /// [`Error::RegionsNotDrawn`] before `draw_regions`;
    /// [`Error::UnknownRegion`] for keys without a drawn collection.
    pub fn style_regions(&mut self, styles: &BTreeMap<K, RegionStyleOverride>) -> Result<()> {
        let handles = self.handles.as_ref().ok_or(Error::RegionsNotDrawn)?;

        for (key, ovr) in styles {
            let id = *handles
                .get(key)
                .ok_or_else(|| Error::UnknownRegion(key.to_string()))?;
            let collection = self
                .axes
                .collection_mut(id)
                .ok_or_else(|| Error::UnknownRegion(key.to_string()))?;
            collection.style = RegionStyle::default().merge(ovr);
        }

        Ok(())
    }

    /// Set the fill color of each listed region.
    ///
    /// # Errors
    ///
    /// Same as [`MapPlot::style_regions`].
    pub fn color_regions(&mut self, colors: &BTreeMap<K, Rgba>) -> Result<()> {
        let styles = colors
            .iter()
            .map(|(key, color)| {
                (key.clone(), RegionStyleOverride::new().face_color(*color))
            })
            .collect();
        self.style_regions(&styles)
    }

    /// Fill regions from a value mapping via a colormap.
    ///
    /// Limits default to the min/max of `values`; the colormap defaults to
    /// Blues. The resulting scale is retained for a later colorbar.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyValues`] for an empty mapping, [`Error::InvalidLimits`]
    /// for bad explicit limits, plus the [`MapPlot::style_regions`] errors.
    pub fn color_from_values(
        &mut self,
        values: &BTreeMap<K, f64>,
        limits: Option<(f64, f64)>,
        colormap: Option<Colormap>,
    ) -> Result<()> {
        let cmap = colormap.unwrap_or_default();
        let sm = match limits {
            Some((min, max)) => ScalarMappable::new(cmap, min, max)?,
            None => ScalarMappable::from_values(cmap, values.values().copied())?,
        };

        let colors = values
            .iter()
            .map(|(key, value)| (key.clone(), sm.to_rgba(*value)))
            .collect();
        self.scale = Some(Rc::new(sm));

        self.color_regions(&colors)
    }

    /// Add a colorbar for the scale retained by `color_from_values`.
    ///
    /// # Errors
    ///
    /// [`Error::NoColorMapping`] when no scale has been retained.
    pub fn add_colorbar(&mut self, label: Option<&str>) -> Result<()> {
        let scale = self.scale.clone().ok_or(Error::NoColorMapping)?;
        self.axes.add_colorbar(scale, label.map(str::to_string));
        Ok(())
    }

    /// Draw point markers at each coordinate.
    pub fn draw_points(&mut self, coords: &[Point], style: MarkerStyleOverride) {
        let merged = MarkerStyle::default().merge(&style);
        self.axes.add_markers(coords.to_vec(), merged);
    }

    /// Draw lines between named points, then markers at the involved points.
    ///
    /// With `draw_all_points` every named point gets a marker; otherwise
    /// only points referenced by at least one line spec are drawn, once
    /// each, in first-reference order.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPoint`] when a spec names a point missing from
    /// `points`.
    pub fn draw_point_lines(
        &mut self,
        points: &BTreeMap<String, Point>,
        lines: &[LineSpec],
        draw_all_points: bool,
        marker_style: MarkerStyleOverride,
    ) -> Result<()> {
        for spec in lines {
            let from = *points
                .get(&spec.from)
                .ok_or_else(|| Error::UnknownPoint(spec.from.clone()))?;
            let to = *points
                .get(&spec.to)
                .ok_or_else(|| Error::UnknownPoint(spec.to.clone()))?;
            let style = LineStyle::default().merge(&spec.style);
            self.axes.add_path(vec![from, to], style);
        }

        let marker_points: Vec<Point> = if draw_all_points {
            points.values().copied().collect()
        } else {
            let mut seen = HashSet::new();
            let mut referenced = Vec::new();
            for spec in lines {
                for name in [&spec.from, &spec.to] {
                    if seen.insert(name.clone()) {
                        if let Some(p) = points.get(name) {
                            referenced.push(*p);
                        }
                    }
                }
            }
            referenced
        };

        if !marker_points.is_empty() {
            self.draw_points(&marker_points, marker_style);
        }

        Ok(())
    }

    /// Draw explicit polylines, then markers at their coordinates.
    ///
    /// With `draw_all_points` every collected coordinate gets a marker
    /// (duplicates included); otherwise each distinct coordinate is drawn
    /// once, in first-seen order.
    pub fn draw_lines(
        &mut self,
        lines: &[(Vec<Point>, LineStyleOverride)],
        draw_all_points: bool,
        marker_style: MarkerStyleOverride,
    ) {
        let mut collected = Vec::new();
        for (coords, ovr) in lines {
            let style = LineStyle::default().merge(ovr);
            self.axes.add_path(coords.clone(), style);
            collected.extend_from_slice(coords);
        }

        let marker_points = if draw_all_points {
            collected
        } else {
            let mut seen = HashSet::new();
            collected
                .into_iter()
                .filter(|p| seen.insert((p.x.to_bits(), p.y.to_bits())))
                .collect()
        };

        if !marker_points.is_empty() {
            self.draw_points(&marker_points, marker_style);
        }
    }

    /// Place a text label at each coordinate.
    ///
    /// Labels come from `texts` when given, else from the key's `Display`
    /// form. A key missing from an explicit `texts` map logs a warning and
    /// is skipped; all other labels are still placed.
    pub fn draw_texts(
        &mut self,
        coords: &BTreeMap<K, Point>,
        texts: Option<&BTreeMap<K, String>>,
        style: TextStyleOverride,
    ) {
        let merged = TextStyle::default().merge(&style);

        for (key, at) in coords {
            let label = match texts {
                Some(map) => match map.get(key) {
                    Some(text) => text.clone(),
                    None => {
                        warn!(key = %key, "no label text for region, skipping");
                        continue;
                    }
                },
                None => key.to_string(),
            };
            self.axes.add_label(*at, label, merged);
        }
    }
}

/// Absent filter placeholder for the unfiltered load paths.
const NO_FILTER: Option<fn(&Record) -> bool> = None;
