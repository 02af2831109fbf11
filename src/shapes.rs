//! Shapefile loading: read shapes plus attribute records and group their
//! vertex runs by a caller-supplied key function.
//!
//! Coordinates pass through the reader unmodified; this module never
//! projects or transforms geometry. Attribute records are `dbase` records
//! as exposed by the `shapefile` crate; the free functions at the bottom
//! help build key and filter closures over them.

use std::collections::BTreeMap;
use std::path::Path;

use shapefile::dbase::{FieldValue, Record};
use shapefile::Shape;
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Point, Segment};

/// Read a shapefile and group every shape's vertex runs by key.
///
/// For each `(shape, record)` pair the key is `key_fn(record)`; when a
/// filter is given, pairs for which it returns `false` are dropped. All
/// parts (or rings) of a kept shape are appended to its key's group, so
/// multi-polygon regions accumulate under one key.
///
/// # Errors
///
/// Propagates [`crate::Error::Shapefile`] when the file is unreadable or
/// malformed.
pub fn read_grouped<P, K, F, G>(
    path: P,
    key_fn: F,
    filter_fn: Option<G>,
) -> Result<BTreeMap<K, Vec<Segment>>>
where
    P: AsRef<Path>,
    K: Ord,
    F: Fn(&Record) -> K,
    G: Fn(&Record) -> bool,
{
    let pairs = shapefile::read(path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        shapes = pairs.len(),
        "read shapefile"
    );

    let mut groups: BTreeMap<K, Vec<Segment>> = BTreeMap::new();
    for (shape, record) in pairs {
        if let Some(filter) = &filter_fn {
            if !filter(&record) {
                continue;
            }
        }

        let key = key_fn(&record);
        groups
            .entry(key)
            .or_default()
            .extend(shape_segments(shape));
    }

    Ok(groups)
}

/// Flatten one shape into drawable vertex runs.
///
/// Z/M and other unsupported shape kinds are skipped with a debug log
/// instead of failing the whole load.
fn shape_segments(shape: Shape) -> Vec<Segment> {
    match shape {
        Shape::NullShape => Vec::new(),
        Shape::Point(p) => vec![vec![Point::new(p.x, p.y)]],
        Shape::Polyline(line) => line
            .parts()
            .iter()
            .map(|part| part.iter().map(|p| Point::new(p.x, p.y)).collect())
            .collect(),
        Shape::Polygon(polygon) => polygon
            .rings()
            .iter()
            .map(|ring| {
                let points = match ring {
                    shapefile::PolygonRing::Outer(v) | shapefile::PolygonRing::Inner(v) => v,
                };
                points.iter().map(|p| Point::new(p.x, p.y)).collect()
            })
            .collect(),
        other => {
            debug!(kind = %other.shapetype(), "skipping unsupported shape kind");
            Vec::new()
        }
    }
}

/// Get a character field as a trimmed string.
///
/// Returns `None` for missing fields, non-character fields and dBASE nulls.
#[must_use]
pub fn string_field(record: &Record, name: &str) -> Option<String> {
    match record.get(name) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim_end().to_string()),
        _ => None,
    }
}

/// Get a numeric field as `f64` (numeric, float or integer columns).
#[must_use]
pub fn numeric_field(record: &Record, name: &str) -> Option<f64> {
    match record.get(name) {
        Some(FieldValue::Numeric(Some(v))) => Some(*v),
        Some(FieldValue::Float(Some(v))) => Some(f64::from(*v)),
        Some(FieldValue::Integer(v)) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Build a filter closure that keeps records whose character field equals
/// `value`.
pub fn field_eq(name: &str, value: &str) -> impl Fn(&Record) -> bool {
    let name = name.to_string();
    let value = value.to_string();
    move |record| string_field(record, &name).as_deref() == Some(value.as_str())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Scratch shapefiles shared by unit tests.

    use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
    use shapefile::{Point as ShpPoint, Polygon, PolygonRing};
    use std::convert::TryFrom;
    use std::path::{Path, PathBuf};

    fn square_ring(x0: f64, y0: f64, side: f64) -> PolygonRing<ShpPoint> {
        PolygonRing::Outer(vec![
            ShpPoint::new(x0, y0),
            ShpPoint::new(x0, y0 + side),
            ShpPoint::new(x0 + side, y0 + side),
            ShpPoint::new(x0 + side, y0),
        ])
    }

    pub(crate) fn record(name: &str) -> Record {
        let mut rec = Record::default();
        rec.insert(
            "NAME".to_string(),
            FieldValue::Character(Some(name.to_string())),
        );
        rec
    }

    /// Write a scratch shapefile with three unit squares: AA, AA, BB.
    pub(crate) fn write_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("regions.shp");
        let table = TableWriterBuilder::new()
            .add_character_field(FieldName::try_from("NAME").unwrap(), 10);
        let mut writer = shapefile::Writer::from_path(&path, table).unwrap();

        for (name, x0) in [("AA", 0.0), ("AA", 2.0), ("BB", 5.0)] {
            let polygon = Polygon::new(square_ring(x0, 0.0, 1.0));
            writer.write_shape_and_record(&polygon, &record(name)).unwrap();
        }
        drop(writer);
        path
    }

    pub(crate) fn name_key(record: &Record) -> String {
        super::string_field(record, "NAME").unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{name_key, record, write_fixture};
    use super::*;

    #[test]
    fn test_grouping_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());

        let groups =
            read_grouped(&path, name_key, None::<fn(&Record) -> bool>).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["AA"].len(), 2);
        assert_eq!(groups["BB"].len(), 1);
    }

    #[test]
    fn test_filter_drops_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());

        let groups = read_grouped(&path, name_key, Some(field_eq("NAME", "BB"))).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key("BB"));
    }

    #[test]
    fn test_repeat_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());

        let first = read_grouped(&path, name_key, None::<fn(&Record) -> bool>).unwrap();
        let second = read_grouped(&path, name_key, None::<fn(&Record) -> bool>).unwrap();

        let counts = |g: &BTreeMap<String, Vec<Segment>>| {
            g.iter()
                .map(|(k, v)| (k.clone(), v.len()))
                .collect::<Vec<_>>()
        };
        assert_eq!(counts(&first), counts(&second));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_grouped(
            "definitely/not/here.shp",
            name_key,
            None::<fn(&Record) -> bool>,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_field_helpers() {
        let rec = record("AA ");
        assert_eq!(string_field(&rec, "NAME").as_deref(), Some("AA"));
        assert_eq!(string_field(&rec, "MISSING"), None);
        assert_eq!(numeric_field(&rec, "NAME"), None);

        let mut numeric = Record::default();
        numeric.insert("POP".to_string(), FieldValue::Numeric(Some(12.5)));
        assert_eq!(numeric_field(&numeric, "POP"), Some(12.5));
    }
}
