//! Per-map zone coordinate registry
//!
//! Zone geometry lives in a JSON file mapping each map name to a list of
//! zones, with corners written as space-separated float triples. A default
//! file is seeded on first start so server operators have a template to edit.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::Vec3;

/// A zone entry as written in the coordinates file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawZoneDef {
    pub name: String,
    /// First corner, "x y z"
    pub point1: String,
    /// Opposite corner, "x y z"
    pub point2: String,
}

/// A parsed zone definition
#[derive(Debug, Clone)]
pub struct ZoneDef {
    pub name: String,
    pub point1: Vec3,
    pub point2: Vec3,
}

/// All known maps and their zone definitions
#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: HashMap<String, Vec<ZoneDef>>,
}

/// Map coordinate file errors
#[derive(Debug, thiserror::Error)]
pub enum MapConfigError {
    #[error("failed to read map coordinates file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse map coordinates file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("zone '{zone}' on map '{map}' has malformed corner '{value}' (expected three floats)")]
    BadCorner {
        map: String,
        zone: String,
        value: String,
    },

    #[error("duplicate zone name '{zone}' on map '{map}'")]
    DuplicateZone { map: String, zone: String },
}

impl MapRegistry {
    pub fn new(maps: HashMap<String, Vec<ZoneDef>>) -> Self {
        Self { maps }
    }

    /// Load the registry, seeding a default coordinates file if none exists
    pub fn load_or_init(path: &Path) -> Result<Self, MapConfigError> {
        if !path.exists() {
            write_default_file(path)?;
            info!(path = %path.display(), "Seeded default map coordinates file");
        }

        let contents = fs::read_to_string(path).map_err(|source| MapConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let raw: HashMap<String, Vec<RawZoneDef>> =
            serde_json::from_str(&contents).map_err(|source| MapConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let mut maps = HashMap::new();
        for (map, zones) in raw {
            let mut seen = HashSet::new();
            let mut defs = Vec::with_capacity(zones.len());
            for zone in zones {
                if !seen.insert(zone.name.clone()) {
                    return Err(MapConfigError::DuplicateZone {
                        map,
                        zone: zone.name,
                    });
                }
                let point1 = parse_corner(&zone.point1).ok_or_else(|| MapConfigError::BadCorner {
                    map: map.clone(),
                    zone: zone.name.clone(),
                    value: zone.point1.clone(),
                })?;
                let point2 = parse_corner(&zone.point2).ok_or_else(|| MapConfigError::BadCorner {
                    map: map.clone(),
                    zone: zone.name.clone(),
                    value: zone.point2.clone(),
                })?;
                defs.push(ZoneDef {
                    name: zone.name,
                    point1,
                    point2,
                });
            }
            maps.insert(map, defs);
        }

        Ok(Self { maps })
    }

    /// Zone definitions for a map, in file order. `None` when the map has no
    /// configuration.
    pub fn zones_for(&self, map: &str) -> Option<&[ZoneDef]> {
        self.maps.get(map).map(Vec::as_slice)
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }
}

/// Parse a "x y z" corner triple
fn parse_corner(raw: &str) -> Option<Vec3> {
    let mut parts = raw.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vec3::new(x, y, z))
}

/// Seed content: one example map with three zones
fn default_maps() -> HashMap<String, Vec<RawZoneDef>> {
    let zones = vec![
        RawZoneDef {
            name: "South".to_string(),
            point1: "155 -923 448".to_string(),
            point2: "527 -1168 522".to_string(),
        },
        RawZoneDef {
            name: "Mid".to_string(),
            point1: "846 592 64".to_string(),
            point2: "189 751 148".to_string(),
        },
        RawZoneDef {
            name: "North".to_string(),
            point1: "599 -112 648".to_string(),
            point2: "431 -272 732".to_string(),
        },
    ];
    HashMap::from([("crossfire_canyon".to_string(), zones)])
}

fn write_default_file(path: &Path) -> Result<(), MapConfigError> {
    let io_err = |source| MapConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let contents =
        serde_json::to_string_pretty(&default_maps()).map_err(|source| MapConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    fs::write(path, contents).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_and_loads_the_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_coordinates.json");

        let registry = MapRegistry::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(registry.map_count(), 1);

        let zones = registry.zones_for("crossfire_canyon").unwrap();
        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].name, "South");
        assert_eq!(zones[0].point1, Vec3::new(155.0, -923.0, 448.0));

        // Loading again must not rewrite or re-seed anything.
        let again = MapRegistry::load_or_init(&path).unwrap();
        assert_eq!(again.map_count(), 1);
    }

    #[test]
    fn loads_a_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(
            &path,
            r#"{ "warehouse": [ { "name": "Yard", "point1": "0 0 0", "point2": "-10 10 5.5" } ] }"#,
        )
        .unwrap();

        let registry = MapRegistry::load_or_init(&path).unwrap();
        let zones = registry.zones_for("warehouse").unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].point2, Vec3::new(-10.0, 10.0, 5.5));
        assert!(registry.zones_for("uncharted").is_none());
    }

    #[test]
    fn malformed_corner_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(
            &path,
            r#"{ "warehouse": [ { "name": "Yard", "point1": "0 0", "point2": "1 1 1" } ] }"#,
        )
        .unwrap();

        match MapRegistry::load_or_init(&path) {
            Err(MapConfigError::BadCorner { map, zone, value }) => {
                assert_eq!(map, "warehouse");
                assert_eq!(zone, "Yard");
                assert_eq!(value, "0 0");
            }
            other => panic!("expected BadCorner, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_zone_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(
            &path,
            r#"{ "warehouse": [
                { "name": "Yard", "point1": "0 0 0", "point2": "1 1 1" },
                { "name": "Yard", "point1": "2 2 2", "point2": "3 3 3" }
            ] }"#,
        )
        .unwrap();

        assert!(matches!(
            MapRegistry::load_or_init(&path),
            Err(MapConfigError::DuplicateZone { .. })
        ));
    }

    #[test]
    fn corner_triples_reject_trailing_tokens() {
        assert_eq!(parse_corner("1 2 3"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(parse_corner("  1.5   -2  3 "), Some(Vec3::new(1.5, -2.0, 3.0)));
        assert_eq!(parse_corner("1 2 3 4"), None);
        assert_eq!(parse_corner("1 two 3"), None);
        assert_eq!(parse_corner(""), None);
    }
}
