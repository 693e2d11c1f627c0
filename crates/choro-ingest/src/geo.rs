//! Region layers loaded from GeoJSON.

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, GeoJson, Geometry, JsonObject, JsonValue, feature::Id};
use tracing::{debug, info, warn};

use choro_model::JoinedValue;

use crate::error::{LoadError, Result};
use crate::projection::{PolarStereographic, ProjectionError, TARGET_CRS, check_declared_crs};

/// Options controlling how a region layer is loaded.
#[derive(Debug, Clone, Copy)]
pub struct GeoLoadOptions {
    /// Reproject coordinates to [`TARGET_CRS`] after loading.
    pub reproject: bool,
}

impl Default for GeoLoadOptions {
    fn default() -> Self {
        Self { reproject: true }
    }
}

/// One feature of the layer plus the value joined onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: Option<Id>,
    pub geometry: Option<Geometry>,
    pub properties: JsonObject,
    pub value: JoinedValue,
}

/// An ordered collection of regions with their attributes.
///
/// Region keys are not required to be unique; lookups by key touch every
/// matching region.
#[derive(Debug, Clone)]
pub struct GeoTable {
    source: PathBuf,
    columns: Vec<String>,
    key_column: Option<String>,
    regions: Vec<Region>,
    crs: Option<String>,
}

impl GeoTable {
    /// Read a GeoJSON file.
    ///
    /// Fails when the file cannot be read or parsed, or holds no features.
    /// A reprojection failure is logged and the source coordinates kept.
    pub fn load(path: &Path, options: &GeoLoadOptions) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
        Self::parse(&text, path, options)
    }

    /// Parse GeoJSON text. `source` is only used for messages.
    pub fn parse(text: &str, source: &Path, options: &GeoLoadOptions) -> Result<Self> {
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| LoadError::GeoJsonParse {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        let (features, declared_crs) = match geojson {
            GeoJson::FeatureCollection(collection) => {
                let crs = collection.foreign_members.as_ref().and_then(crs_name);
                (collection.features, crs)
            }
            GeoJson::Feature(feature) => (vec![feature], None),
            GeoJson::Geometry(geometry) => (vec![Feature::from(geometry)], None),
        };

        if features.is_empty() {
            return Err(LoadError::NoGeometry {
                path: source.to_path_buf(),
            });
        }

        let mut regions: Vec<Region> = features
            .into_iter()
            .map(|feature| Region {
                id: feature.id,
                geometry: feature.geometry,
                properties: feature.properties.unwrap_or_default(),
                value: None,
            })
            .collect();

        let mut crs = declared_crs.clone();
        if options.reproject {
            match reproject(&regions, declared_crs.as_deref()) {
                Ok(projected) => {
                    for (region, geometry) in regions.iter_mut().zip(projected) {
                        region.geometry = geometry;
                    }
                    crs = Some(TARGET_CRS.to_string());
                }
                Err(error) => {
                    warn!(
                        path = %source.display(),
                        target = TARGET_CRS,
                        %error,
                        "reprojection failed, keeping source coordinates"
                    );
                }
            }
        }

        let columns = collect_columns(&regions);
        let key_column = columns.first().cloned();
        info!(
            path = %source.display(),
            regions = regions.len(),
            columns = columns.len(),
            key_column = key_column.as_deref().unwrap_or(""),
            "loaded region layer"
        );

        Ok(Self {
            source: source.to_path_buf(),
            columns,
            key_column,
            regions,
            crs,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Attribute column names in first-seen order, geometry excluded.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn key_column(&self) -> Option<&str> {
        self.key_column.as_deref()
    }

    /// Choose which attribute identifies a region. Nothing else changes.
    pub fn set_key_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            debug!(column = %name, "key column is not an attribute of every region");
        }
        self.key_column = Some(name);
    }

    /// Coordinate reference system of the stored geometry, when known.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Key text of `region` under the current key column.
    pub fn key_of(&self, region: &Region) -> Option<String> {
        let column = self.key_column.as_deref()?;
        region.properties.get(column).and_then(key_text)
    }

    /// Overwrite the joined value of every region whose key equals
    /// `region_key`. Returns how many regions changed; zero is not an error.
    pub fn update_value(&mut self, region_key: &str, new_value: JoinedValue) -> usize {
        let Some(column) = self.key_column.clone() else {
            return 0;
        };
        let wanted = region_key.trim();
        let new_value = new_value.filter(|v| !v.is_nan());
        let mut updated = 0;
        for region in &mut self.regions {
            let matches = region
                .properties
                .get(&column)
                .and_then(key_text)
                .is_some_and(|key| key == wanted);
            if matches {
                region.value = new_value;
                updated += 1;
            }
        }
        debug!(region_key = wanted, updated, "updated region value");
        updated
    }

    /// Key text and joined value per region, in layer order. Regions with
    /// no key show an empty key.
    pub fn value_rows(&self) -> Vec<(String, JoinedValue)> {
        if self.key_column.is_none() {
            return Vec::new();
        }
        self.regions
            .iter()
            .map(|region| (self.key_of(region).unwrap_or_default(), region.value))
            .collect()
    }
}

/// Render an attribute as join-key text: trimmed, numbers in their JSON
/// spelling. Null has no key.
pub fn key_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.trim().to_string()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn collect_columns(regions: &[Region]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for region in regions {
        for name in region.properties.keys() {
            if name != "geometry" && !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

/// Name from a legacy `"crs": {"type": "name", "properties": {"name": ..}}`.
fn crs_name(members: &JsonObject) -> Option<String> {
    members
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// Project every geometry, all or nothing.
fn reproject(
    regions: &[Region],
    declared_crs: Option<&str>,
) -> std::result::Result<Vec<Option<Geometry>>, ProjectionError> {
    check_declared_crs(declared_crs)?;
    let projection = PolarStereographic::arctic();
    regions
        .iter()
        .map(|region| {
            region
                .geometry
                .as_ref()
                .map(|g| projection.project_geometry(g))
                .transpose()
        })
        .collect()
}
