//! Export of a classified map.
//!
//! [`Exporter`] is the seam for export collaborators. The crate ships a
//! vector exporter, [`GeoJsonExporter`], which writes the layer back out
//! with simplestyle fill and stroke properties per region.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, JsonObject};
use thiserror::Error;

use choro_core::RenderPlan;
use choro_ingest::{GeoTable, TARGET_CRS};

/// Property holding the joined value of each exported region.
pub const VALUE_PROPERTY: &str = "choro:value";
/// Property flagging regions without a value.
pub const MISSING_PROPERTY: &str = "choro:missing";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize map")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// The plan was built from a different layer.
    #[error("plan covers {plan} regions but the layer has {regions}")]
    PlanMismatch { plan: usize, regions: usize },
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Writes a planned map to an output artifact.
pub trait Exporter {
    fn export(&self, geo: &GeoTable, plan: &RenderPlan, path: &Path) -> Result<()>;
}

/// Vector export as a styled GeoJSON FeatureCollection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonExporter;

impl GeoJsonExporter {
    /// Build the collection without writing it.
    pub fn collection(&self, geo: &GeoTable, plan: &RenderPlan) -> Result<FeatureCollection> {
        if plan.regions.len() != geo.len() {
            return Err(ExportError::PlanMismatch {
                plan: plan.regions.len(),
                regions: geo.len(),
            });
        }

        let features = geo
            .regions()
            .iter()
            .zip(&plan.regions)
            .map(|(region, planned)| {
                let mut properties = region.properties.clone();
                properties.insert("fill".to_string(), planned.fill.as_str().into());
                properties.insert("stroke".to_string(), plan.edge_color.as_str().into());
                properties.insert("stroke-width".to_string(), plan.edge_width.into());
                properties.insert(VALUE_PROPERTY.to_string(), planned.value.into());
                properties.insert(MISSING_PROPERTY.to_string(), planned.missing.into());
                Feature {
                    bbox: None,
                    geometry: region.geometry.clone(),
                    id: region.id.clone(),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: geo.crs().map(crs_member),
        })
    }
}

impl Exporter for GeoJsonExporter {
    fn export(&self, geo: &GeoTable, plan: &RenderPlan, path: &Path) -> Result<()> {
        let collection = self.collection(geo, plan)?;
        let file = File::create(path).map_err(|e| ExportError::Io {
            operation: "create",
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &collection)
            .map_err(|source| ExportError::Serialize { source })?;
        writer.flush().map_err(|e| ExportError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(
            path = %path.display(),
            regions = collection.features.len(),
            missing = plan.missing_count(),
            "exported styled GeoJSON"
        );
        Ok(())
    }
}

/// Legacy named-CRS member so readers know the coordinates are projected.
fn crs_member(crs: &str) -> JsonObject {
    let name = if crs == TARGET_CRS {
        "urn:ogc:def:crs:EPSG::3995".to_string()
    } else {
        crs.to_string()
    };
    let mut member = JsonObject::new();
    member.insert(
        "crs".to_string(),
        serde_json::json!({"type": "name", "properties": {"name": name}}),
    );
    member
}
