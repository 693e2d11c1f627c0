//! Best-effort reprojection of GeoJSON geometry to the map's display
//! reference system, WGS 84 / Arctic Polar Stereographic (EPSG:3995).
//!
//! Input coordinates are assumed to be geographic longitude/latitude in
//! degrees, the GeoJSON default. Anything that cannot be projected is
//! reported as an error and the caller keeps the original geometry.

use std::fmt;

use geojson::{Geometry, Value};

/// Identifier of the target coordinate reference system.
pub const TARGET_CRS: &str = "EPSG:3995";

/// WGS 84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS 84 inverse flattening.
const WGS84_INV_F: f64 = 298.257_223_563;
/// Latitude of true scale for EPSG:3995.
const STANDARD_PARALLEL_DEG: f64 = 71.0;

/// Why a layer could not be reprojected.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The document declares a CRS other than geographic WGS 84.
    UnsupportedCrs(String),
    /// A position is outside the longitude/latitude domain.
    OutOfRange { lon: f64, lat: f64 },
    /// A position has fewer than two ordinates.
    ShortPosition,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCrs(name) => write!(f, "unsupported source CRS '{name}'"),
            Self::OutOfRange { lon, lat } => {
                write!(f, "position ({lon}, {lat}) is not geographic or cannot be projected")
            }
            Self::ShortPosition => write!(f, "position has fewer than two ordinates"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// North polar stereographic projection on the WGS 84 ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct PolarStereographic {
    e: f64,
    scale: f64,
}

impl Default for PolarStereographic {
    fn default() -> Self {
        Self::arctic()
    }
}

impl PolarStereographic {
    /// Parameters of EPSG:3995.
    pub fn arctic() -> Self {
        let f = 1.0 / WGS84_INV_F;
        let e = (2.0 * f - f * f).sqrt();
        let phi_c = STANDARD_PARALLEL_DEG.to_radians();
        let sin_c = phi_c.sin();
        let m_c = phi_c.cos() / (1.0 - e * e * sin_c * sin_c).sqrt();
        let t_c = conformal_t(phi_c, e);
        Self {
            e,
            scale: WGS84_A * m_c / t_c,
        }
    }

    /// Project a longitude/latitude pair in degrees to metres.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        // The south pole sits at infinity on a north polar projection.
        if !(-180.0..=180.0).contains(&lon) || !(lat > -90.0 && lat <= 90.0) {
            return Err(ProjectionError::OutOfRange { lon, lat });
        }
        let rho = self.scale * conformal_t(lat.to_radians(), self.e);
        let lambda = lon.to_radians();
        let x = rho * lambda.sin();
        let y = -rho * lambda.cos();
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutOfRange { lon, lat });
        }
        Ok((x, y))
    }

    /// Project every position of `geometry`, failing on the first bad one.
    /// The input is left untouched on failure.
    pub fn project_geometry(&self, geometry: &Geometry) -> Result<Geometry, ProjectionError> {
        Ok(Geometry {
            bbox: None,
            value: self.project_value(&geometry.value)?,
            foreign_members: geometry.foreign_members.clone(),
        })
    }

    fn project_value(&self, value: &Value) -> Result<Value, ProjectionError> {
        Ok(match value {
            Value::Point(pos) => Value::Point(self.project_position(pos)?),
            Value::MultiPoint(line) => Value::MultiPoint(self.project_line(line)?),
            Value::LineString(line) => Value::LineString(self.project_line(line)?),
            Value::MultiLineString(lines) => Value::MultiLineString(self.project_lines(lines)?),
            Value::Polygon(rings) => Value::Polygon(self.project_lines(rings)?),
            Value::MultiPolygon(polygons) => Value::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| self.project_lines(rings))
                    .collect::<Result<_, _>>()?,
            ),
            Value::GeometryCollection(parts) => Value::GeometryCollection(
                parts
                    .iter()
                    .map(|part| self.project_geometry(part))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn project_lines(&self, lines: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Vec<f64>>>, ProjectionError> {
        lines.iter().map(|line| self.project_line(line)).collect()
    }

    fn project_line(&self, line: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ProjectionError> {
        line.iter().map(|pos| self.project_position(pos)).collect()
    }

    fn project_position(&self, pos: &[f64]) -> Result<Vec<f64>, ProjectionError> {
        let [lon, lat, rest @ ..] = pos else {
            return Err(ProjectionError::ShortPosition);
        };
        let (x, y) = self.project(*lon, *lat)?;
        let mut out = Vec::with_capacity(pos.len());
        out.push(x);
        out.push(y);
        out.extend_from_slice(rest);
        Ok(out)
    }
}

/// Snyder's `t` for the conformal latitude, eq. 15-9.
fn conformal_t(phi: f64, e: f64) -> f64 {
    let e_sin = e * phi.sin();
    (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)
}

/// Check an optional legacy `crs` member for something we can project.
pub fn check_declared_crs(name: Option<&str>) -> Result<(), ProjectionError> {
    let Some(name) = name else {
        return Ok(());
    };
    let upper = name.to_ascii_uppercase();
    let geographic = upper.ends_with("CRS84")
        || upper.ends_with("EPSG:4326")
        || upper.ends_with("EPSG::4326");
    if geographic {
        Ok(())
    } else {
        Err(ProjectionError::UnsupportedCrs(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1.0
    }

    #[test]
    fn pole_maps_to_origin() {
        let (x, y) = PolarStereographic::arctic().project(0.0, 90.0).unwrap();
        assert!(close(x, 0.0) && close(y, 0.0));
    }

    #[test]
    fn standard_parallel_has_true_scale() {
        let (x, y) = PolarStereographic::arctic().project(0.0, 71.0).unwrap();
        assert!(close(x, 0.0));
        assert!(close(y, -2_082_760.1), "y = {y}");
    }

    #[test]
    fn east_longitude_maps_to_positive_x() {
        let (x, y) = PolarStereographic::arctic().project(90.0, 60.0).unwrap();
        assert!(close(x, 3_333_134.0), "x = {x}");
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn south_pole_is_rejected() {
        let err = PolarStereographic::arctic().project(0.0, -90.0).unwrap_err();
        assert!(matches!(err, ProjectionError::OutOfRange { .. }));
    }

    #[test]
    fn projected_input_is_rejected() {
        let err = PolarStereographic::arctic()
            .project(500_000.0, 6_000_000.0)
            .unwrap_err();
        assert!(matches!(err, ProjectionError::OutOfRange { .. }));
    }

    #[test]
    fn geometry_keeps_extra_ordinates() {
        let geometry = Geometry::new(Value::Point(vec![0.0, 90.0, 12.5]));
        let projected = PolarStereographic::arctic()
            .project_geometry(&geometry)
            .unwrap();
        let Value::Point(pos) = projected.value else {
            panic!("expected point");
        };
        assert_eq!(pos.len(), 3);
        assert_eq!(pos[2], 12.5);
    }

    #[test]
    fn declared_crs() {
        assert!(check_declared_crs(None).is_ok());
        assert!(check_declared_crs(Some("urn:ogc:def:crs:OGC:1.3:CRS84")).is_ok());
        assert!(check_declared_crs(Some("urn:ogc:def:crs:EPSG::4326")).is_ok());
        assert!(check_declared_crs(Some("urn:ogc:def:crs:EPSG::32633")).is_err());
    }
}
