use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Web Mercator latitude limit; the y coordinate diverges toward the poles.
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("coordinate is not finite: ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },
    #[error("latitude {0} is outside the projectable range")]
    LatitudeOutOfRange(f64),
}

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// Spherical Mercator with a fixed centre, scale and translation.
/// The centre coordinate lands exactly on `translate`; y grows southward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    center: GeoPoint,
    scale: f64,
    translate: (f64, f64),
    center_y: f64,
}

impl MercatorProjection {
    pub fn new(center: GeoPoint, scale: f64, translate: (f64, f64)) -> Result<Self, ProjectionError> {
        validate(center.lon, center.lat)?;
        let center_y = mercator_y(center.lat.to_radians());
        Ok(Self {
            center,
            scale,
            translate,
            center_y,
        })
    }

    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        validate(lon, lat)?;
        let x = (lon - self.center.lon).to_radians();
        let y = mercator_y(lat.to_radians()) - self.center_y;
        Ok((
            self.translate.0 + self.scale * x,
            self.translate.1 - self.scale * y,
        ))
    }

    pub fn project_point(&self, p: GeoPoint) -> Result<(f64, f64), ProjectionError> {
        self.project(p.lon, p.lat)
    }
}

#[inline]
fn mercator_y(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan().ln()
}

fn validate(lon: f64, lat: f64) -> Result<(), ProjectionError> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(ProjectionError::NonFinite { lon, lat });
    }
    if lat.abs() > MAX_LATITUDE {
        return Err(ProjectionError::LatitudeOutOfRange(lat));
    }
    Ok(())
}
