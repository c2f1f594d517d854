//! Coordinate mapping between the inertial propagation frame and render space.
//!
//! SGP4 output is TEME: an Earth-centered inertial frame with +Z through the
//! north pole. The renderer is Y-up, so mapping is a fixed axis permutation
//! (render X = inertial X, render Y = inertial Z, render Z = -inertial Y)
//! plus a uniform scale.

use bevy::math::{DVec3, Vec3};

use crate::types::EARTH_RADIUS_KM;

/// Render scale: 1 render unit = 1000 km.
///
/// Keeps LEO geometry (radii ~6 400–7 000 km) in comfortable f32 range.
pub const RENDER_UNITS_PER_KM: f64 = 1.0e-3;

/// Planet radius in render units.
pub const EARTH_RENDER_RADIUS: f32 = (EARTH_RADIUS_KM * RENDER_UNITS_PER_KM) as f32;

/// Map an inertial-frame position (km) into render space.
pub fn inertial_to_render(p_km: DVec3) -> Vec3 {
    Vec3::new(
        (p_km.x * RENDER_UNITS_PER_KM) as f32,
        (p_km.z * RENDER_UNITS_PER_KM) as f32,
        (-p_km.y * RENDER_UNITS_PER_KM) as f32,
    )
}

/// Inverse of [`inertial_to_render`], in km.
pub fn render_to_inertial(p: Vec3) -> DVec3 {
    DVec3::new(
        p.x as f64 / RENDER_UNITS_PER_KM,
        -p.z as f64 / RENDER_UNITS_PER_KM,
        p.y as f64 / RENDER_UNITS_PER_KM,
    )
}
