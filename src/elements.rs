//! Orbital element sets and SGP4 propagation.
//!
//! Wraps a parsed two-line element set together with its initialized SGP4
//! constants. An `ElementSet` is immutable once parsed; selecting a new
//! object replaces the whole value.

use bevy::math::DVec3;
use sgp4::Constants;
use thiserror::Error;

use crate::types::{EARTH_RADIUS_KM, MINUTES_PER_DAY, MS_PER_MINUTE, SECONDS_PER_DAY};

/// Earth standard gravitational parameter, km³/s².
pub const GM_EARTH: f64 = 398600.4418;

/// Failure to turn two element lines into a usable propagation model.
#[derive(Debug, Error)]
pub enum ElementSetError {
    /// The lines did not parse as a two-line element set.
    #[error("element lines rejected: {0}")]
    Malformed(String),
    /// The lines parsed but SGP4 initialization rejected them.
    #[error("orbital model initialization failed: {0}")]
    Model(String),
}

/// Failure to compute a state at a particular instant.
///
/// Callers treat this as "no position available this tick" and skip the
/// object; the next tick retries at an advanced time.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("propagation failed {minutes_from_epoch:.1} min from epoch: {message}")]
    Model {
        minutes_from_epoch: f64,
        message: String,
    },
    #[error("propagation produced a non-finite state {minutes_from_epoch:.1} min from epoch")]
    NonFinite { minutes_from_epoch: f64 },
}

/// Inertial-frame state at an instant: position in km, velocity in km/s.
#[derive(Clone, Copy, Debug)]
pub struct StateVector {
    pub position_km: DVec3,
    pub velocity_km_s: DVec3,
}

impl StateVector {
    /// Distance from the planet center in km.
    pub fn radius_km(&self) -> f64 {
        self.position_km.length()
    }

    /// Altitude above the SGP4 reference sphere in km.
    pub fn altitude_km(&self) -> f64 {
        self.radius_km() - EARTH_RADIUS_KM
    }

    /// Scalar speed in km/s.
    pub fn speed_km_s(&self) -> f64 {
        self.velocity_km_s.length()
    }
}

/// A parsed two-line element set with initialized SGP4 constants.
pub struct ElementSet {
    /// Object name from the record (or the element lines when present there).
    pub name: String,
    /// Catalog number.
    pub norad_id: u64,
    /// Element epoch in minutes since the Unix epoch.
    pub epoch_minutes: f64,
    /// Mean motion in revolutions per day.
    pub mean_motion: f64,
    /// Inclination in degrees.
    pub inclination_deg: f64,
    /// Orbital eccentricity.
    pub eccentricity: f64,
    /// B* drag term, inverse earth radii.
    pub drag_term: f64,
    constants: Constants,
}

impl ElementSet {
    /// Parse two element lines and initialize the propagation model.
    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Self, ElementSetError> {
        let elements =
            sgp4::Elements::from_tle(Some(name.to_owned()), line1.as_bytes(), line2.as_bytes())
                .map_err(|e| ElementSetError::Malformed(e.to_string()))?;
        let constants =
            Constants::from_elements(&elements).map_err(|e| ElementSetError::Model(e.to_string()))?;

        let epoch_minutes = elements.datetime.and_utc().timestamp() as f64 / 60.0;

        Ok(Self {
            name: elements
                .object_name
                .clone()
                .unwrap_or_else(|| name.to_owned()),
            norad_id: elements.norad_id,
            epoch_minutes,
            mean_motion: elements.mean_motion,
            inclination_deg: elements.inclination,
            eccentricity: elements.eccentricity,
            drag_term: elements.drag_term,
            constants,
        })
    }

    /// Propagate to an absolute instant in Unix milliseconds.
    ///
    /// Instants before, at, or after the element epoch are all valid;
    /// accuracy degrades far from epoch but the contract stays the same.
    pub fn propagate(&self, unix_ms: f64) -> Result<StateVector, PropagationError> {
        let minutes_from_epoch = unix_ms / MS_PER_MINUTE - self.epoch_minutes;

        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_from_epoch))
            .map_err(|e| PropagationError::Model {
                minutes_from_epoch,
                message: e.to_string(),
            })?;

        let position_km = DVec3::from_array(prediction.position);
        let velocity_km_s = DVec3::from_array(prediction.velocity);

        if !position_km.is_finite() || !velocity_km_s.is_finite() {
            return Err(PropagationError::NonFinite { minutes_from_epoch });
        }

        Ok(StateVector {
            position_km,
            velocity_km_s,
        })
    }

    /// Orbital period in minutes, derived from mean motion.
    ///
    /// None when mean motion is absent or degenerate, in which case no orbit
    /// path can be drawn for the object.
    pub fn period_minutes(&self) -> Option<f64> {
        if self.mean_motion.is_finite() && self.mean_motion > 0.0 {
            Some(MINUTES_PER_DAY / self.mean_motion)
        } else {
            None
        }
    }

}

/// Semi-major-axis altitude for a mean motion in revolutions per day.
pub fn mean_motion_to_altitude_km(n_revs_per_day: f64) -> f64 {
    let n_rad_s = n_revs_per_day * 2.0 * std::f64::consts::PI / SECONDS_PER_DAY;
    let a = (GM_EARTH / (n_rad_s * n_rad_s)).powf(1.0 / 3.0);
    a - EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{ISS_LINE1, ISS_LINE2, ISS_NORAD_ID};
    use approx::assert_relative_eq;

    fn iss() -> ElementSet {
        ElementSet::from_lines("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[test]
    fn test_parse_iss_metadata() {
        let set = iss();
        assert_eq!(set.norad_id, ISS_NORAD_ID);
        assert_relative_eq!(set.inclination_deg, 51.6345, epsilon = 1e-4);
        assert!(set.epoch_minutes > 0.0);
    }

    #[test]
    fn test_propagate_at_epoch_is_in_leo_band() {
        let set = iss();
        let state = set.propagate(set.epoch_minutes * MS_PER_MINUTE).unwrap();
        let r = state.radius_km();
        assert!(
            (6700.0..7000.0).contains(&r),
            "ISS radius {} km outside LEO band",
            r
        );
        // Circular LEO speed is ~7.7 km/s
        assert!((7.0..8.5).contains(&state.speed_km_s()));
    }

    #[test]
    fn test_propagate_far_from_epoch_stays_finite() {
        let set = iss();
        // A year after epoch: accuracy is poor but the contract holds.
        let t = (set.epoch_minutes + 365.0 * MINUTES_PER_DAY) * MS_PER_MINUTE;
        match set.propagate(t) {
            Ok(state) => {
                assert!(state.position_km.is_finite());
                assert!(state.velocity_km_s.is_finite());
            }
            // An explicit failure honors the contract; silent NaN would not.
            Err(_) => {}
        }
    }

    #[test]
    fn test_period_matches_mean_motion() {
        let set = iss();
        // 15.49 rev/day is a ~93 minute orbit
        let period = set.period_minutes().unwrap();
        assert!((90.0..96.0).contains(&period), "period {}", period);
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        assert!(ElementSet::from_lines("X", "garbage", "more garbage").is_err());
        assert!(ElementSet::from_lines("X", "", "").is_err());
        // Swapped lines must not parse as a valid set
        assert!(ElementSet::from_lines("X", ISS_LINE2, ISS_LINE1).is_err());
    }

    #[test]
    fn test_mean_motion_altitude_sanity() {
        // ~15.5 rev/day is a ~420 km orbit; 1 rev/day is near-geosynchronous.
        let leo = mean_motion_to_altitude_km(15.49);
        assert!((300.0..500.0).contains(&leo), "leo altitude {}", leo);
        let geo = mean_motion_to_altitude_km(1.0027);
        assert!((35_000.0..36_500.0).contains(&geo), "geo altitude {}", geo);
    }
}
