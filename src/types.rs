//! Core types and constants shared across the tracking engine.

use bevy::prelude::*;

/// System sets ordering one simulation tick.
///
/// Structural changes (selection, nearby-set replacement) must be fully
/// applied before the same tick reads scene state, and within a tick the
/// clock advances before propagation, propagation before scene sync, and
/// scene sync before camera placement.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Selection / nearby-set structural changes (spawn, despawn).
    Structure,
    /// Virtual clock advancement.
    Clock,
    /// SGP4 propagation at the current virtual time.
    Propagate,
    /// Scene graph position sync and telemetry sampling.
    SyncScene,
    /// Camera follow placement.
    Camera,
}

/// Earth equatorial radius in kilometers (WGS-72, the SGP4 reference sphere).
pub const EARTH_RADIUS_KM: f64 = 6378.135;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Minutes per day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Milliseconds per minute
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Virtual simulation clock, independent of wall-clock time.
///
/// Advanced once per frame by the clock system while running; paused and
/// rescaled by user controls. Reset to wall-clock "now" whenever a new
/// object is selected.
#[derive(Resource, Clone, Debug)]
pub struct SimulationClock {
    /// Virtual "now" in milliseconds since the Unix epoch.
    pub current_ms: f64,
    /// Multiplier applied to wall-clock frame deltas. Always positive.
    pub speed: f64,
    /// Whether the clock is frozen.
    pub paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            current_ms: now_unix_ms(),
            speed: 1.0,
            paused: false,
        }
    }
}

impl SimulationClock {
    /// Advance virtual time by a wall-clock delta, honoring pause and speed.
    pub fn advance(&mut self, wall_delta_ms: f64) {
        if self.paused {
            return;
        }
        self.current_ms += wall_delta_ms * self.speed;
    }

    /// Set virtual time to an exact instant. Works while paused.
    pub fn reset_to(&mut self, unix_ms: f64) {
        self.current_ms = unix_ms;
    }

    /// Change the speed factor. Non-positive or non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_unix_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as f64
}

/// Format Unix milliseconds as "YYYY-MM-DD HH:MM:SS UTC".
///
/// Leap seconds are not accounted for; this is a display string, not an
/// astronomical timestamp.
pub fn unix_ms_to_date_string(unix_ms: f64) -> String {
    let unix_secs = (unix_ms / 1000.0).floor() as i64;

    let days_since_epoch = unix_secs.div_euclid(86400);
    let time_of_day = unix_secs.rem_euclid(86400);

    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (year, month, day) = days_to_ymd(days_since_epoch);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year, month, day, hours, minutes, seconds
    )
}

/// Convert days since Unix epoch to year, month, day
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    // Algorithm for Gregorian calendar
    let remaining_days = days + 719468; // Days from year 0 to 1970

    let era = if remaining_days >= 0 {
        remaining_days / 146097
    } else {
        (remaining_days - 146096) / 146097
    };

    let day_of_era = (remaining_days - era * 146097) as u32;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146096) / 365;
    let year = (year_of_era as i64 + era * 400) as i32;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };

    (year, month, day)
}
