//! Test utilities for the tracking engine's unit tests.

/// Fixtures shared across module tests.
pub mod fixtures {
    /// Real ISS element set, reused from the built-in catalog snapshot.
    pub use crate::catalog::{ISS_LINE1, ISS_LINE2};

    pub const ISS_NORAD_ID: u64 = 25544;
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}
