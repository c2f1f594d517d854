//! Rendering systems for the tracking engine.
//!
//! Owns the renderable scene: the planet body, the tracked-object marker and
//! orbit path, and the nearby-object markers. Structural changes come from
//! the selection and nearby-set systems; this module spawns the visuals they
//! request and keeps positions in sync every tick.

pub mod earth;
pub mod markers;
pub mod paths;

use bevy::prelude::*;

use crate::types::SimSet;

use self::earth::EarthPlugin;
use self::paths::OrbitPathPlugin;

pub use self::markers::{NearbyMarker, TrackedMarker};
pub use self::paths::{OrbitPath, OrbitPathSettings};

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((EarthPlugin, OrbitPathPlugin)).add_systems(
            Update,
            markers::sync_tracked_marker.in_set(SimSet::SyncScene),
        );
    }
}
