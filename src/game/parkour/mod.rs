//! Parkour abilities: sprint, crouch-slide, wall-run, wall-climb and chained
//! wall-jumps.
//!
//! The logic lives in [`ParkourController`] and talks to the world only
//! through [`ParkourHost`]. The player module supplies the avian3d host and
//! the systems that drive it.

mod config;
mod controller;
mod host;
mod probes;
mod scheduler;
mod session;
mod state;

use bevy::prelude::*;

pub use config::ParkourConfig;
pub use controller::{ParkourController, ParkourTask};
pub use host::{ParkourHost, RayHit};
pub use probes::{Probe, ProbeFrame, ProbeGeometry};
pub use scheduler::{Scheduler, TimerHandle};
pub use session::{Effect, Observation, Session};
pub use state::{
    ChainedJump, ChainedJumpWindow, LocomotionMode, LocomotionState, SpeedProfile, WallSide,
};

/// Ordering of the fixed-step character pipeline.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkourSystems {
    /// Ground checks and other host state refreshed before the controller runs
    Sense,
    /// Input handling and timer ticks of [`ParkourController`]
    Abilities,
    /// Host commands turned into physics and character-controller input
    Locomotion,
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ParkourConfig>();
    app.configure_sets(
        FixedUpdate,
        (
            ParkourSystems::Sense,
            ParkourSystems::Abilities,
            ParkourSystems::Locomotion,
        )
            .chain(),
    );
}
