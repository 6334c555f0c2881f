use anyhow::ensure;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning constants for the parkour controller.
///
/// Distances, speeds and forces are in engine units (centimetres); the Avian
/// host converts them to metres at its boundary. Durations are in seconds.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkourConfig {
    /// Speed cap while sprinting
    pub sprint_speed: f32,
    /// Speed cap during normal running, also the wall-run entry threshold
    pub normal_speed: f32,
    /// Speed cap while crouched, also the slide threshold
    pub crouch_speed: f32,

    /// Braking deceleration while walking normally
    pub default_deceleration: f32,
    /// Braking deceleration while sliding
    pub slide_deceleration: f32,

    pub wall_run_duration: f32,
    pub wall_climb_duration: f32,
    /// Force applied toward the wall every wall-run tick
    pub wall_run_force: f32,
    /// Upward launch speed applied every wall-climb tick
    pub wall_climb_speed: f32,
    /// Camera roll in degrees while running along a wall
    pub wall_run_camera_roll: f32,

    /// How long after a wall-run ends a chained jump is still allowed
    pub wall_run_jump_grace: f32,
    /// How long after a wall-climb ends a chained jump is still allowed
    pub wall_climb_jump_grace: f32,
    /// Magnitude of the `(forward + up)` chained jump launch
    pub chained_jump_strength: f32,
    /// Extra yaw added when jumping off a climbed wall
    pub vault_turn_degrees: f32,

    /// How long the jump-check poll keeps looking for walls
    pub jump_check_window: f32,
    /// Interval of every repeating poll
    pub poll_interval: f32,

    /// Reach of the forward obstruction ray
    pub forward_reach: f32,
    /// Lateral offset of the left and right wall probes
    pub side_probe_offset: f32,

    /// Enters a wall-climb when the ability is triggered in front of a wall
    /// while grounded. Off unless a level explicitly opts in.
    pub grounded_wall_climb: bool,
}

impl Default for ParkourConfig {
    fn default() -> Self {
        Self {
            sprint_speed: 900.0,
            normal_speed: 600.0,
            crouch_speed: 300.0,
            default_deceleration: 2048.0,
            slide_deceleration: 650.0,
            wall_run_duration: 1.5,
            wall_climb_duration: 1.5,
            wall_run_force: 20_000.0,
            wall_climb_speed: 400.0,
            wall_run_camera_roll: 20.0,
            wall_run_jump_grace: 0.25,
            wall_climb_jump_grace: 0.5,
            chained_jump_strength: 500.0,
            vault_turn_degrees: 360.0 / 2.5,
            jump_check_window: 0.5,
            poll_interval: 1.0 / 60.0,
            forward_reach: 200.0,
            side_probe_offset: 70.0,
            grounded_wall_climb: false,
        }
    }
}

impl ParkourConfig {
    /// Rejects tuning the controller cannot run with: non-finite values,
    /// negative durations and a poll interval that is not positive.
    pub fn validate(&self) -> anyhow::Result<()> {
        let values = [
            ("sprint_speed", self.sprint_speed),
            ("normal_speed", self.normal_speed),
            ("crouch_speed", self.crouch_speed),
            ("default_deceleration", self.default_deceleration),
            ("slide_deceleration", self.slide_deceleration),
            ("wall_run_force", self.wall_run_force),
            ("wall_climb_speed", self.wall_climb_speed),
            ("wall_run_camera_roll", self.wall_run_camera_roll),
            ("chained_jump_strength", self.chained_jump_strength),
            ("vault_turn_degrees", self.vault_turn_degrees),
            ("forward_reach", self.forward_reach),
            ("side_probe_offset", self.side_probe_offset),
        ];
        for (name, value) in values {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }

        let durations = [
            ("wall_run_duration", self.wall_run_duration),
            ("wall_climb_duration", self.wall_climb_duration),
            ("wall_run_jump_grace", self.wall_run_jump_grace),
            ("wall_climb_jump_grace", self.wall_climb_jump_grace),
            ("jump_check_window", self.jump_check_window),
        ];
        for (name, seconds) in durations {
            ensure!(
                seconds.is_finite() && seconds >= 0.0,
                "{name} must be a non-negative number of seconds, got {seconds}"
            );
        }

        ensure!(
            self.poll_interval.is_finite() && self.poll_interval > 0.0,
            "poll_interval must be positive, got {}",
            self.poll_interval
        );
        Ok(())
    }
}
