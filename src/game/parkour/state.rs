use bevy::prelude::*;

use super::config::ParkourConfig;

/// Side of the character a wall was detected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Resolves the two side probes into a wall. The right probe wins when
    /// both hit.
    pub fn pick(left_hit: bool, right_hit: bool) -> Option<Self> {
        match (left_hit, right_hit) {
            (_, true) => Some(Self::Right),
            (true, false) => Some(Self::Left),
            (false, false) => None,
        }
    }

    /// +1 for right, -1 for left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Locomotion flags of one character.
///
/// The flags are mutually exclusive by convention: wall-running and
/// wall-climbing are never set together and only one wall-run side is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct LocomotionState {
    pub moving_forward: bool,
    pub sliding: bool,
    pub crouching: bool,
    pub wall_running_left: bool,
    pub wall_running_right: bool,
    pub wall_climbing: bool,
    /// Reserved for ledge hangs; nothing enters it yet.
    pub hanging: bool,
}

impl LocomotionState {
    pub fn is_wall_running(&self) -> bool {
        self.wall_running_left || self.wall_running_right
    }

    /// Directional input is ignored while sliding or attached to a wall.
    pub fn can_move(&self) -> bool {
        !self.sliding && !self.is_wall_running() && !self.wall_climbing
    }

    pub fn can_sprint(&self) -> bool {
        self.moving_forward && !self.sliding && !self.crouching && !self.is_wall_running()
    }

    pub fn wall_run_side(&self) -> Option<WallSide> {
        if self.wall_running_right {
            Some(WallSide::Right)
        } else if self.wall_running_left {
            Some(WallSide::Left)
        } else {
            None
        }
    }

    pub fn set_wall_run(&mut self, side: Option<WallSide>) {
        self.wall_running_left = side == Some(WallSide::Left);
        self.wall_running_right = side == Some(WallSide::Right);
    }

    pub fn mode(&self) -> LocomotionMode {
        match self.wall_run_side() {
            Some(WallSide::Left) => return LocomotionMode::WallRunLeft,
            Some(WallSide::Right) => return LocomotionMode::WallRunRight,
            None => {}
        }
        if self.wall_climbing {
            LocomotionMode::WallClimb
        } else if self.sliding {
            LocomotionMode::Slide
        } else if self.crouching {
            LocomotionMode::Crouch
        } else {
            LocomotionMode::Normal
        }
    }
}

/// Single-value summary of [`LocomotionState`], used for logging and debug
/// overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum LocomotionMode {
    #[default]
    Normal,
    Crouch,
    Slide,
    WallRunLeft,
    WallRunRight,
    WallClimb,
}

/// Chained-jump grants, one per kind of wall interaction. Each grant is
/// consumed by a single airborne launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ChainedJumpWindow {
    pub from_wall_run: bool,
    pub from_wall_climb: bool,
}

/// Which grant a chained jump used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainedJump {
    FromWallClimb,
    FromWallRun,
}

impl ChainedJumpWindow {
    pub fn is_open(&self) -> bool {
        self.from_wall_run || self.from_wall_climb
    }

    /// Takes one grant, climb before run.
    pub fn consume(&mut self) -> Option<ChainedJump> {
        if self.from_wall_climb {
            self.from_wall_climb = false;
            Some(ChainedJump::FromWallClimb)
        } else if self.from_wall_run {
            self.from_wall_run = false;
            Some(ChainedJump::FromWallRun)
        } else {
            None
        }
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }
}

/// The three speed caps of a character.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SpeedProfile {
    pub sprint: f32,
    pub normal: f32,
    pub crouch: f32,
}

impl SpeedProfile {
    pub fn from_config(config: &ParkourConfig) -> Self {
        Self {
            sprint: config.sprint_speed,
            normal: config.normal_speed,
            crouch: config.crouch_speed,
        }
    }

    /// Cap for the given state. A slide keeps the normal cap so the
    /// character carries its momentum into the crouch.
    pub fn select(&self, state: &LocomotionState, sprinting: bool) -> f32 {
        if state.crouching && !state.sliding {
            self.crouch
        } else if sprinting {
            self.sprint
        } else {
            self.normal
        }
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::from_config(&ParkourConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every combination of the seven flags, including ones the controller
    /// never produces.
    fn every_state() -> impl Iterator<Item = LocomotionState> {
        (0u8..128).map(|bits| LocomotionState {
            moving_forward: bits & 1 != 0,
            sliding: bits & 2 != 0,
            crouching: bits & 4 != 0,
            wall_running_left: bits & 8 != 0,
            wall_running_right: bits & 16 != 0,
            wall_climbing: bits & 32 != 0,
            hanging: bits & 64 != 0,
        })
    }

    #[test]
    fn can_move_iff_not_sliding_wall_running_or_climbing() {
        for state in every_state() {
            let expected = !state.sliding
                && !state.wall_running_left
                && !state.wall_running_right
                && !state.wall_climbing;
            assert_eq!(state.can_move(), expected, "{state:?}");
        }
    }

    #[test]
    fn can_sprint_iff_moving_forward_and_upright_off_the_wall() {
        for state in every_state() {
            let expected = state.moving_forward
                && !state.sliding
                && !state.crouching
                && !state.wall_running_left
                && !state.wall_running_right;
            assert_eq!(state.can_sprint(), expected, "{state:?}");
        }
    }

    #[test]
    fn right_probe_wins_ties() {
        assert_eq!(WallSide::pick(true, true), Some(WallSide::Right));
        assert_eq!(WallSide::pick(true, false), Some(WallSide::Left));
        assert_eq!(WallSide::pick(false, true), Some(WallSide::Right));
        assert_eq!(WallSide::pick(false, false), None);
    }

    #[test]
    fn set_wall_run_keeps_one_side() {
        let mut state = LocomotionState::default();
        state.set_wall_run(Some(WallSide::Left));
        assert!(state.wall_running_left && !state.wall_running_right);
        state.set_wall_run(Some(WallSide::Right));
        assert!(!state.wall_running_left && state.wall_running_right);
        state.set_wall_run(None);
        assert!(!state.is_wall_running());
    }

    #[test]
    fn window_consumes_climb_first() {
        let mut window = ChainedJumpWindow {
            from_wall_run: true,
            from_wall_climb: true,
        };
        assert_eq!(window.consume(), Some(ChainedJump::FromWallClimb));
        assert_eq!(window.consume(), Some(ChainedJump::FromWallRun));
        assert_eq!(window.consume(), None);
        assert!(!window.is_open());
    }

    #[test]
    fn speed_profile_selection() {
        let profile = SpeedProfile::default();
        let mut state = LocomotionState::default();
        assert_eq!(profile.select(&state, false), 600.0);
        assert_eq!(profile.select(&state, true), 900.0);

        state.crouching = true;
        assert_eq!(profile.select(&state, true), 300.0);

        state.sliding = true;
        assert_eq!(profile.select(&state, false), 600.0);
    }

    #[test]
    fn mode_prefers_wall_interactions() {
        let state = LocomotionState {
            crouching: true,
            wall_running_left: true,
            ..default()
        };
        assert_eq!(state.mode(), LocomotionMode::WallRunLeft);
        assert_eq!(LocomotionState::default().mode(), LocomotionMode::Normal);
    }
}
