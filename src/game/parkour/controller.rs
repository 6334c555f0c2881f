use std::time::Duration;

use bevy::prelude::*;
use tracing::{debug, info, warn};

use super::{
    config::ParkourConfig,
    host::ParkourHost,
    probes::{Probe, ProbeFrame, ProbeGeometry},
    scheduler::{Scheduler, TimerHandle},
    session::{Effect, Observation, Session},
    state::{ChainedJump, ChainedJumpWindow, LocomotionMode, LocomotionState, SpeedProfile, WallSide},
};

/// Work the controller schedules on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkourTask {
    JumpCheck,
    WallRun(WallSide),
    WallClimb,
    ChainedJumpExpiry,
}

impl ParkourTask {
    fn for_session(session: &Session) -> Option<Self> {
        match session {
            Session::Idle => None,
            Session::Polling { .. } => Some(Self::JumpCheck),
            Session::WallRunning { side, .. } => Some(Self::WallRun(*side)),
            Session::WallClimbing { .. } => Some(Self::WallClimb),
        }
    }
}

/// Sprint, crouch-slide, wall-run, wall-climb and chained wall-jumps for one
/// character.
///
/// Input handlers and [`tick`](Self::tick) take the host explicitly; the
/// controller keeps no reference to it between calls.
#[derive(Component, Debug)]
pub struct ParkourController {
    config: ParkourConfig,
    speeds: SpeedProfile,
    probes: ProbeGeometry,
    state: LocomotionState,
    session: Session,
    window: ChainedJumpWindow,
    scheduler: Scheduler<ParkourTask>,
    session_timer: Option<TimerHandle>,
    /// Period in seconds the session timer was armed with.
    session_interval: f32,
    window_timer: Option<TimerHandle>,
    sprint_held: bool,
    max_speed: f32,
    deceleration: f32,
}

impl Default for ParkourController {
    fn default() -> Self {
        Self::new(ParkourConfig::default())
    }
}

impl ParkourController {
    pub fn new(config: ParkourConfig) -> Self {
        Self {
            speeds: SpeedProfile::from_config(&config),
            probes: ProbeGeometry::from_config(&config),
            state: LocomotionState::default(),
            session: Session::Idle,
            window: ChainedJumpWindow::default(),
            scheduler: Scheduler::default(),
            session_timer: None,
            session_interval: config.poll_interval,
            window_timer: None,
            sprint_held: false,
            max_speed: config.normal_speed,
            deceleration: config.default_deceleration,
            config,
        }
    }

    pub fn config(&self) -> &ParkourConfig {
        &self.config
    }

    /// Swaps in new tuning. Running timers keep their interval until they
    /// are re-armed. Invalid tuning is rejected and the current tuning kept.
    pub fn retune(&mut self, config: ParkourConfig) -> anyhow::Result<()> {
        config.validate()?;
        self.speeds = SpeedProfile::from_config(&config);
        self.probes = ProbeGeometry::from_config(&config);
        if !self.state.sliding {
            self.deceleration = config.default_deceleration;
        }
        self.config = config;
        self.max_speed = self.speeds.select(&self.state, self.sprint_held && self.can_sprint());
        Ok(())
    }

    /// Pushes the current speed cap and deceleration to the host.
    pub fn sync_host(&self, host: &mut impl ParkourHost) {
        host.set_max_speed(self.max_speed);
        host.set_braking_deceleration(self.deceleration);
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn mode(&self) -> LocomotionMode {
        self.state.mode()
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn chained_jump_window(&self) -> ChainedJumpWindow {
        self.window
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn deceleration(&self) -> f32 {
        self.deceleration
    }

    pub fn is_session_timer_active(&self) -> bool {
        self.session_timer
            .is_some_and(|handle| self.scheduler.is_active(handle))
    }

    pub fn is_window_timer_active(&self) -> bool {
        self.window_timer
            .is_some_and(|handle| self.scheduler.is_active(handle))
    }

    pub fn is_left_wall_running(&self) -> bool {
        self.state.wall_running_left
    }

    pub fn is_right_wall_running(&self) -> bool {
        self.state.wall_running_right
    }

    pub fn is_wall_climbing(&self) -> bool {
        self.state.wall_climbing
    }

    pub fn is_sliding(&self) -> bool {
        self.state.sliding
    }

    pub fn is_crouching(&self) -> bool {
        self.state.crouching
    }

    pub fn can_move(&self) -> bool {
        self.state.can_move()
    }

    pub fn can_sprint(&self) -> bool {
        self.state.can_sprint()
    }

    pub fn move_forward(&mut self, host: &mut impl ParkourHost, amount: f32) {
        if self.can_move() {
            let forward = host.forward();
            host.add_movement_input(forward, amount);
        }
        self.state.moving_forward = amount > 0.0;
    }

    pub fn move_right(&mut self, host: &mut impl ParkourHost, amount: f32) {
        if self.can_move() {
            let right = host.right();
            host.add_movement_input(right, amount);
        }
    }

    pub fn sprint(&mut self, host: &mut impl ParkourHost, amount: f32) {
        self.sprint_held = amount >= 1.0;
        self.refresh_speed_cap(host);
    }

    fn refresh_speed_cap(&mut self, host: &mut impl ParkourHost) {
        let sprinting = self.sprint_held && self.can_sprint();
        let cap = self.speeds.select(&self.state, sprinting);
        if cap != self.max_speed {
            debug!(from = self.max_speed, to = cap, "speed cap changed");
            self.max_speed = cap;
            host.set_max_speed(cap);
        }
    }

    /// Fed every frame with the crouch input.
    pub fn crouch_slide(&mut self, host: &mut impl ParkourHost, amount: f32) {
        let speed = host.speed();
        let slow = speed < self.config.crouch_speed;
        let can_crouch = !self.state.crouching && host.can_crouch();

        if !can_crouch && slow && self.state.sliding {
            self.stop_sliding(host);
        }

        if amount >= 1.0 {
            if can_crouch {
                host.crouch();
                self.state.crouching = true;
                if speed > self.config.crouch_speed {
                    self.deceleration = self.config.slide_deceleration;
                    host.set_braking_deceleration(self.deceleration);
                    self.state.sliding = true;
                    info!(speed, "slide started");
                }
            }
        } else if self.state.crouching && slow {
            // A released slide keeps going until it has bled off its speed.
            host.uncrouch();
            self.state.crouching = false;
        }

        self.refresh_speed_cap(host);
    }

    fn stop_sliding(&mut self, host: &mut impl ParkourHost) {
        self.state.sliding = false;
        self.deceleration = self.config.default_deceleration;
        host.set_braking_deceleration(self.deceleration);
        debug!("slide ended");
    }

    /// Ability trigger: starts the jump check on the ground, or spends a
    /// chained-jump grant in the air.
    pub fn parkour(&mut self, host: &mut impl ParkourHost) {
        if !host.is_falling() {
            self.interrupt(host);
            self.arm(Session::polling());
            return;
        }

        let Some(jump) = self.window.consume() else {
            return;
        };
        if jump == ChainedJump::FromWallClimb {
            host.add_yaw(self.config.vault_turn_degrees);
        }
        let launch = (host.forward() + Vec3::Y) * self.config.chained_jump_strength;
        host.launch(launch, true, true);
        info!(?jump, "chained jump");
    }

    /// Ends an active wall-run or wall-climb right away.
    pub fn un_parkour(&mut self, host: &mut impl ParkourHost) {
        if self.session.is_wall_session() && self.is_session_timer_active() {
            self.interrupt(host);
        }
    }

    fn interrupt(&mut self, host: &mut impl ParkourHost) {
        match self.session {
            Session::WallRunning { .. } => self.apply(host, Effect::EndWallRun),
            Session::WallClimbing { .. } => self.apply(host, Effect::EndWallClimb),
            Session::Idle | Session::Polling { .. } => {}
        }
        self.transition(Session::Idle);
    }

    /// Advances every timer by `delta` and runs whatever fell due.
    pub fn tick(&mut self, host: &mut impl ParkourHost, delta: Duration) {
        self.scheduler.advance(delta);
        while let Some((handle, task)) = self.scheduler.pop_due() {
            match task {
                ParkourTask::ChainedJumpExpiry => {
                    if self.window_timer == Some(handle) {
                        self.window_timer = None;
                        self.window.close();
                        debug!("chained jump window closed");
                    }
                }
                _ if self.session_timer == Some(handle) => self.poll(host),
                _ => {}
            }
        }
    }

    fn poll(&mut self, host: &mut impl ParkourHost) {
        let observation = self.observe(host);
        let (next, effect) = self
            .session
            .step(&observation, &self.config, self.session_interval);
        self.apply(host, effect);
        self.transition(next);
    }

    fn observe(&self, host: &impl ParkourHost) -> Observation {
        let frame = ProbeFrame {
            position: host.position(),
            forward: host.forward(),
            right: host.right(),
        };
        let hits = |probe| {
            host.raycast(frame.position, self.probes.point(probe, &frame))
                .is_some()
        };

        Observation {
            falling: host.is_falling(),
            speed: host.speed(),
            forward_hit: hits(Probe::Forward),
            left_hit: hits(Probe::Left),
            right_hit: hits(Probe::Right),
        }
    }

    fn apply(&mut self, host: &mut impl ParkourHost, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Jump => {
                debug!("jump check clear, jumping");
                host.jump();
            }
            Effect::EnterWallRun(side) => {
                host.launch(Vec3::ZERO, true, true);
                host.set_gravity_scale(0.0);
                host.set_plane_constraint(Some(Dir3::Y));
                host.set_camera_roll(-side.sign() * self.config.wall_run_camera_roll);
                self.state.set_wall_run(Some(side));
                self.state.wall_climbing = false;
                info!(?side, "wall run started");
            }
            Effect::PushTowardWall(side) => {
                let force = host.right() * side.sign() * self.config.wall_run_force;
                host.add_force(force);
            }
            Effect::EnterWallClimb => {
                self.state.set_wall_run(None);
                self.state.wall_climbing = true;
                info!("wall climb started");
            }
            Effect::ClimbLift => {
                host.launch(Vec3::Y * self.config.wall_climb_speed, true, true);
            }
            Effect::EndWallRun => {
                host.set_camera_roll(0.0);
                host.set_gravity_scale(1.0);
                host.set_plane_constraint(None);
                self.state.set_wall_run(None);
                self.open_window(ChainedJump::FromWallRun);
                info!("wall run ended");
            }
            Effect::EndWallClimb => {
                self.state.wall_climbing = false;
                self.open_window(ChainedJump::FromWallClimb);
                info!("wall climb ended");
            }
        }
    }

    fn open_window(&mut self, kind: ChainedJump) {
        let grace = match kind {
            ChainedJump::FromWallRun => {
                self.window.from_wall_run = true;
                self.config.wall_run_jump_grace
            }
            ChainedJump::FromWallClimb => {
                self.window.from_wall_climb = true;
                self.config.wall_climb_jump_grace
            }
        };

        if let Some(handle) = self.window_timer.take() {
            self.scheduler.cancel(handle);
        }
        let grace = Duration::try_from_secs_f32(grace).unwrap_or_else(|err| {
            warn!(%err, grace, "bad chained jump grace, closing the window next tick");
            Duration::ZERO
        });
        self.window_timer = Some(self.scheduler.schedule(
            ParkourTask::ChainedJumpExpiry,
            grace,
            false,
        ));
    }

    /// Moves to `next`, swapping the session timer when the kind of work
    /// changes.
    fn transition(&mut self, next: Session) {
        if ParkourTask::for_session(&self.session) == ParkourTask::for_session(&next) {
            self.session = next;
        } else {
            self.arm(next);
        }
    }

    /// Enters `next` with a freshly armed session timer.
    fn arm(&mut self, next: Session) {
        let previous = std::mem::replace(&mut self.session, next);
        if let Some(handle) = self.session_timer.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(task) = ParkourTask::for_session(&next) {
            let (interval, seconds) = self.poll_period();
            self.session_interval = seconds;
            self.session_timer = Some(self.scheduler.schedule(task, interval, true));
        }
        debug!(?previous, ?next, "parkour session changed");
    }

    fn poll_period(&self) -> (Duration, f32) {
        let seconds = self.config.poll_interval;
        match Duration::try_from_secs_f32(seconds) {
            Ok(interval) if !interval.is_zero() => (interval, seconds),
            _ => {
                let fallback = ParkourConfig::default().poll_interval;
                warn!(seconds, fallback, "bad poll interval, using the default");
                (Duration::from_secs_f32(fallback), fallback)
            }
        }
    }
}
