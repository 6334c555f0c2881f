//! The wall-interaction state machine.
//!
//! [`Session::step`] is a pure function of the current session and what the
//! probes saw this tick. It returns the next session together with the one
//! side effect the controller has to perform.

use bevy::prelude::*;

use super::{config::ParkourConfig, state::WallSide};

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub enum Session {
    #[default]
    Idle,
    /// Jump check started by a grounded ability trigger. Jumps when the way
    /// ahead is clear, then keeps watching for walls while falling.
    Polling { polls: u32, jumped: bool },
    WallRunning { side: WallSide, polls: u32 },
    WallClimbing { polls: u32 },
}

impl Session {
    pub fn polling() -> Self {
        Session::Polling {
            polls: 0,
            jumped: false,
        }
    }

    pub fn is_wall_session(&self) -> bool {
        matches!(self, Session::WallRunning { .. } | Session::WallClimbing { .. })
    }

    /// Advances the session by one poll. `interval` is the period in seconds
    /// of the timer that fired it.
    pub fn step(
        self,
        observation: &Observation,
        config: &ParkourConfig,
        interval: f32,
    ) -> (Session, Effect) {
        match self {
            Session::Idle => (Session::Idle, Effect::None),
            Session::Polling { polls, jumped } => {
                let polls = polls + 1;
                let mut effect = Effect::None;
                let mut jumped = jumped;

                if !observation.falling {
                    if !observation.forward_hit {
                        if !jumped {
                            effect = Effect::Jump;
                        }
                        jumped = true;
                    } else if config.grounded_wall_climb {
                        return (Session::WallClimbing { polls: 0 }, Effect::EnterWallClimb);
                    }
                } else if observation.speed < config.normal_speed {
                    if let Some(side) = WallSide::pick(observation.left_hit, observation.right_hit) {
                        return (
                            Session::WallRunning { side, polls: 0 },
                            Effect::EnterWallRun(side),
                        );
                    }
                }

                if polls as f32 > polls_in(config.jump_check_window, interval) {
                    (Session::Idle, effect)
                } else {
                    (Session::Polling { polls, jumped }, effect)
                }
            }
            Session::WallRunning { side, polls } => {
                let polls = polls + 1;
                if observation.side_hit(side)
                    && (polls as f32) < polls_in(config.wall_run_duration, interval)
                {
                    (Session::WallRunning { side, polls }, Effect::PushTowardWall(side))
                } else {
                    (Session::Idle, Effect::EndWallRun)
                }
            }
            Session::WallClimbing { polls } => {
                let polls = polls + 1;
                if observation.forward_hit
                    && (polls as f32) < polls_in(config.wall_climb_duration, interval)
                {
                    (Session::WallClimbing { polls }, Effect::ClimbLift)
                } else {
                    (Session::Idle, Effect::EndWallClimb)
                }
            }
        }
    }
}

/// How many polls of `interval` fit in `limit` seconds. A ratio within a
/// thousandth of a whole number snaps to it, so 1.5 s of 1/60 s polls is
/// exactly 90 polls and not 90.00001.
fn polls_in(limit: f32, interval: f32) -> f32 {
    let polls = limit / interval;
    let whole = polls.round();
    if (polls - whole).abs() < POLL_SNAP {
        whole
    } else {
        polls
    }
}

const POLL_SNAP: f32 = 1e-3;

/// What the probes reported on one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observation {
    pub falling: bool,
    pub speed: f32,
    pub forward_hit: bool,
    pub left_hit: bool,
    pub right_hit: bool,
}

impl Observation {
    pub fn side_hit(&self, side: WallSide) -> bool {
        match side {
            WallSide::Left => self.left_hit,
            WallSide::Right => self.right_hit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    None,
    Jump,
    EnterWallRun(WallSide),
    PushTowardWall(WallSide),
    EnterWallClimb,
    ClimbLift,
    EndWallRun,
    EndWallClimb,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.25;

    fn airborne(speed: f32) -> Observation {
        Observation {
            falling: true,
            speed,
            ..default()
        }
    }

    #[test]
    fn grounded_poll_jumps_once_when_clear() {
        let config = ParkourConfig::default();
        let grounded = Observation::default();

        let (next, effect) = Session::polling().step(&grounded, &config, DT);
        assert_eq!(effect, Effect::Jump);
        assert_eq!(next, Session::Polling { polls: 1, jumped: true });

        let (_, effect) = next.step(&grounded, &config, DT);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn obstructed_grounded_poll_does_not_climb_by_default() {
        let config = ParkourConfig::default();
        let blocked = Observation {
            forward_hit: true,
            ..default()
        };

        let (next, effect) = Session::polling().step(&blocked, &config, DT);
        assert_eq!(effect, Effect::None);
        assert!(matches!(next, Session::Polling { jumped: false, .. }));

        let climbing = ParkourConfig {
            grounded_wall_climb: true,
            ..default()
        };
        let (next, effect) = Session::polling().step(&blocked, &climbing, DT);
        assert_eq!(effect, Effect::EnterWallClimb);
        assert_eq!(next, Session::WallClimbing { polls: 0 });
    }

    #[test]
    fn falling_poll_starts_wall_run_on_the_right_first() {
        let config = ParkourConfig::default();
        let observation = Observation {
            left_hit: true,
            right_hit: true,
            ..airborne(300.0)
        };

        let (next, effect) = Session::polling().step(&observation, &config, DT);
        assert_eq!(effect, Effect::EnterWallRun(WallSide::Right));
        assert_eq!(
            next,
            Session::WallRunning {
                side: WallSide::Right,
                polls: 0
            }
        );
    }

    #[test]
    fn fast_fall_ignores_walls() {
        let config = ParkourConfig::default();
        let observation = Observation {
            left_hit: true,
            ..airborne(600.0)
        };

        let (next, effect) = Session::polling().step(&observation, &config, DT);
        assert_eq!(effect, Effect::None);
        assert!(matches!(next, Session::Polling { .. }));
    }

    #[test]
    fn poll_expires_after_the_jump_check_window() {
        let config = ParkourConfig::default();
        let mut session = Session::polling();
        let observation = airborne(900.0);

        for _ in 0..2 {
            session = session.step(&observation, &config, DT).0;
            assert!(matches!(session, Session::Polling { .. }));
        }
        session = session.step(&observation, &config, DT).0;
        assert_eq!(session, Session::Idle);
    }

    #[test]
    fn wall_run_ends_at_max_duration() {
        let config = ParkourConfig::default();
        let observation = Observation {
            right_hit: true,
            ..airborne(0.0)
        };
        let mut session = Session::WallRunning {
            side: WallSide::Right,
            polls: 0,
        };

        // 1.5s of 0.25s polls: five pushes, then the sixth poll reaches the limit.
        for _ in 0..5 {
            let (next, effect) = session.step(&observation, &config, DT);
            assert_eq!(effect, Effect::PushTowardWall(WallSide::Right));
            session = next;
        }
        let (next, effect) = session.step(&observation, &config, DT);
        assert_eq!(effect, Effect::EndWallRun);
        assert_eq!(next, Session::Idle);
    }

    #[test]
    fn wall_run_ends_when_the_bound_probe_loses_the_wall() {
        let config = ParkourConfig::default();
        // The other side still touching a wall does not keep the run alive.
        let observation = Observation {
            left_hit: true,
            ..airborne(0.0)
        };
        let session = Session::WallRunning {
            side: WallSide::Right,
            polls: 0,
        };

        assert_eq!(session.step(&observation, &config, DT).1, Effect::EndWallRun);
    }

    #[test]
    fn wall_climb_lifts_until_the_wall_ends() {
        let config = ParkourConfig::default();
        let wall = Observation {
            forward_hit: true,
            ..airborne(0.0)
        };

        let (next, effect) = Session::WallClimbing { polls: 0 }.step(&wall, &config, DT);
        assert_eq!(effect, Effect::ClimbLift);

        let (next, effect) = next.step(&airborne(0.0), &config, DT);
        assert_eq!(effect, Effect::EndWallClimb);
        assert_eq!(next, Session::Idle);
    }

    #[test]
    fn wall_run_at_sixty_hertz_ends_on_the_ninetieth_poll() {
        let config = ParkourConfig::default();
        let observation = Observation {
            right_hit: true,
            ..airborne(0.0)
        };
        let mut session = Session::WallRunning {
            side: WallSide::Right,
            polls: 0,
        };

        let mut pushes = 0;
        loop {
            let (next, effect) = session.step(&observation, &config, config.poll_interval);
            session = next;
            if effect != Effect::PushTowardWall(WallSide::Right) {
                assert_eq!(effect, Effect::EndWallRun);
                break;
            }
            pushes += 1;
        }
        assert_eq!(pushes, 89);
    }

    #[test]
    fn jump_check_at_sixty_hertz_lasts_thirty_polls() {
        let config = ParkourConfig::default();
        let observation = airborne(900.0);
        let mut session = Session::polling();

        for _ in 0..30 {
            session = session.step(&observation, &config, config.poll_interval).0;
            assert!(matches!(session, Session::Polling { .. }));
        }
        session = session.step(&observation, &config, config.poll_interval).0;
        assert_eq!(session, Session::Idle);
    }

    #[test]
    fn uneven_interval_rounds_the_run_up() {
        let config = ParkourConfig::default();
        let observation = Observation {
            right_hit: true,
            ..airborne(0.0)
        };
        // 0.7 s polls: still running at 1.4 s, over at 2.1 s.
        let session = Session::WallRunning {
            side: WallSide::Right,
            polls: 1,
        };
        let (next, effect) = session.step(&observation, &config, 0.7);
        assert_eq!(effect, Effect::PushTowardWall(WallSide::Right));
        assert_eq!(next.step(&observation, &config, 0.7).1, Effect::EndWallRun);
    }
}
