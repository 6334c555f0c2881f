//! Wall probes rigidly attached to the character.

use bevy::prelude::*;

use super::config::ParkourConfig;

/// Detection points, expressed in the character's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Probe {
    Forward,
    Left,
    Right,
}

/// Character pose needed to place the probes in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeFrame {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ProbeGeometry {
    pub forward_reach: f32,
    pub side_offset: f32,
}

impl ProbeGeometry {
    pub fn from_config(config: &ParkourConfig) -> Self {
        Self {
            forward_reach: config.forward_reach,
            side_offset: config.side_probe_offset,
        }
    }

    /// World-space ray target for `probe`. Rays always start at the
    /// character position.
    pub fn point(&self, probe: Probe, frame: &ProbeFrame) -> Vec3 {
        match probe {
            Probe::Forward => frame.position + frame.forward * self.forward_reach,
            Probe::Left => frame.position - frame.right * self.side_offset,
            Probe::Right => frame.position + frame.right * self.side_offset,
        }
    }
}

impl Default for ProbeGeometry {
    fn default() -> Self {
        Self::from_config(&ParkourConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_follow_the_character_frame() {
        let geometry = ProbeGeometry::default();
        let frame = ProbeFrame {
            position: Vec3::new(100.0, 0.0, 0.0),
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        };

        assert_eq!(geometry.point(Probe::Forward, &frame), Vec3::new(100.0, 0.0, -200.0));
        assert_eq!(geometry.point(Probe::Left, &frame), Vec3::new(30.0, 0.0, 0.0));
        assert_eq!(geometry.point(Probe::Right, &frame), Vec3::new(170.0, 0.0, 0.0));
    }
}
