//! Gameplay: the parkour controller, the player that hosts it, and a level
//! to try it in.

pub mod camera_controller;
pub mod configs;
pub mod parkour;
pub mod player;
mod scene;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        parkour::plugin,
        configs::plugin,
        scene::plugin,
        player::plugin,
        camera_controller::plugin,
    ));
}
