//! The game's screens and transitions between them.

use bevy::{asset::LoadState, prelude::*};

use crate::game::configs::{ParkourTuning, ParkourTuningHandle};

/// The game's main screen states.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Screen {
    /// Waits for the parkour tuning file.
    #[default]
    Loading,
    Gameplay,
}

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Screen>();
    app.add_systems(
        Update,
        finish_loading.run_if(in_state(Screen::Loading)),
    );
}

/// Moves on once the tuning file has loaded. A missing or broken file is
/// reported and the defaults stay in force.
fn finish_loading(
    asset_server: Res<AssetServer>,
    handle: Option<Res<ParkourTuningHandle>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let Some(handle) = handle else {
        return;
    };

    match asset_server.load_state(handle.0.id()) {
        LoadState::Loaded => next_screen.set(Screen::Gameplay),
        LoadState::Failed(error) => {
            warn!(
                "Could not load {}, using default parkour tuning: {error}",
                ParkourTuning::PATH
            );
            next_screen.set(Screen::Gameplay);
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}
