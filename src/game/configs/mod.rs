pub mod assets;

use avian3d::prelude::SpatialQuery;
use bevy::prelude::*;

use crate::game::{
    parkour::{ParkourConfig, ParkourController},
    player::{AvianParkourHost, ParkourHostData},
};

pub use assets::{ParkourTuning, ParkourTuningLoader};

/// Handle keeping the tuning file loaded (and watched for edits).
#[derive(Resource)]
pub struct ParkourTuningHandle(pub Handle<ParkourTuning>);

/// Tuning in force right now. Defaults until the file loads.
#[derive(Resource, Default, Clone, Debug)]
pub struct ParkourSettings(pub ParkourConfig);

pub(super) fn plugin(app: &mut App) {
    // Register the asset loader for RON config files
    app.init_asset::<ParkourTuning>();
    app.init_asset_loader::<ParkourTuningLoader>();
    app.init_resource::<ParkourSettings>();

    app.add_systems(Startup, load_parkour_tuning);
    app.add_systems(Update, apply_parkour_tuning);
}

fn load_parkour_tuning(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load(ParkourTuning::PATH);
    commands.insert_resource(ParkourTuningHandle(handle));
}

/// Copies freshly loaded or edited tuning into the settings and every live
/// controller.
fn apply_parkour_tuning(
    mut events: MessageReader<AssetEvent<ParkourTuning>>,
    handle: Option<Res<ParkourTuningHandle>>,
    tunings: Res<Assets<ParkourTuning>>,
    mut settings: ResMut<ParkourSettings>,
    spatial: SpatialQuery,
    mut controllers: Query<(&mut ParkourController, ParkourHostData)>,
) {
    let Some(handle) = handle else {
        return;
    };

    let mut changed = false;
    for event in events.read() {
        if event.is_added(&handle.0) || event.is_modified(&handle.0) {
            changed = true;
        }
    }
    if !changed {
        return;
    }
    let Some(tuning) = tunings.get(&handle.0) else {
        return;
    };

    if let Err(err) = tuning.parkour.validate() {
        warn!("Ignoring parkour tuning from {}: {err:#}", ParkourTuning::PATH);
        return;
    }

    info!("Applying parkour tuning from {}", ParkourTuning::PATH);
    settings.0 = tuning.parkour.clone();
    for (mut controller, (entity, mut transform, mut velocity, mut gravity, mut movement)) in
        controllers.iter_mut()
    {
        if let Err(err) = controller.retune(settings.0.clone()) {
            warn!(%entity, "Keeping previous parkour tuning: {err:#}");
            continue;
        }
        let mut host = AvianParkourHost::new(
            entity,
            &mut transform,
            &mut velocity,
            &mut gravity,
            &mut movement,
            &spatial,
        );
        controller.sync_host(&mut host);
    }
}
