use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::game::parkour::ParkourConfig;

/// Parkour tuning loaded from a RON file
#[derive(Asset, Reflect, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkourTuning {
    /// Constants handed to every `ParkourController`
    pub parkour: ParkourConfig,
}

impl ParkourTuning {
    /// Path to the parkour tuning file
    pub const PATH: &'static str = "config/parkour.ron";
}

/// Asset loader for ParkourTuning RON files
#[derive(Default, TypePath)]
pub struct ParkourTuningLoader;

impl AssetLoader for ParkourTuningLoader {
    type Asset = ParkourTuning;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let tuning: ParkourTuning = ron::de::from_bytes(&bytes)?;
        tuning.parkour.validate()?;
        Ok(tuning)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_tuning_parses() {
        let source = include_str!("../../../assets/config/parkour.ron");
        let tuning: ParkourTuning = ron::de::from_str(source).unwrap();
        assert_eq!(tuning.parkour, ParkourConfig::default());
    }
}
