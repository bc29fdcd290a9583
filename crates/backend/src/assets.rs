use anyhow::{Context, Result};
use police_map_shared::models::StationType;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Assets {
    pub station_types: Vec<StationType>,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self> {
        let types_path = assets_dir.join("station_types.json");

        let types_data = std::fs::read_to_string(&types_path)
            .with_context(|| format!("Failed to read {}", types_path.display()))?;
        let station_types: Vec<StationType> = serde_json::from_str(&types_data)
            .context("Failed to parse station_types.json")?;

        tracing::info!(station_types = station_types.len(), "Loaded assets");

        Ok(Assets { station_types })
    }

    pub fn find_type(&self, code: &str) -> Option<&StationType> {
        self.station_types.iter().find(|t| t.code == code)
    }
}
