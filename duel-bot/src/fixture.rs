//! JSON field snapshots for the offline subcommands and tests.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use duel_core::{Field, Planet, Player};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldFixture {
    /// The player the shots originate from.
    pub launcher: u32,
    pub planets: Vec<Planet>,
    pub players: Vec<Player>,
}

impl FieldFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading field fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing field fixture {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("writing field fixture {}", path.display()))
    }

    pub fn to_field(&self) -> Field {
        let mut field = Field::new();
        field.set_planets(self.planets.clone());
        for player in &self.players {
            field.upsert_player(player.id, player.position);
        }
        field
    }
}
