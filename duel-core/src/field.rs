//! Field snapshot: the planets and players a flight is simulated against.
//!
//! The protocol layer owns a `Field` and mutates it as world updates arrive;
//! the engine only ever reads it. `revision` increments on every mutation so
//! callers can tell whether a cached solution still refers to the current
//! world.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: u32,
    pub position: Vec2,
    pub radius: f64,
    /// Gravitational constant folded in: acceleration at distance d is
    /// `mass / d^2`, no extra factor.
    pub mass: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub position: Vec2,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Field {
    planets: Vec<Planet>,
    // BTreeMap keeps the per-step hit scan in id order, independent of join
    // order.
    players: BTreeMap<u32, Player>,
    revision: u64,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the planet set wholesale (field reset).
    pub fn set_planets(&mut self, planets: Vec<Planet>) {
        self.planets = planets;
        self.revision += 1;
    }

    /// Insert or move a player. Returns `true` if the player was new.
    pub fn upsert_player(&mut self, id: u32, position: Vec2) -> bool {
        let joined = self
            .players
            .insert(id, Player { id, position })
            .is_none();
        self.revision += 1;
        joined
    }

    pub fn remove_player(&mut self, id: u32) -> Option<Player> {
        let removed = self.players.remove(&id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players other than `id`, in id order.
    pub fn opponents(&self, id: u32) -> impl Iterator<Item = &Player> {
        self.players.values().filter(move |p| p.id != id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
