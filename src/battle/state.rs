//! Battle state: the single mutable aggregate of a match

use serde::{Deserialize, Serialize};

use crate::battle::terrain::Terrain;
use crate::battle::units::Unit;
use crate::core::types::{GridCoord, PlayerId, Turn, UnitId};

/// A participant in the battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub ai_controlled: bool,
    /// Mirrors `current_player_index`; maintained by the turn manager
    pub is_active: bool,
}

/// Complete state of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries
    tiles: Vec<Terrain>,
    pub units: Vec<Unit>,
    pub players: Vec<Player>,
    pub turn: Turn,
    pub current_player_index: usize,
}

impl BattleState {
    /// Caller guarantees `tiles.len() == width * height` and a non-empty player list
    pub fn new(
        width: u32,
        height: u32,
        tiles: Vec<Terrain>,
        units: Vec<Unit>,
        mut players: Vec<Player>,
    ) -> Self {
        for (i, player) in players.iter_mut().enumerate() {
            player.is_active = i == 0;
        }
        Self {
            width,
            height,
            tiles,
            units,
            players,
            turn: 1,
            current_player_index: 0,
        }
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    pub fn terrain_at(&self, coord: GridCoord) -> Option<&Terrain> {
        if !self.in_bounds(coord) {
            return None;
        }
        let index = coord.y as usize * self.width as usize + coord.x as usize;
        self.tiles.get(index)
    }

    /// Terrain defense bonus of a tile, 0 off-grid
    pub fn defense_bonus_at(&self, coord: GridCoord) -> f32 {
        self.terrain_at(coord).map_or(0.0, |t| t.defense_bonus)
    }

    pub fn tiles(&self) -> &[Terrain] {
        &self.tiles
    }

    pub fn unit_index(&self, id: &UnitId) -> Option<usize> {
        self.units.iter().position(|u| &u.id == id)
    }

    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| &u.id == id)
    }

    /// Living unit standing on a tile
    pub fn unit_at(&self, coord: GridCoord) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.alive && u.position == coord)
    }

    pub fn unit_index_at(&self, coord: GridCoord) -> Option<usize> {
        self.units
            .iter()
            .position(|u| u.alive && u.position == coord)
    }

    /// True if a living unit other than `ignoring` stands on the tile
    pub fn is_occupied(&self, coord: GridCoord, ignoring: Option<&UnitId>) -> bool {
        self.units
            .iter()
            .any(|u| u.alive && u.position == coord && Some(&u.id) != ignoring)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn current_player_id(&self) -> Option<&PlayerId> {
        self.current_player().map(|p| &p.id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }

    /// Indices of living units owned by a player
    pub fn living_unit_indices_of(&self, owner: &PlayerId) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.alive && &u.owner_id == owner)
            .map(|(i, _)| i)
            .collect()
    }

    /// Mutable access to two distinct units at once
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Unit, &mut Unit)> {
        if a == b || a >= self.units.len() || b >= self.units.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.units.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    /// Keep `Player::is_active` in sync with the current index
    pub(crate) fn sync_active_flags(&mut self) {
        let current = self.current_player_index;
        for (i, player) in self.players.iter_mut().enumerate() {
            player.is_active = i == current;
        }
    }
}
