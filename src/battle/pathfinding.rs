//! Movement and attack ranges on the battle grid
//!
//! Respects terrain costs, per-unit movement traits and occupancy.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, VecDeque};

use ahash::AHashMap;

use crate::battle::state::BattleState;
use crate::battle::units::Unit;
use crate::core::types::{GridCoord, UnitId};
use crate::skills::effects::{
    can_fly, effective_move, effective_range, ignores_terrain, is_terrain_master,
};

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: GridCoord,
    f_cost: u32, // g_cost + heuristic
    order: u64,  // insertion sequence, breaks f ties
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.order == other.order
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost for `unit` to step onto `coord`; `None` off the grid
pub fn step_cost(state: &BattleState, unit: &Unit, coord: GridCoord) -> Option<u32> {
    let terrain = state.terrain_at(coord)?;
    if can_fly(unit) || ignores_terrain(unit) {
        return Some(1);
    }
    if is_terrain_master(unit) {
        return Some(terrain.move_cost.saturating_sub(1).max(1));
    }
    Some(terrain.move_cost)
}

/// Every tile the unit can end its move on this turn, origin excluded
pub fn movable_area(state: &BattleState, unit_id: &UnitId) -> BTreeSet<GridCoord> {
    let mut area = BTreeSet::new();
    let Some(unit) = state.unit(unit_id).filter(|u| u.alive) else {
        return area;
    };
    let budget = effective_move(unit);
    if budget == 0 {
        return area;
    }

    let origin = unit.position;
    let mut best_cost: AHashMap<GridCoord, u32> = AHashMap::new();
    let mut queue = VecDeque::new();
    best_cost.insert(origin, 0);
    queue.push_back((origin, 0u32));

    while let Some((current, cost)) = queue.pop_front() {
        // A cheaper route reached this tile after it was queued
        if best_cost.get(&current).is_some_and(|&best| best < cost) {
            continue;
        }
        for neighbor in current.neighbors() {
            let Some(step) = step_cost(state, unit, neighbor) else {
                continue;
            };
            let total = cost.saturating_add(step);
            if total > budget {
                continue;
            }
            if state.is_occupied(neighbor, Some(unit_id)) {
                continue;
            }
            if best_cost.get(&neighbor).is_some_and(|&best| best <= total) {
                continue;
            }
            best_cost.insert(neighbor, total);
            queue.push_back((neighbor, total));
        }
    }

    area.extend(best_cost.into_keys().filter(|&c| c != origin));
    area
}

/// Find path using A* with a Manhattan heuristic
///
/// The returned path starts at the tile after `from` and ends at `to`.
/// Returns None if no path fits within the unit's move budget.
pub fn find_path(
    state: &BattleState,
    from: GridCoord,
    to: GridCoord,
    unit_id: &UnitId,
) -> Option<Vec<GridCoord>> {
    let unit = state.unit(unit_id).filter(|u| u.alive)?;
    if !state.in_bounds(from) || !state.in_bounds(to) {
        return None;
    }
    if from == to {
        return Some(Vec::new());
    }
    let budget = effective_move(unit);

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<GridCoord, GridCoord> = AHashMap::new();
    let mut g_scores: AHashMap<GridCoord, u32> = AHashMap::new();
    let mut order = 0u64;

    g_scores.insert(from, 0);
    open_set.push(PathNode {
        coord: from,
        f_cost: from.distance(&to),
        order,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == to {
            return Some(reconstruct_path(&came_from, from, to));
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(current.coord.distance(&to)) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            let Some(step) = step_cost(state, unit, neighbor) else {
                continue;
            };
            if neighbor != to && state.is_occupied(neighbor, Some(unit_id)) {
                continue;
            }

            let tentative_g = current_g.saturating_add(step);
            if tentative_g > budget {
                continue;
            }
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                order += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance(&to),
                    order,
                });
            }
        }
    }

    None // No path within budget
}

/// Reconstruct path from came_from map, excluding the start tile
fn reconstruct_path(
    came_from: &AHashMap<GridCoord, GridCoord>,
    start: GridCoord,
    mut current: GridCoord,
) -> Vec<GridCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Sum of step costs along a path for a unit
pub fn path_cost(state: &BattleState, unit: &Unit, path: &[GridCoord]) -> u32 {
    path.iter()
        .filter_map(|&coord| step_cost(state, unit, coord))
        .sum()
}

/// Tiles at Manhattan distance `1..=effective range`, ignoring terrain and occupancy
pub fn attackable_area(state: &BattleState, unit_id: &UnitId) -> BTreeSet<GridCoord> {
    let mut area = BTreeSet::new();
    let Some(unit) = state.unit(unit_id).filter(|u| u.alive) else {
        return area;
    };
    let range = effective_range(unit);
    if range == 0 {
        return area;
    }

    let origin = unit.position;
    let mut visited: BTreeSet<GridCoord> = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(origin);
    queue.push_back((origin, 0u32));

    while let Some((current, distance)) = queue.pop_front() {
        if distance == range {
            continue;
        }
        for neighbor in current.neighbors() {
            if !state.in_bounds(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            area.insert(neighbor);
            queue.push_back((neighbor, distance + 1));
        }
    }
    area
}
