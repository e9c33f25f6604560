//! A* pathfinding over a tile map.
//!
//! The search moves in eight directions: orthogonal steps cost `1` and diagonal steps cost `√2`.
//! It only ever enters walkable tiles, asking the map through the narrow [`Walkability`]
//! boundary, and returns the coordinates of the path from start to goal inclusive.
//!
//! Search nodes live in an arena owned by a single search and refer to their predecessor by
//! index. The open set is a list in insertion order that is scanned for the lowest `f = g + h`;
//! on equal scores the node inserted first wins, so the result is deterministic. Each tile has at
//! most one node in the open set: a cheaper route to a tile already in it rewrites that node's
//! cost and predecessor in place.

use std::{
    collections::{HashMap, HashSet},
    f64::consts::SQRT_2,
};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::PathError, map::GameMap, types::TilePos};

/// The eight neighbor offsets of a tile and the cost of stepping onto each.
///
/// The offsets are laid out like this around the current tile `C`:
///
/// ```text
/// 0 1 2
/// 3 C 4
/// 5 6 7
/// ```
///
/// with `+y` pointing up.
pub const NEIGHBORS: [(i32, i32, f64); 8] = [
    (-1, 1, SQRT_2),
    (0, 1, 1.0),
    (1, 1, SQRT_2),
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (-1, -1, SQRT_2),
    (0, -1, 1.0),
    (1, -1, SQRT_2),
];

/// Read-only view of a tile map, as consumed by the search.
pub trait Walkability {
    /// Returns whether the tile at `pos` can be walked through, or [`None`] if there is no tile.
    fn walkable(&self, pos: TilePos) -> Option<bool>;
}

/// Estimate of the remaining cost from a tile to the goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// `|dx| + |dy|`.
    ///
    /// Overestimates whenever a diagonal step is available, which makes the search greedier and
    /// may return a path slightly longer than the shortest one.
    #[default]
    Manhattan,
    /// `max(|dx|, |dy|) + (√2 - 1) * min(|dx|, |dy|)`.
    ///
    /// The exact cost on an open grid, never an overestimate, so the returned paths are shortest.
    Octile,
}

impl Heuristic {
    /// Estimates the cost of walking from `from` to `to`.
    pub fn estimate(self, from: TilePos, to: TilePos) -> f64 {
        let dx = f64::from(from.x.abs_diff(to.x));
        let dy = f64::from(from.y.abs_diff(to.y));

        match self {
            Self::Manhattan => dx + dy,
            Self::Octile => (SQRT_2 - 1.0).mul_add(dx.min(dy), dx.max(dy)),
        }
    }
}

/// Cost of a single step between two tiles, or [`None`] if they are not neighbors.
pub fn step_cost(from: TilePos, to: TilePos) -> Option<f64> {
    if !from.is_adjacent(to) {
        return None;
    }

    Some(if from.x == to.x || from.y == to.y {
        1.0
    } else {
        SQRT_2
    })
}

/// Result of a path request.
///
/// An empty path means the goal cannot be reached from the start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    /// Coordinates from start to goal inclusive.
    steps: Vec<TilePos>,
    /// Sum of the step costs along the path.
    cost: f64,
}

impl Path {
    /// Coordinates of the path, from start to goal inclusive.
    pub fn steps(&self) -> &[TilePos] {
        &self.steps
    }

    /// Total cost of walking the path.
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of tiles on the path, start and goal included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no path was found.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First coordinate of the path.
    pub fn first(&self) -> Option<TilePos> {
        self.steps.first().copied()
    }

    /// Last coordinate of the path.
    pub fn last(&self) -> Option<TilePos> {
        self.steps.last().copied()
    }
}

/// Walkability of every tile of a map, frozen at capture time.
///
/// Searching a snapshot lets the owner of the map keep editing it, on this thread or another,
/// while paths are computed against a stable picture of the terrain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkabilitySnapshot {
    /// Walkability of each tile, keyed by coordinate.
    tiles: HashMap<TilePos, bool>,
}

impl WalkabilitySnapshot {
    /// Copies the walkability of every tile of `map`.
    pub fn capture(map: &GameMap) -> Self {
        Self {
            tiles: map
                .tiles()
                .map(|tile| (tile.pos(), tile.is_walkable()))
                .collect(),
        }
    }
}

impl Walkability for WalkabilitySnapshot {
    fn walkable(&self, pos: TilePos) -> Option<bool> {
        self.tiles.get(&pos).copied()
    }
}

/// Finds a path from `start` to `goal` with the [`Heuristic::Manhattan`] estimate.
///
/// # Errors
///
/// Returns [`PathError::InvalidEndpoint`] when `start` or `goal` has no tile.
pub fn find_path<M>(map: &M, start: TilePos, goal: TilePos) -> Result<Path, PathError>
where
    M: Walkability + ?Sized,
{
    find_path_with(map, start, goal, Heuristic::default())
}

/// Finds a path from `start` to `goal` using `heuristic` to order the search.
///
/// The start tile is always part of a found path, walkable or not; every other tile on it is
/// walkable, the goal included. An unreachable goal yields an empty path. When `start` equals
/// `goal` the path holds that single tile.
///
/// # Errors
///
/// Returns [`PathError::InvalidEndpoint`] when `start` or `goal` has no tile.
pub fn find_path_with<M>(
    map: &M,
    start: TilePos,
    goal: TilePos,
    heuristic: Heuristic,
) -> Result<Path, PathError>
where
    M: Walkability + ?Sized,
{
    for endpoint in [start, goal] {
        if map.walkable(endpoint).is_none() {
            return Err(PathError::InvalidEndpoint(endpoint));
        }
    }

    let mut search = Search::new(start, goal, heuristic);
    let path = search.run(map);

    debug!(
        "path {start} -> {goal}: {} steps, cost {:.3}, {} nodes created, {} expanded",
        path.len(),
        path.cost(),
        search.nodes.len(),
        search.closed.len()
    );

    Ok(path)
}

/// Transient record pairing a tile with its cost bookkeeping during one search.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    /// Coordinate of the tile.
    pos: TilePos,
    /// Arena index of the node this one was reached from.
    parent: Option<usize>,
    /// Cost of the best known route from the start, `g`.
    g_cost: f64,
    /// Estimated cost from here to the goal, `h`.
    h_cost: f64,
}

impl SearchNode {
    /// Combined score `f = g + h` used to pick the next node to expand.
    fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// State of one A* search.
///
/// This structure is created for a single request and dropped once the path is reconstructed, so
/// no search state ever outlives the call that produced it.
struct Search {
    /// Coordinate being searched from.
    ///
    /// This field holds the tile the search started at. It is only read back to check that the
    /// reconstructed path begins where it should.
    start: TilePos,
    /// Coordinate being searched for.
    ///
    /// This field holds the tile the search stops at once it is expanded, and the point every
    /// heuristic estimate is measured against.
    goal: TilePos,
    /// Remaining-cost estimate.
    ///
    /// This field selects how the `h` part of each node's score is computed when the node is
    /// created. It never changes during a search.
    heuristic: Heuristic,
    /// Arena of search nodes.
    ///
    /// This field holds every node created by the search, open or closed. Nodes are never removed,
    /// so an index handed out by [`open_node`](Search::open_node) stays valid for the whole search
    /// and predecessor links can be stored as plain indices.
    nodes: Vec<SearchNode>,
    /// Frontier of the search.
    ///
    /// This field holds the arena indices of the nodes still waiting to be expanded, in the order
    /// they were inserted. That order is what breaks ties between equal scores.
    open: Vec<usize>,
    /// Frontier membership by coordinate.
    ///
    /// This field maps each tile in [`open`](Search::open) to the arena index of its node, so a
    /// cheaper route to a tile already in the frontier can rewrite that node in place.
    open_by_pos: HashMap<TilePos, usize>,
    /// Expanded tiles.
    ///
    /// This field holds every tile whose node has been taken off the frontier. Those tiles are
    /// never opened again.
    closed: HashSet<TilePos>,
}

impl Search {
    /// Prepares a search with only the start node in the frontier.
    fn new(start: TilePos, goal: TilePos, heuristic: Heuristic) -> Self {
        let mut search = Self {
            start,
            goal,
            heuristic,
            nodes: Vec::new(),
            open: Vec::new(),
            open_by_pos: HashMap::new(),
            closed: HashSet::new(),
        };
        search.open_node(start, None, 0.0);

        search
    }

    /// Runs the search to completion.
    fn run<M>(&mut self, map: &M) -> Path
    where
        M: Walkability + ?Sized,
    {
        while let Some(current) = self.pop_lowest() {
            let node = self.node(current);
            let _ = self.closed.insert(node.pos);

            if node.pos == self.goal {
                return self.reconstruct(current);
            }

            for (dx, dy, step) in NEIGHBORS {
                let Some(pos) = node.pos.offset(dx, dy) else {
                    continue;
                };
                if map.walkable(pos) != Some(true) || self.closed.contains(&pos) {
                    continue;
                }

                let g_cost = node.g_cost + step;
                match self.open_by_pos.get(&pos).copied() {
                    None => self.open_node(pos, Some(current), g_cost),
                    Some(idx) => {
                        let neighbor = self.node_mut(idx);
                        if g_cost < neighbor.g_cost {
                            neighbor.g_cost = g_cost;
                            neighbor.parent = Some(current);
                        }
                    }
                }
            }
        }

        Path::default()
    }

    /// Creates a node for `pos` and appends it to the frontier.
    fn open_node(&mut self, pos: TilePos, parent: Option<usize>, g_cost: f64) {
        let idx = self.nodes.len();
        self.nodes.push(SearchNode {
            pos,
            parent,
            g_cost,
            h_cost: self.heuristic.estimate(pos, self.goal),
        });
        self.open.push(idx);
        let _ = self.open_by_pos.insert(pos, idx);
    }

    /// Removes the frontier node with the lowest `f` and returns its arena index.
    ///
    /// Among equal scores the earliest inserted node is chosen.
    fn pop_lowest(&mut self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (slot, &idx) in self.open.iter().enumerate() {
            let f_cost = self.node(idx).f_cost();
            if best.is_none_or(|(_, best_f_cost)| f_cost < best_f_cost) {
                best = Some((slot, f_cost));
            }
        }

        let (slot, _) = best?;
        let idx = self.open.remove(slot);
        let pos = self.node(idx).pos;
        let _ = self.open_by_pos.remove(&pos);

        Some(idx)
    }

    /// Follows predecessor links from `last` back to the start.
    fn reconstruct(&self, last: usize) -> Path {
        let mut steps = Vec::new();
        let mut cursor = Some(last);
        while let Some(idx) = cursor {
            let node = self.node(idx);
            steps.push(node.pos);
            cursor = node.parent;
        }
        steps.reverse();

        debug_assert_eq!(steps.first(), Some(&self.start), "path must begin at the start");

        Path {
            steps,
            cost: self.node(last).g_cost,
        }
    }

    /// Returns a copy of the node at arena index `idx`.
    #[expect(
        clippy::indexing_slicing,
        reason = "Arena indices are only ever handed out by `open_node` and nodes are never removed."
    )]
    fn node(&self, idx: usize) -> SearchNode {
        self.nodes[idx]
    }

    /// Returns the node at arena index `idx` for in-place relaxation.
    #[expect(
        clippy::indexing_slicing,
        reason = "Arena indices are only ever handed out by `open_node` and nodes are never removed."
    )]
    fn node_mut(&mut self, idx: usize) -> &mut SearchNode {
        &mut self.nodes[idx]
    }
}
