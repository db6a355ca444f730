//! Routing trait and default Dijkstra implementation.
//!
//! Movement providers call routing via the [`Router`] trait so an
//! application can swap in A* or a terrain-aware model.  Costs are walking
//! milliseconds (`edge_travel_ms`).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use wsim_core::{EdgeId, LocationId};

use crate::geography::Geography;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Paths to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    /// Cumulative travel time in milliseconds.
    pub total_travel_ms: u64,
}

impl Route {
    /// `true` if the source and destination are the same cell.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Cells visited after leaving the origin, ending with the destination.
    pub fn cells(&self, geo: &Geography) -> Vec<LocationId> {
        self.edges.iter().map(|e| geo.edge_to[e.index()]).collect()
    }

    /// Travel time of each hop, aligned with [`cells`](Self::cells).
    pub fn step_costs_ms(&self, geo: &Geography) -> Vec<u64> {
        self.edges
            .iter()
            .map(|e| geo.edge_travel_ms[e.index()] as u64)
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.  Must be `Send + Sync` so it can be shared by
/// the providers of several schedulers.
pub trait Router: Send + Sync {
    /// Route from `from` to `to`.  `from == to` is an empty route, not an
    /// error.
    fn route(&self, geo: &Geography, from: LocationId, to: LocationId) -> SpatialResult<Route>;
}

/// Standard Dijkstra over the CSR cell graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, geo: &Geography, from: LocationId, to: LocationId) -> SpatialResult<Route> {
        dijkstra(geo, from, to)
    }
}

impl Geography {
    /// Shortest route by travel time, using [`DijkstraRouter`].
    pub fn route(&self, from: LocationId, to: LocationId) -> SpatialResult<Route> {
        DijkstraRouter.route(self, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(geo: &Geography, from: LocationId, to: LocationId) -> SpatialResult<Route> {
    for cell in [from, to] {
        if !geo.contains(cell) {
            return Err(SpatialError::CellNotFound(cell));
        }
    }
    if from == to {
        return Ok(Route { edges: vec![], total_travel_ms: 0 });
    }

    let n = geo.cell_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Secondary key LocationId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, LocationId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, cell))) = heap.pop() {
        if cell == to {
            return Ok(reconstruct(geo, &prev_edge, to, cost));
        }
        if cost > dist[cell.index()] {
            continue;
        }
        for edge in geo.out_edges(cell) {
            let next = geo.edge_to[edge.index()];
            let new_cost = cost.saturating_add(geo.edge_travel_ms[edge.index()] as u64);
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(geo: &Geography, prev_edge: &[EdgeId], to: LocationId, total_ms: u64) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = geo.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, total_travel_ms: total_ms }
}
