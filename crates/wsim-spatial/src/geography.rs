//! Cell geography and builder.
//!
//! # Data layout
//!
//! The world is a set of cells (`LocationId`) joined by directed paths.
//! Paths use **Compressed Sparse Row (CSR)** format.  Given a cell `c`, its
//! outgoing paths occupy the slice:
//!
//! ```text
//! edge_to[ cell_out_start[c] .. cell_out_start[c+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_travel_ms`) are sorted by source cell and indexed by `EdgeId`, so
//! the breadth-first hop queries and Dijkstra's inner loop are contiguous
//! memory scans.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a planar [`Position`] to the nearest cell.

use std::collections::VecDeque;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use wsim_core::{EdgeId, LocationId, Position, RealmId};

use crate::{SpatialError, SpatialResult};

// ── R-tree cell entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct CellEntry {
    point: [f32; 2], // [east_m, north_m]
    id:    LocationId,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let de = self.point[0] - point[0];
        let dn = self.point[1] - point[1];
        de * de + dn * dn
    }
}

// ── Geography ─────────────────────────────────────────────────────────────────

/// Directed cell graph in CSR format plus a spatial index.
///
/// Do not construct directly; use [`GeographyBuilder`].
pub struct Geography {
    /// Centre of each cell.  Indexed by `LocationId`.
    pub cell_pos:   Vec<Position>,
    /// Realm each cell belongs to.
    pub cell_realm: Vec<RealmId>,

    /// CSR row pointer.  Length = `cell_count + 1`.
    pub cell_out_start: Vec<u32>,

    pub edge_from:      Vec<LocationId>,
    pub edge_to:        Vec<LocationId>,
    pub edge_length_m:  Vec<f32>,
    /// Walking time in milliseconds.  Used as the routing cost.
    pub edge_travel_ms: Vec<u32>,

    spatial_idx: RTree<CellEntry>,
}

impl Geography {
    /// A geography with no cells.  Every hop query against it is empty and
    /// every route fails.
    pub fn empty() -> Self {
        GeographyBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.cell_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: LocationId) -> bool {
        cell.index() < self.cell_pos.len()
    }

    pub fn position(&self, cell: LocationId) -> SpatialResult<Position> {
        self.cell_pos
            .get(cell.index())
            .copied()
            .ok_or(SpatialError::CellNotFound(cell))
    }

    pub fn realm(&self, cell: LocationId) -> SpatialResult<RealmId> {
        self.cell_realm
            .get(cell.index())
            .copied()
            .ok_or(SpatialError::CellNotFound(cell))
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// `EdgeId`s of all outgoing paths from `cell`.  Empty for an unknown
    /// cell.
    #[inline]
    pub fn out_edges(&self, cell: LocationId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = if self.contains(cell) {
            (
                self.cell_out_start[cell.index()] as usize,
                self.cell_out_start[cell.index() + 1] as usize,
            )
        } else {
            (0, 0)
        };
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, cell: LocationId) -> usize {
        self.out_edges(cell).count()
    }

    /// Cells directly reachable from `cell`.
    pub fn neighbors(&self, cell: LocationId) -> impl Iterator<Item = LocationId> + '_ {
        self.out_edges(cell).map(|e| self.edge_to[e.index()])
    }

    /// Every cell reachable from `origin` in at most `hops` steps, paired
    /// with its hop distance, in breadth-first order.  `origin` itself comes
    /// first at distance 0.
    ///
    /// # Errors
    /// [`SpatialError::CellNotFound`] for an unknown origin.
    pub fn within_hops(&self, origin: LocationId, hops: u32) -> SpatialResult<Vec<(LocationId, u32)>> {
        if !self.contains(origin) {
            return Err(SpatialError::CellNotFound(origin));
        }
        let mut dist: Vec<u32> = vec![u32::MAX; self.cell_count()];
        let mut out = Vec::new();
        let mut queue = VecDeque::new();

        dist[origin.index()] = 0;
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let d = dist[cell.index()];
            out.push((cell, d));
            if d == hops {
                continue;
            }
            for next in self.neighbors(cell) {
                if dist[next.index()] == u32::MAX {
                    dist[next.index()] = d + 1;
                    queue.push_back(next);
                }
            }
        }
        Ok(out)
    }

    /// Fewest hops from `from` to `to`, searching no further than
    /// `max_hops`.  `None` when `to` is farther or unreachable.
    pub fn hops_between(&self, from: LocationId, to: LocationId, max_hops: u32) -> Option<u32> {
        if !self.contains(to) {
            return None;
        }
        self.within_hops(from, max_hops)
            .ok()?
            .into_iter()
            .find(|(cell, _)| *cell == to)
            .map(|(_, d)| d)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The cell whose centre is nearest to `pos`.  `None` only for an empty
    /// geography.
    pub fn nearest_cell(&self, pos: Position) -> Option<LocationId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.east_m, pos.north_m])
            .map(|e| e.id)
    }

    /// Up to `k` nearest cells to `pos`, sorted by ascending distance.
    pub fn k_nearest_cells(&self, pos: Position, k: usize) -> Vec<LocationId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.east_m, pos.north_m])
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Cells whose centre lies within `radius_m` of `pos`.
    pub fn cells_within_radius(&self, pos: Position, radius_m: f32) -> Vec<LocationId> {
        let mut cells: Vec<LocationId> = self
            .spatial_idx
            .locate_within_distance([pos.east_m, pos.north_m], radius_m * radius_m)
            .map(|e| e.id)
            .collect();
        cells.sort_unstable();
        cells
    }
}

// ── GeographyBuilder ──────────────────────────────────────────────────────────

/// Construct a [`Geography`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use wsim_core::{Position, RealmId};
/// use wsim_spatial::GeographyBuilder;
///
/// let mut b = GeographyBuilder::new();
/// let a = b.add_cell(Position::new(0.0, 0.0), RealmId(0));
/// let c = b.add_cell(Position::new(100.0, 0.0), RealmId(0));
/// b.connect(a, c, 100.0, 70_000);
/// let geo = b.build();
/// assert_eq!(geo.cell_count(), 2);
/// assert_eq!(geo.edge_count(), 2); // bidirectional
/// ```
pub struct GeographyBuilder {
    cells:     Vec<(Position, RealmId)>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      LocationId,
    to:        LocationId,
    length_m:  f32,
    travel_ms: u32,
}

impl GeographyBuilder {
    pub fn new() -> Self {
        Self { cells: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(cells: usize, edges: usize) -> Self {
        Self {
            cells:     Vec::with_capacity(cells),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a cell and return its `LocationId` (sequential from 0).
    pub fn add_cell(&mut self, pos: Position, realm: RealmId) -> LocationId {
        let id = LocationId(self.cells.len() as u32);
        self.cells.push((pos, realm));
        id
    }

    /// Add a **directed** path from `from` to `to`.
    pub fn add_path(&mut self, from: LocationId, to: LocationId, length_m: f32, travel_ms: u32) {
        self.raw_edges.push(RawEdge { from, to, length_m, travel_ms });
    }

    /// Add paths in **both directions**.
    pub fn connect(&mut self, a: LocationId, b: LocationId, length_m: f32, travel_ms: u32) {
        self.add_path(a, b, length_m, travel_ms);
        self.add_path(b, a, length_m, travel_ms);
    }

    /// Lay out a `cols × rows` grid of square cells `cell_m` metres wide,
    /// four-way connected, each crossing costing `travel_ms`.  Returns the
    /// new cells in row-major order.
    pub fn grid(
        &mut self,
        realm:     RealmId,
        cols:      u32,
        rows:      u32,
        cell_m:    f32,
        travel_ms: u32,
    ) -> Vec<LocationId> {
        let mut ids = Vec::with_capacity((cols * rows) as usize);
        for r in 0..rows {
            for c in 0..cols {
                ids.push(self.add_cell(Position::new(c as f32 * cell_m, r as f32 * cell_m), realm));
            }
        }
        for r in 0..rows {
            for c in 0..cols {
                let here = ids[(r * cols + c) as usize];
                if c + 1 < cols {
                    self.connect(here, ids[(r * cols + c + 1) as usize], cell_m, travel_ms);
                }
                if r + 1 < rows {
                    self.connect(here, ids[((r + 1) * cols + c) as usize], cell_m, travel_ms);
                }
            }
        }
        ids
    }

    pub fn cell_count(&self) -> usize { self.cells.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Geography`].  Paths that name a
    /// cell never added are dropped.
    pub fn build(self) -> Geography {
        let cell_count = self.cells.len();

        let mut raw: Vec<RawEdge> = self
            .raw_edges
            .into_iter()
            .filter(|e| e.from.index() < cell_count && e.to.index() < cell_count)
            .collect();
        raw.sort_by_key(|e| (e.from.0, e.to.0));

        let edge_from:      Vec<LocationId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<LocationId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m:  Vec<f32>        = raw.iter().map(|e| e.length_m).collect();
        let edge_travel_ms: Vec<u32>        = raw.iter().map(|e| e.travel_ms).collect();

        let mut cell_out_start = vec![0u32; cell_count + 1];
        for e in &raw {
            cell_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=cell_count {
            cell_out_start[i] += cell_out_start[i - 1];
        }

        let entries: Vec<CellEntry> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, (pos, _))| CellEntry {
                point: [pos.east_m, pos.north_m],
                id:    LocationId(i as u32),
            })
            .collect();

        Geography {
            cell_pos:   self.cells.iter().map(|(p, _)| *p).collect(),
            cell_realm: self.cells.iter().map(|(_, r)| *r).collect(),
            cell_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_ms,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

impl Default for GeographyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
