//! Constraint model: neighbor graph decomposition and location checks.

use crate::block::{Block, LocationPreference};
use std::collections::VecDeque;
use u_floorplan_core::rect::{Rect, EPSILON};
use u_floorplan_core::{Error, Result};

/// Allowed L1 distance between block center and layout center, as a
/// fraction of the layout's `width + height`.
pub const CENTER_TOLERANCE: f64 = 0.15;

/// Index-based neighbor graph. Edges point from a block to the block it must abut.
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    /// Outgoing edge of each block.
    pub parent: Vec<Option<usize>>,
    /// Incoming edges of each block, in input order.
    pub children: Vec<Vec<usize>>,
}

impl NeighborGraph {
    /// Builds the graph from resolved blocks.
    pub fn new(blocks: &[Block]) -> Self {
        let parent: Vec<Option<usize>> = blocks.iter().map(|b| b.neighbor).collect();
        let mut children = vec![Vec::new(); blocks.len()];
        for (i, p) in parent.iter().enumerate() {
            if let Some(p) = p {
                children[*p].push(i);
            }
        }
        Self { parent, children }
    }

    /// Undirected tree neighbors of a block: its parent first, then its children.
    pub fn adjacent(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.parent[i]
            .into_iter()
            .chain(self.children[i].iter().copied())
    }

    /// Every `(block, neighbor)` pair that must abut.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (i, p)))
    }

    /// True if nothing depends on this block.
    pub fn is_leaf(&self, i: usize) -> bool {
        self.children[i].is_empty()
    }
}

/// A connected component of two or more blocks linked by neighbor relations.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborGroup {
    /// Members in breadth-first order from the anchor.
    pub members: Vec<usize>,
    /// The member without an outgoing neighbor edge.
    pub anchor: usize,
}

impl NeighborGroup {
    /// Returns true if the block belongs to this group.
    pub fn contains(&self, block: usize) -> bool {
        self.members.contains(&block)
    }

    /// Total unrotated area of all members.
    pub fn area(&self, blocks: &[Block]) -> f64 {
        self.members.iter().map(|&i| blocks[i].area()).sum()
    }
}

/// Result of decomposing the blocks into rigid units.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// The neighbor graph.
    pub graph: NeighborGraph,
    /// Neighbor groups, ordered by anchor index.
    pub groups: Vec<NeighborGroup>,
    /// Blocks without any neighbor relation.
    pub singletons: Vec<usize>,
    /// Units that move as a whole: every group's members, then each singleton.
    pub units: Vec<Vec<usize>>,
    /// Unit index of every block.
    pub unit_of: Vec<usize>,
}

impl Classification {
    /// Returns the group a unit was built from, if any.
    pub fn group_of_unit(&self, unit: usize) -> Option<&NeighborGroup> {
        self.groups.get(unit)
    }

    /// Number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

/// Fails with [`Error::CyclicNeighborDependency`] when following neighbor
/// references from any block revisits a block.
pub fn check_cycles(blocks: &[Block]) -> Result<()> {
    let mut cleared = vec![false; blocks.len()];

    for start in 0..blocks.len() {
        let mut path = vec![start];
        let mut next = blocks[start].neighbor;

        while let Some(n) = next {
            if cleared[n] {
                break;
            }
            if let Some(pos) = path.iter().position(|&p| p == n) {
                let mut cycle: Vec<String> =
                    path[pos..].iter().map(|&i| blocks[i].name.clone()).collect();
                cycle.push(blocks[n].name.clone());
                return Err(Error::CyclicNeighborDependency(cycle));
            }
            path.push(n);
            next = blocks[n].neighbor;
        }

        for i in path {
            cleared[i] = true;
        }
    }

    Ok(())
}

/// Decomposes blocks into neighbor groups and singletons.
pub fn classify(blocks: &[Block]) -> Result<Classification> {
    check_cycles(blocks)?;

    let graph = NeighborGraph::new(blocks);
    let mut groups = Vec::new();
    let mut singletons = Vec::new();

    for (i, parent) in graph.parent.iter().enumerate() {
        if parent.is_some() {
            continue;
        }
        if graph.is_leaf(i) {
            singletons.push(i);
            continue;
        }

        let mut members = Vec::new();
        let mut queue = VecDeque::from([i]);
        while let Some(b) = queue.pop_front() {
            members.push(b);
            queue.extend(graph.children[b].iter().copied());
        }
        groups.push(NeighborGroup { members, anchor: i });
    }

    let mut units: Vec<Vec<usize>> = groups.iter().map(|g| g.members.clone()).collect();
    units.extend(singletons.iter().map(|&s| vec![s]));

    let mut unit_of = vec![0; blocks.len()];
    for (u, members) in units.iter().enumerate() {
        for &m in members {
            unit_of[m] = u;
        }
    }

    log::debug!(
        "Classified {} blocks into {} groups and {} singletons",
        blocks.len(),
        groups.len(),
        singletons.len()
    );

    Ok(Classification {
        graph,
        groups,
        singletons,
        units,
        unit_of,
    })
}

/// Checks whether a block's location preference holds against the given bounding box.
pub fn satisfies(block: &Block, bbox: &Rect) -> bool {
    let r = block.rect();
    let tol = EPSILON * bbox.max_side();
    let near = |a: f64, b: f64| (a - b).abs() <= tol;
    let (cx, cy) = r.center();
    let (bx, by) = bbox.center();

    match block.location {
        LocationPreference::None => true,
        LocationPreference::TopLeftCorner => near(r.min_x, bbox.min_x) && near(r.min_y, bbox.min_y),
        LocationPreference::TopRightCorner => near(r.max_x, bbox.max_x) && near(r.min_y, bbox.min_y),
        LocationPreference::BottomLeftCorner => {
            near(r.min_x, bbox.min_x) && near(r.max_y, bbox.max_y)
        }
        LocationPreference::BottomRightCorner => {
            near(r.max_x, bbox.max_x) && near(r.max_y, bbox.max_y)
        }
        LocationPreference::TopLeftQuad => {
            Rect::new(bbox.min_x, bbox.min_y, bx, by).contains_point(cx, cy)
        }
        LocationPreference::TopRightQuad => {
            Rect::new(bx, bbox.min_y, bbox.max_x, by).contains_point(cx, cy)
        }
        LocationPreference::BottomLeftQuad => {
            Rect::new(bbox.min_x, by, bx, bbox.max_y).contains_point(cx, cy)
        }
        LocationPreference::BottomRightQuad => {
            Rect::new(bx, by, bbox.max_x, bbox.max_y).contains_point(cx, cy)
        }
        LocationPreference::Center => {
            let distance = (cx - bx).abs() + (cy - by).abs();
            distance <= (CENTER_TOLERANCE + EPSILON) * (bbox.width() + bbox.height())
        }
    }
}

/// Checks whether two blocks share an edge segment with no gap and no overlap.
pub fn abuts(a: &Block, b: &Block) -> bool {
    a.rect().abuts(&b.rect())
}
