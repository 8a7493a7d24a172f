/// LooseOctree: fixed-depth loose octree stored in a flat array.
///
/// Every node of every level is allocated up front by `grow`, so an object's
/// destination is computed directly from its bounding sphere in O(levels)
/// with no tree walk and no allocation.
///
/// Node layout: level `L` starts at `calc_base(L)` and holds `(2^L)^3` nodes
/// addressed by `x + w*y + w*w*z` with `w = 2^L`.
///
/// Each node owns a tight cubic cell of width `size`. Its *loose* cell has
/// the same centre and twice the width, so an object whose diameter fits the
/// tight width and whose centre lies in the tight cell always fits the loose
/// cell.

use glam::Vec3;
use crate::camera::Frustum;
use crate::engine_err;
use crate::error::Result;
use crate::math::AABB;

pub type Level = u8;
pub type GridCoord = u16;

/// Index of the root node in the flat node array.
pub const ROOT: usize = 0;

/// Deepest octree that can be allocated (8^7 leaves).
pub const MAX_OCTREE_LEVELS: Level = 8;

/// A single octree node. `data` is the caller's payload.
#[derive(Debug, Clone)]
pub struct OctreeNode<N> {
    level: Level,
    grid: [GridCoord; 3],
    /// Flat indices of the 8 children, enumerated z, then y, then x.
    /// All zero on leaves.
    child_indexes: [u32; 8],
    centre: Vec3,
    /// Tight cell width
    size: f32,
    data: N,
}

impl<N> OctreeNode<N> {
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn grid(&self) -> [GridCoord; 3] {
        self.grid
    }

    pub fn child_indexes(&self) -> &[u32; 8] {
        &self.child_indexes
    }

    pub fn centre(&self) -> Vec3 {
        self.centre
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// The tight cell.
    pub fn bounds(&self) -> AABB {
        AABB::from_centre_width(self.centre, self.size)
    }

    /// The loose cell: same centre, twice the width.
    pub fn loose_bounds(&self) -> AABB {
        AABB::from_centre_width(self.centre, self.size * 2.0)
    }

    pub fn data(&self) -> &N {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut N {
        &mut self.data
    }
}

/// Fixed-depth loose octree with payload `N` per node.
#[derive(Debug, Clone)]
pub struct LooseOctree<N> {
    /// Cubic world bounds
    bounds: AABB,
    root_width: f32,
    levels: Level,
    nodes: Vec<OctreeNode<N>>,
}

impl<N: Default> LooseOctree<N> {
    /// Create an octree over `bounds` with `max_level_count` levels.
    ///
    /// Non-cubic bounds are grown to a cube around their centre using the
    /// largest dimension.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `max_level_count` exceeds `MAX_OCTREE_LEVELS`.
    pub fn new(bounds: &AABB, max_level_count: Level) -> Result<Self> {
        if max_level_count > MAX_OCTREE_LEVELS {
            return Err(engine_err!("galaxy3d::LooseOctree", InvalidConfig,
                "{} octree levels requested, at most {} supported", max_level_count, MAX_OCTREE_LEVELS));
        }

        let root_width = bounds.max_dimension();

        let mut octree = Self {
            bounds: AABB::from_centre_width(bounds.center(), root_width),
            root_width,
            levels: 0,
            nodes: Vec::new(),
        };

        octree.grow(max_level_count);
        Ok(octree)
    }

    /// Allocate every node of levels `0..required_levels`.
    fn grow(&mut self, required_levels: Level) {
        let required_nodes = calc_base(required_levels) as usize;

        self.levels = required_levels;
        self.nodes = Vec::with_capacity(required_nodes);

        // calc_index order is x fastest, then y, then z, level by level
        for level in 0..required_levels {
            let nodes_across = 1u32 << level;

            for z in 0..nodes_across {
                for y in 0..nodes_across {
                    for x in 0..nodes_across {
                        let grid = [x as GridCoord, y as GridCoord, z as GridCoord];
                        debug_assert_eq!(self.nodes.len() as u32, calc_index(level, grid[0], grid[1], grid[2]));

                        let (centre, size) = self.calc_bounds(level, grid);
                        let child_indexes = if level + 1 < required_levels {
                            calc_child_indexes(level, grid)
                        } else {
                            [0; 8]
                        };

                        self.nodes.push(OctreeNode {
                            level,
                            grid,
                            child_indexes,
                            centre,
                            size,
                            data: N::default(),
                        });
                    }
                }
            }
        }
    }
}

impl<N> LooseOctree<N> {
    // ===== ACCESSORS =====

    /// Cubic world bounds.
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn root_width(&self) -> f32 {
        self.root_width
    }

    pub fn levels(&self) -> Level {
        self.levels
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[OctreeNode<N>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&OctreeNode<N>> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut OctreeNode<N>> {
        self.nodes.get_mut(index)
    }

    pub fn is_leaf(&self, node: &OctreeNode<N>) -> bool {
        node.level + 1 == self.levels
    }

    // ===== PLACEMENT =====

    /// Deepest level whose tight cell width is still >= `obj_width`, capped
    /// at the leaf level, together with that cell width.
    ///
    /// Objects wider than the root go to level 0.
    pub fn level_for_width(&self, obj_width: f32) -> (Level, f32) {
        if obj_width > self.root_width || self.levels == 0 {
            return (0, self.root_width);
        }

        let mut node_width = self.root_width;
        let mut depth: Level = 0;

        while node_width >= obj_width {
            depth += 1;
            node_width *= 0.5;

            if depth == self.levels {
                break;
            }
        }

        if depth == 0 {
            // NaN width
            return (0, self.root_width);
        }

        (depth - 1, node_width * 2.0)
    }

    /// Flat index of the node a sphere belongs to.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the centre lies outside the octree bounds (use
    /// `clamp_to_bounds` first to force a placement), `InvalidConfig` if the
    /// octree has no levels.
    pub fn find_destination_for_sphere(&self, centre: Vec3, radius: f32) -> Result<usize> {
        if self.nodes.is_empty() {
            return Err(engine_err!("galaxy3d::LooseOctree", InvalidConfig,
                "octree has no levels"));
        }

        if !self.bounds.contains_point(centre) {
            return Err(engine_err!("galaxy3d::LooseOctree", OutOfRange,
                "centre {} is outside the octree bounds {}", centre, self.bounds));
        }

        let (level, node_width) = self.level_for_width(radius * 2.0);
        let level_width = 1u32 << level;
        let origin = self.bounds.min();

        // A centre on the upper cusp of the last cell lands one past the end
        let to_grid = |c: f32, o: f32| -> GridCoord {
            let g = ((c - o) / node_width) as u32;
            g.min(level_width - 1) as GridCoord
        };

        let index = calc_index(
            level,
            to_grid(centre.x, origin.x),
            to_grid(centre.y, origin.y),
            to_grid(centre.z, origin.z),
        );

        Ok(index as usize)
    }

    /// Flat index of the node a triangle belongs to: the sphere around the
    /// triangle's bounding box.
    pub fn find_destination_for_triangle(&self, vertices: &[Vec3; 3]) -> Result<usize> {
        let bounds = AABB::from_points(vertices);
        self.find_destination_for_sphere(bounds.center(), bounds.max_dimension() / 2.0)
    }

    /// Nearest point to `point` inside the octree bounds.
    pub fn clamp_to_bounds(&self, point: Vec3) -> Vec3 {
        point.clamp(self.bounds.min(), self.bounds.max())
    }

    // ===== TRAVERSAL =====

    /// Depth-first pre-order visit of every node, starting at the root.
    pub fn traverse<F: FnMut(&OctreeNode<N>)>(&self, mut callback: F) {
        if !self.nodes.is_empty() {
            self.visit(ROOT, &mut callback);
        }
    }

    /// `traverse` with mutable access to each node's payload.
    pub fn traverse_mut<F: FnMut(&mut OctreeNode<N>)>(&mut self, mut callback: F) {
        if !self.nodes.is_empty() {
            let levels = self.levels;
            visit_mut(&mut self.nodes, ROOT, levels, &mut callback);
        }
    }

    /// Like `traverse`, but a node and its whole subtree are skipped when its
    /// loose cell is outside the frustum. Parents are always visited before
    /// their children.
    pub fn traverse_visible<F: FnMut(&OctreeNode<N>)>(&self, frustum: &Frustum, mut callback: F) {
        if !self.nodes.is_empty() {
            self.visit_visible(ROOT, frustum, &mut callback);
        }
    }

    fn visit<F: FnMut(&OctreeNode<N>)>(&self, index: usize, callback: &mut F) {
        let node = &self.nodes[index];
        callback(node);

        if !self.is_leaf(node) {
            for &child in &node.child_indexes {
                self.visit(child as usize, callback);
            }
        }
    }

    fn visit_visible<F: FnMut(&OctreeNode<N>)>(&self, index: usize, frustum: &Frustum, callback: &mut F) {
        let node = &self.nodes[index];
        if !frustum.intersects_cube(node.centre, node.size * 2.0) {
            return;
        }

        callback(node);

        if !self.is_leaf(node) {
            for &child in &node.child_indexes {
                self.visit_visible(child as usize, frustum, callback);
            }
        }
    }

    /// Centre and tight width of the cell at `grid` on `level`.
    fn calc_bounds(&self, level: Level, grid: [GridCoord; 3]) -> (Vec3, f32) {
        let cell_width = self.root_width / (1u32 << level) as f32;
        let min = self.bounds.min()
            + Vec3::new(grid[0] as f32, grid[1] as f32, grid[2] as f32) * cell_width;

        (min + Vec3::splat(cell_width * 0.5), cell_width)
    }
}

fn visit_mut<N, F: FnMut(&mut OctreeNode<N>)>(
    nodes: &mut [OctreeNode<N>],
    index: usize,
    levels: Level,
    callback: &mut F,
) {
    callback(&mut nodes[index]);

    let node = &nodes[index];
    if node.level + 1 < levels {
        let children = node.child_indexes;
        for child in children {
            visit_mut(nodes, child as usize, levels, callback);
        }
    }
}

// ===== ADDRESSING =====

/// Index of the first node of `level` (the total node count of all
/// shallower levels). Valid up to `MAX_OCTREE_LEVELS`.
pub fn calc_base(level: Level) -> u32 {
    (0..level).map(|l| 1u32 << (3 * l as u32)).sum()
}

/// Flat index of the node at `(x, y, z)` on `level`.
pub fn calc_index(level: Level, x: GridCoord, y: GridCoord, z: GridCoord) -> u32 {
    let level_width = 1u32 << level;
    debug_assert!((x as u32) < level_width && (y as u32) < level_width && (z as u32) < level_width);

    calc_base(level) + x as u32 + level_width * y as u32 + level_width * level_width * z as u32
}

/// The 8 children of `(level, grid)`, enumerated z, then y, then x.
fn calc_child_indexes(level: Level, grid: [GridCoord; 3]) -> [u32; 8] {
    let mut children = [0u32; 8];
    let mut count = 0;

    for z in 0..2 {
        for y in 0..2 {
            for x in 0..2 {
                children[count] = calc_index(
                    level + 1,
                    2 * grid[0] + x,
                    2 * grid[1] + y,
                    2 * grid[2] + z,
                );
                count += 1;
            }
        }
    }

    children
}

#[cfg(test)]
#[path = "loose_octree_tests.rs"]
mod tests;
