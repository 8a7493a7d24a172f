/// OctreeCuller: frustum culling for the triangles of one static mesh.
///
/// Static geometry never moves, so its triangles are bucketed once into a
/// loose octree at `compile()` time. Each frame, `triangles_visible` walks
/// the visible nodes and returns the index lists to draw, grouped by
/// material.
///
/// The culler works on plain vertex positions and index lists; uploading
/// them to the GPU is the renderer's business.

use std::collections::BTreeMap;
use glam::Vec3;
use crate::camera::Frustum;
use crate::engine_bail;
use crate::error::Result;
use crate::math::AABB;
use super::loose_octree::{Level, LooseOctree};

/// Identifier of the material a submesh is drawn with.
pub type MaterialId = u32;

/// Default depth of the triangle octree.
pub const DEFAULT_CULLER_LEVELS: Level = 4;

/// Per-node payload: vertex indices (three per triangle) by material.
pub type CullerNodeData = BTreeMap<MaterialId, Vec<u32>>;

#[derive(Debug, Clone)]
struct Submesh {
    material: MaterialId,
    indices: Vec<u32>,
}

pub struct OctreeCuller {
    vertices: Vec<Vec3>,
    submeshes: Vec<Submesh>,
    levels: Level,
    octree: Option<LooseOctree<CullerNodeData>>,
}

impl OctreeCuller {
    /// Create a culler over a copy of `vertices`.
    pub fn new(vertices: &[Vec3], levels: Level) -> Self {
        Self {
            vertices: vertices.to_vec(),
            submeshes: Vec::new(),
            levels,
            octree: None,
        }
    }

    /// Add a triangle list drawn with `material`.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if `indices` is not a whole number of triangles or
    /// references a vertex that does not exist.
    pub fn add_submesh(&mut self, material: MaterialId, indices: &[u32]) -> Result<()> {
        if indices.len() % 3 != 0 {
            engine_bail!("galaxy3d::OctreeCuller", InvalidGeometry,
                "index count {} is not a multiple of 3", indices.len());
        }

        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            engine_bail!("galaxy3d::OctreeCuller", InvalidGeometry,
                "index {} out of range ({} vertices)", bad, self.vertices.len());
        }

        self.submeshes.push(Submesh { material, indices: indices.to_vec() });
        self.octree = None;
        Ok(())
    }

    /// Build the octree over the vertex bounds and bucket every triangle
    /// into its destination node.
    pub fn compile(&mut self) -> Result<()> {
        let bounds = AABB::from_points(&self.vertices);
        let mut octree = LooseOctree::<CullerNodeData>::new(&bounds, self.levels)?;

        let mut triangle_count = 0usize;
        for submesh in &self.submeshes {
            for tri in submesh.indices.chunks_exact(3) {
                let corners = [
                    self.vertices[tri[0] as usize],
                    self.vertices[tri[1] as usize],
                    self.vertices[tri[2] as usize],
                ];

                let idx = octree.find_destination_for_triangle(&corners)?;
                if let Some(node) = octree.node_mut(idx) {
                    node.data_mut()
                        .entry(submesh.material)
                        .or_default()
                        .extend_from_slice(tri);
                }
                triangle_count += 1;
            }
        }

        crate::engine_debug!("galaxy3d::OctreeCuller",
            "Compiled {} triangles into {} nodes over {}",
            triangle_count, octree.node_count(), octree.bounds());

        self.octree = Some(octree);
        Ok(())
    }

    pub fn is_compiled(&self) -> bool {
        self.octree.is_some()
    }

    /// Cubic bounds of the triangle octree, if compiled.
    pub fn octree_bounds(&self) -> Option<AABB> {
        self.octree.as_ref().map(|o| o.bounds())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Vertex indices of the triangles in nodes whose loose cell intersects
    /// the frustum, grouped by material. Empty until compiled.
    pub fn triangles_visible(&self, frustum: &Frustum) -> BTreeMap<MaterialId, Vec<u32>> {
        let mut visible: BTreeMap<MaterialId, Vec<u32>> = BTreeMap::new();

        if let Some(octree) = &self.octree {
            octree.traverse_visible(frustum, |node| {
                for (material, indices) in node.data() {
                    visible.entry(*material).or_default().extend_from_slice(indices);
                }
            });
        }

        visible
    }
}

#[cfg(test)]
#[path = "geom_culler_tests.rs"]
mod tests;
