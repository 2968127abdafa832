//! Static triangle meshes with a bounding-plane tree
//!
//! Concave geometry is stored as a triangle soup plus a flattened binary
//! tree. Each node carries a single bounding plane instead of a full box:
//! the low child of a split is bounded from above on the split axis, the
//! high child from below. Nodes are laid out in pre-order with a skip
//! index, so queries traverse the array in a plain loop with no recursion
//! and no explicit stack.

use crate::foundation::math::Vec3;
use crate::spatial::AABB;

use super::primitives::Triangle;

/// Leaf marker for internal nodes
const NO_TRIANGLE: u32 = u32::MAX;

/// One node of the flattened triangle tree
///
/// `axis` values 0-2 bound the node's subtree from above on x/y/z (skip
/// when the query box starts past `split`); values 3-5 bound it from below
/// (skip when the query box ends before `split`).
#[derive(Debug, Clone, Copy)]
struct TriangleTreeNode {
    axis: u8,
    split: f32,
    /// Index one past this node's subtree in the pre-order array
    skip: u32,
    /// Triangle index for leaves, [`NO_TRIANGLE`] for internal nodes
    triangle: u32,
}

/// Immutable concave collision mesh
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    nodes: Vec<TriangleTreeNode>,
    bounds: AABB,
}

impl TriangleMesh {
    /// Build a mesh (and its query tree) from a triangle soup
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let bounds = triangles
            .iter()
            .map(Triangle::aabb)
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_else(|| AABB::new(Vec3::zeros(), Vec3::zeros()));

        let mut builder = TreeBuilder {
            triangles: &triangles,
            nodes: Vec::with_capacity(triangles.len() * 2),
        };
        if !triangles.is_empty() {
            let mut order: Vec<u32> = (0..triangles.len() as u32).collect();
            // The root has no sibling, so its plane can never prune.
            builder.build(&mut order, 0, f32::INFINITY);
        }
        let nodes = builder.nodes;

        Self {
            triangles,
            nodes,
            bounds,
        }
    }

    /// Build a mesh from an indexed vertex buffer
    pub fn from_vertices(vertices: &[Vec3], indices: &[[u32; 3]]) -> Self {
        let triangles = indices
            .iter()
            .map(|[a, b, c]| {
                Triangle::new(
                    vertices[*a as usize],
                    vertices[*b as usize],
                    vertices[*c as usize],
                )
            })
            .collect();
        Self::new(triangles)
    }

    /// Local-space bounds of the whole mesh
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle by index
    pub fn triangle(&self, index: u32) -> &Triangle {
        &self.triangles[index as usize]
    }

    /// Visit every triangle whose bounds overlap the query box
    ///
    /// The visitor may return a replacement query box, which takes effect
    /// immediately for the rest of the traversal. The simulation uses this
    /// to shrink the query after resolving a contact has pushed the body
    /// away from the mesh.
    pub fn visit_overlaps<F>(&self, query: AABB, mut visitor: F)
    where
        F: FnMut(u32, &Triangle) -> Option<AABB>,
    {
        let mut query = query;
        let mut index = 0;
        while index < self.nodes.len() {
            let node = self.nodes[index];
            let axis = usize::from(node.axis);
            let prune = if axis < 3 {
                query.min[axis] > node.split
            } else {
                query.max[axis - 3] < node.split
            };
            if prune {
                index = node.skip as usize;
                continue;
            }
            if node.triangle != NO_TRIANGLE {
                let triangle = &self.triangles[node.triangle as usize];
                if triangle.aabb().intersects(&query) {
                    if let Some(updated) = visitor(node.triangle, triangle) {
                        query = updated;
                    }
                }
            }
            index += 1;
        }
    }
}

struct TreeBuilder<'a> {
    triangles: &'a [Triangle],
    nodes: Vec<TriangleTreeNode>,
}

impl TreeBuilder<'_> {
    /// Emit the subtree for `order`, bounded by the plane the parent chose
    fn build(&mut self, order: &mut [u32], axis: u8, split: f32) {
        let position = self.nodes.len();
        self.nodes.push(TriangleTreeNode {
            axis,
            split,
            skip: 0,
            triangle: NO_TRIANGLE,
        });

        if let [only] = order[..] {
            self.nodes[position].triangle = only;
        } else {
            let split_axis = self.widest_centroid_axis(order);
            order.sort_by(|&a, &b| {
                let ca = self.triangles[a as usize].centroid()[split_axis];
                let cb = self.triangles[b as usize].centroid()[split_axis];
                ca.total_cmp(&cb)
            });
            let mid = order.len() / 2;
            let (low, high) = order.split_at_mut(mid);

            let low_bound = low
                .iter()
                .map(|&t| self.triangles[t as usize].aabb().max[split_axis])
                .fold(f32::NEG_INFINITY, f32::max);
            let high_bound = high
                .iter()
                .map(|&t| self.triangles[t as usize].aabb().min[split_axis])
                .fold(f32::INFINITY, f32::min);

            self.build(low, split_axis as u8, low_bound);
            self.build(high, split_axis as u8 + 3, high_bound);
        }

        self.nodes[position].skip = self.nodes.len() as u32;
    }

    fn widest_centroid_axis(&self, order: &[u32]) -> usize {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for &t in order {
            let centroid = self.triangles[t as usize].centroid();
            min = min.inf(&centroid);
            max = max.sup(&centroid);
        }
        let spread = max - min;
        if spread.x >= spread.y && spread.x >= spread.z {
            0
        } else if spread.y >= spread.z {
            1
        } else {
            2
        }
    }
}
