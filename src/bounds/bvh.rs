use crate::error::Error;
use crate::math::Vec3;

use super::Obbrss;

const LEAF_TRIANGLE_THRESHOLD_DEFAULT: u32 = 4;

/// One node of a flattened BVH arena. Leaf nodes (`left`/`right` both `None`)
/// own a contiguous span of `triangle_order`; interior nodes own neither
/// span nor triangles directly, only the merged volume of their children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    pub volume: Obbrss,
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub first_triangle: u32,
    pub triangle_count: u32,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A triangle mesh plus its bounding-volume hierarchy.
///
/// `triangle_order` is a permutation of `0..triangle_count`; leaves index
/// into it rather than into the original index buffer, so a rebuild never
/// reorders caller-owned vertex/index data.
#[derive(Debug, Clone, PartialEq)]
pub struct BvhModel {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    nodes: Vec<BvhNode>,
    triangle_order: Vec<u32>,
    leaf_threshold: u32,
    pca_obbrss: bool,
}

struct TriangleInfo {
    volume: Obbrss,
    centroid: Vec3,
}

impl BvhModel {
    pub fn build(vertices: &[Vec3], indices: &[u32]) -> Result<Self, Error> {
        Self::build_with_config(vertices, indices, LEAF_TRIANGLE_THRESHOLD_DEFAULT, true)
    }

    pub fn build_with_leaf_threshold(
        vertices: &[Vec3],
        indices: &[u32],
        leaf_threshold: u32,
    ) -> Result<Self, Error> {
        Self::build_with_config(vertices, indices, leaf_threshold, true)
    }

    pub fn build_with_config(
        vertices: &[Vec3],
        indices: &[u32],
        leaf_threshold: u32,
        pca_obbrss: bool,
    ) -> Result<Self, Error> {
        validate_mesh(vertices, indices)?;

        let mut model = BvhModel {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            nodes: Vec::new(),
            triangle_order: Vec::new(),
            leaf_threshold: leaf_threshold.max(1),
            pca_obbrss,
        };
        model.rebuild();
        Ok(model)
    }

    /// Replace the underlying mesh and rebuild the hierarchy from scratch.
    /// There is no incremental refit: the original driver rebuilds
    /// wholesale on every update, and at this crate's triangle counts a
    /// full median-split rebuild is cheap enough not to warrant one.
    pub fn update(&mut self, vertices: &[Vec3], indices: &[u32]) -> Result<(), Error> {
        validate_mesh(vertices, indices)?;
        self.vertices = vertices.to_vec();
        self.indices = indices.to_vec();
        self.rebuild();
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn triangle_order(&self) -> &[u32] {
        &self.triangle_order
    }

    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.nodes.first()
    }

    pub fn triangle(&self, triangle_index: u32) -> (Vec3, Vec3, Vec3) {
        let base = (triangle_index * 3) as usize;
        (
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        )
    }

    fn rebuild(&mut self) {
        self.nodes.clear();
        self.triangle_order.clear();

        let triangle_count = self.triangle_count() as usize;
        if triangle_count == 0 {
            return;
        }

        let mut infos = Vec::with_capacity(triangle_count);
        for tri in 0..triangle_count as u32 {
            let (a, b, c) = self.triangle(tri);
            infos.push(TriangleInfo {
                volume: Obbrss::from_points_pca(&[a, b, c], self.pca_obbrss),
                centroid: (a + b + c).scale(1.0 / 3.0),
            });
        }

        let mut order: Vec<u32> = (0..triangle_count as u32).collect();
        self.nodes.reserve(triangle_count * 2);

        let leaf_threshold = self.leaf_threshold;
        let pca_obbrss = self.pca_obbrss;
        build_recursive(&infos, &mut order, 0, triangle_count, leaf_threshold, pca_obbrss, &mut self.nodes);

        self.triangle_order = order;
    }
}

fn validate_mesh(vertices: &[Vec3], indices: &[u32]) -> Result<(), Error> {
    if vertices.is_empty() || indices.len() < 3 || indices.len() % 3 != 0 {
        return Err(Error::InvalidParameter);
    }
    if indices.iter().any(|&i| i as usize >= vertices.len()) {
        return Err(Error::InvalidParameter);
    }
    if vertices.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter);
    }
    Ok(())
}

fn choose_split_axis(infos: &[TriangleInfo], order: &[u32], begin: usize, count: usize) -> usize {
    let mut min = infos[order[begin] as usize].centroid;
    let mut max = min;
    for &idx in &order[begin + 1..begin + count] {
        let c = infos[idx as usize].centroid;
        min = min.min(c);
        max = max.max(c);
    }
    let extent = max - min;
    if extent.y > extent.x && extent.y >= extent.z {
        1
    } else if extent.z > extent.x && extent.z >= extent.y {
        2
    } else {
        0
    }
}

fn build_recursive(
    infos: &[TriangleInfo],
    order: &mut [u32],
    begin: usize,
    count: usize,
    leaf_threshold: u32,
    pca_obbrss: bool,
    nodes: &mut Vec<BvhNode>,
) -> u32 {
    let node_index = nodes.len() as u32;
    nodes.push(BvhNode {
        volume: Obbrss::empty(),
        left: None,
        right: None,
        first_triangle: begin as u32,
        triangle_count: count as u32,
    });

    let mut combined = infos[order[begin] as usize].volume;
    for &idx in &order[begin + 1..begin + count] {
        combined = Obbrss::merge_pca(&combined, &infos[idx as usize].volume, pca_obbrss);
    }
    nodes[node_index as usize].volume = combined;

    if count as u32 <= leaf_threshold {
        return node_index;
    }

    let axis = choose_split_axis(infos, order, begin, count);
    let mid = count / 2;
    let component = |v: Vec3| v.component(axis);

    order[begin..begin + count].select_nth_unstable_by(mid, |a, b| {
        component(infos[*a as usize].centroid)
            .partial_cmp(&component(infos[*b as usize].centroid))
            .unwrap()
    });

    let left_count = mid;
    let right_count = count - left_count;

    let left = build_recursive(infos, order, begin, left_count, leaf_threshold, pca_obbrss, nodes);
    let right = build_recursive(
        infos,
        order,
        begin + left_count,
        right_count,
        leaf_threshold,
        pca_obbrss,
        nodes,
    );

    let node = &mut nodes[node_index as usize];
    node.left = Some(left);
    node.right = Some(right);
    node.first_triangle = 0;
    node.triangle_count = 0;

    node_index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangle_quad() -> (Vec<Vec3>, Vec<u32>) {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        (vertices, indices)
    }

    #[test]
    fn build_succeeds_for_valid_mesh() {
        let (v, i) = two_triangle_quad();
        let model = BvhModel::build(&v, &i).unwrap();
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.triangle_order().len(), 2);
        assert!(model.root().is_some());
    }

    #[test]
    fn build_rejects_out_of_range_index() {
        let (v, _) = two_triangle_quad();
        let bad_indices = vec![0, 1, 9];
        assert!(matches!(
            BvhModel::build(&v, &bad_indices),
            Err(Error::InvalidParameter)
        ));
    }

    #[test]
    fn build_rejects_non_triangle_index_count() {
        let (v, _) = two_triangle_quad();
        let bad_indices = vec![0, 1, 2, 3];
        assert!(matches!(
            BvhModel::build(&v, &bad_indices),
            Err(Error::InvalidParameter)
        ));
    }

    #[test]
    fn large_mesh_splits_into_interior_and_leaf_nodes() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for i in 0..20u32 {
            let base = i as f32 * 2.0;
            vertices.push(Vec3::new(base, 0.0, 0.0));
            vertices.push(Vec3::new(base + 1.0, 0.0, 0.0));
            vertices.push(Vec3::new(base + 0.5, 1.0, 0.0));
            let idx = i * 3;
            indices.extend_from_slice(&[idx, idx + 1, idx + 2]);
        }
        let model = BvhModel::build(&vertices, &indices).unwrap();
        assert!(model.nodes().len() > 1);
        let leaves = model.nodes().iter().filter(|n| n.is_leaf()).count();
        assert!(leaves >= 2);
    }

    #[test]
    fn update_rebuilds_hierarchy_for_new_mesh() {
        let (v, i) = two_triangle_quad();
        let mut model = BvhModel::build(&v, &i).unwrap();
        let original_root_extents = model.root().unwrap().volume.extents;

        let mut shifted = v.clone();
        for vert in shifted.iter_mut() {
            *vert = *vert + Vec3::new(100.0, 0.0, 0.0);
        }
        model.update(&shifted, &i).unwrap();
        let new_root_center = model.root().unwrap().volume.center;
        assert!(new_root_center.x > 50.0);
        assert_eq!(model.root().unwrap().volume.extents, original_root_extents);
    }
}
