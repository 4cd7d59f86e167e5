use crate::bounds::Aabb;
use crate::error::Error;
use crate::registry::Handle;

use super::Item;

struct Node {
    aabb: Aabb,
    left: Option<u32>,
    right: Option<u32>,
    item: Option<u32>,
}

/// Dynamic AABB tree broadphase. Rebuilt from the current item set each
/// call (median-split over the item centers, same construction shape as
/// the mesh BVH), then self-traversed pairwise for overlapping leaves.
///
/// Output pair order is implementation-defined but stable for a fixed item
/// order, matching the brute-force strategy's result set.
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<u32>,
}

impl Tree {
    pub fn build(items: &[Item]) -> Self {
        if items.is_empty() {
            return Tree { nodes: Vec::new(), root: None };
        }
        let mut nodes = Vec::new();
        let mut order: Vec<u32> = (0..items.len() as u32).collect();
        let root = Self::build_recursive(items, &mut order, &mut nodes);
        Tree { nodes, root: Some(root) }
    }

    fn build_recursive(items: &[Item], order: &mut [u32], nodes: &mut Vec<Node>) -> u32 {
        if order.len() == 1 {
            let idx = order[0];
            nodes.push(Node { aabb: items[idx as usize].aabb, left: None, right: None, item: Some(idx) });
            return (nodes.len() - 1) as u32;
        }

        let mut bounds = items[order[0] as usize].aabb;
        for &i in &order[1..] {
            bounds = Aabb::merge(&bounds, &items[i as usize].aabb);
        }
        let extent = bounds.max - bounds.min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        let mid = order.len() / 2;
        order.select_nth_unstable_by(mid, |&a, &b| {
            let ca = items[a as usize].aabb.center().component(axis);
            let cb = items[b as usize].aabb.center().component(axis);
            ca.partial_cmp(&cb).expect("AABB centers are finite")
        });
        let (left_order, right_order) = order.split_at_mut(mid);

        let left = Self::build_recursive(items, left_order, nodes);
        let right = Self::build_recursive(items, right_order, nodes);
        let aabb = Aabb::merge(&nodes[left as usize].aabb, &nodes[right as usize].aabb);
        nodes.push(Node { aabb, left: Some(left), right: Some(right), item: None });
        (nodes.len() - 1) as u32
    }

    /// Always returns the true total pair count. Writes as many pairs as
    /// `out` holds, then reports `BufferTooSmall` if more were found than
    /// fit.
    pub fn find_pairs(&self, items: &[Item], out: &mut [(Handle, Handle)]) -> (usize, Result<(), Error>) {
        let mut total = 0usize;
        let mut written = 0usize;
        if let Some(root) = self.root {
            self.traverse_self(root, items, out, &mut total, &mut written);
        }
        let result = if total > out.len() { Err(Error::BufferTooSmall) } else { Ok(()) };
        (total, result)
    }

    fn traverse_self(
        &self,
        node: u32,
        items: &[Item],
        out: &mut [(Handle, Handle)],
        total: &mut usize,
        written: &mut usize,
    ) {
        let n = &self.nodes[node as usize];
        if let (Some(left), Some(right)) = (n.left, n.right) {
            self.traverse_self(left, items, out, total, written);
            self.traverse_self(right, items, out, total, written);
            self.traverse_pair(left, right, items, out, total, written);
        }
    }

    fn traverse_pair(
        &self,
        a: u32,
        b: u32,
        items: &[Item],
        out: &mut [(Handle, Handle)],
        total: &mut usize,
        written: &mut usize,
    ) {
        let node_a = &self.nodes[a as usize];
        let node_b = &self.nodes[b as usize];
        if !node_a.aabb.overlaps(&node_b.aabb) {
            return;
        }

        match (node_a.item, node_b.item) {
            (Some(ia), Some(ib)) => {
                *total += 1;
                if *written < out.len() {
                    out[*written] = (items[ia as usize].handle, items[ib as usize].handle);
                    *written += 1;
                }
            }
            (Some(_), None) => {
                let (left, right) = (node_b.left.unwrap(), node_b.right.unwrap());
                self.traverse_pair(a, left, items, out, total, written);
                self.traverse_pair(a, right, items, out, total, written);
            }
            (None, Some(_)) => {
                let (left, right) = (node_a.left.unwrap(), node_a.right.unwrap());
                self.traverse_pair(left, b, items, out, total, written);
                self.traverse_pair(right, b, items, out, total, written);
            }
            (None, None) => {
                let (al, ar) = (node_a.left.unwrap(), node_a.right.unwrap());
                let (bl, br) = (node_b.left.unwrap(), node_b.right.unwrap());
                self.traverse_pair(al, bl, items, out, total, written);
                self.traverse_pair(al, br, items, out, total, written);
                self.traverse_pair(ar, bl, items, out, total, written);
                self.traverse_pair(ar, br, items, out, total, written);
            }
        }
    }
}
