//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in an arena and refer to their children by index. Leaves index
//! into the owned primitive list, so a single primitive referenced from both
//! sides of a node is still owned exactly once.

use std::cmp::Ordering;

use crate::error::SceneError;
use crate::hittable::{HitInfo, Primitive};
use crate::material::NO_MATERIAL;
use crate::Material;
use lux_math::{Aabb, Ray};
use rand::{Rng, RngCore};

/// Child slot of a BVH node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Child {
    /// Index into `Bvh::primitives`
    Leaf(usize),
    /// Index into `Bvh::nodes`
    Node(usize),
}

#[derive(Debug)]
struct Node {
    bbox: Aabb,
    left: Child,
    right: Child,
}

/// A BVH over bounded primitives.
///
/// Construction splits at the median along a randomly chosen axis, ordering
/// primitives by the minimum corner of their boxes.
pub struct Bvh {
    primitives: Vec<Box<dyn Primitive>>,
    nodes: Vec<Node>,
    root: usize,
}

impl Bvh {
    /// Build a BVH. Every primitive must have a bounding box.
    pub fn build(
        primitives: Vec<Box<dyn Primitive>>,
        rng: &mut dyn RngCore,
    ) -> Result<Self, SceneError> {
        if primitives.is_empty() {
            return Err(SceneError::EmptyHierarchy);
        }

        let mut entries = primitives
            .iter()
            .enumerate()
            .map(|(index, p)| {
                p.bounding_box()
                    .map(|bbox| (index, bbox))
                    .ok_or(SceneError::UnboundedPrimitive { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut nodes = Vec::with_capacity(primitives.len());
        let root = build_node(&mut nodes, &mut entries, rng);

        log::debug!(
            "Built BVH: {} primitives, {} nodes",
            primitives.len(),
            nodes.len()
        );

        Ok(Self {
            primitives,
            nodes,
            root,
        })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    fn intersect_child(&self, child: Child, ray: &Ray) -> Option<HitInfo<'_>> {
        match child {
            Child::Leaf(index) => self.primitives[index].intersect(ray),
            Child::Node(index) => self.intersect_node(index, ray),
        }
    }

    fn intersect_node(&self, index: usize, ray: &Ray) -> Option<HitInfo<'_>> {
        let node = &self.nodes[index];
        if !node.bbox.hit(ray) {
            return None;
        }

        let left = self.intersect_child(node.left, ray);
        // A single leaf is stored on both sides; probing it twice finds nothing new
        if node.left == node.right {
            return left;
        }
        let right = self.intersect_child(node.right, ray);
        HitInfo::nearest(left, right)
    }
}

fn compare_on_axis(a: &Aabb, b: &Aabb, axis: usize) -> Ordering {
    a.min[axis].total_cmp(&b.min[axis])
}

/// Build the subtree over `entries` and return its node index.
fn build_node(
    nodes: &mut Vec<Node>,
    entries: &mut [(usize, Aabb)],
    rng: &mut dyn RngCore,
) -> usize {
    let axis = rng.gen_range(0..3);

    let (left, right) = match entries.len() {
        1 => (Child::Leaf(entries[0].0), Child::Leaf(entries[0].0)),
        2 => {
            if compare_on_axis(&entries[1].1, &entries[0].1, axis) == Ordering::Less {
                entries.swap(0, 1);
            }
            (Child::Leaf(entries[0].0), Child::Leaf(entries[1].0))
        }
        n => {
            entries.sort_by(|a, b| compare_on_axis(&a.1, &b.1, axis));
            let (lo, hi) = entries.split_at_mut(n / 2);
            (
                Child::Node(build_node(nodes, lo, rng)),
                Child::Node(build_node(nodes, hi, rng)),
            )
        }
    };

    let bbox = entries
        .iter()
        .skip(1)
        .fold(entries[0].1, |acc, (_, b)| Aabb::surrounding(&acc, b));

    nodes.push(Node { bbox, left, right });
    nodes.len() - 1
}

impl Primitive for Bvh {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        self.intersect_node(self.root, ray)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.nodes[self.root].bbox)
    }

    fn material(&self) -> &Material {
        &NO_MATERIAL
    }
}
