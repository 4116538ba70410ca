use crate::shape::{Primitive, SurfaceHit};
use crate::{Bounds3f, Point3f, Ray, Vec3f};
use smallvec::SmallVec;
use std::cmp::Ordering;

const MAX_LEAF_PRIMS: usize = 4;

#[derive(Debug, Copy, Clone)]
enum NodeKind {
    Leaf { first: u32, count: u32 },
    /// The left child is always the next node in the array.
    Interior { right: u32 },
}

#[derive(Debug, Copy, Clone)]
struct Node {
    bounds: Bounds3f,
    kind: NodeKind,
}

/// Binary BVH built by median splits on the widest centroid axis. The scene
/// holds the primitive storage; the BVH only stores a traversal order over
/// it, so both can be shared read-only across render workers.
#[derive(Debug)]
pub struct Bvh {
    nodes: Vec<Node>,
    order: Vec<u32>,
}

struct BuildPrim {
    index: u32,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl Bvh {
    pub fn build(prims: &[Primitive]) -> Self {
        let mut items: Vec<BuildPrim> = prims
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let bounds = p.bounds();
                BuildPrim {
                    index: i as u32,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * prims.len()),
            order: Vec::with_capacity(prims.len()),
        };
        if !items.is_empty() {
            bvh.build_node(&mut items);
        }
        bvh
    }

    fn build_node(&mut self, items: &mut [BuildPrim]) -> u32 {
        let bounds = items
            .iter()
            .fold(Bounds3f::empty(), |acc, it| acc.join(&it.bounds));
        let index = self.nodes.len() as u32;

        if items.len() <= MAX_LEAF_PRIMS {
            let first = self.order.len() as u32;
            self.order.extend(items.iter().map(|it| it.index));
            self.nodes.push(Node {
                bounds,
                kind: NodeKind::Leaf {
                    first,
                    count: items.len() as u32,
                },
            });
            return index;
        }

        let centroid_bounds = items
            .iter()
            .fold(Bounds3f::empty(), |acc, it| acc.join_point(it.centroid));
        let axis = centroid_bounds.max_extent();
        items.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(Ordering::Equal)
        });

        self.nodes.push(Node {
            bounds,
            kind: NodeKind::Interior { right: 0 },
        });
        let mid = items.len() / 2;
        let (left, right) = items.split_at_mut(mid);
        self.build_node(left);
        let right_index = self.build_node(right);
        self.nodes[index as usize].kind = NodeKind::Interior { right: right_index };
        index
    }

    /// Nearest hit along the ray, if any.
    pub fn intersect(&self, prims: &[Primitive], ray: &Ray) -> Option<SurfaceHit> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut ray = *ray;
        let inv_dir = Vec3f::new(1.0 / ray.dir.x, 1.0 / ray.dir.y, 1.0 / ray.dir.z);
        let mut best: Option<SurfaceHit> = None;
        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        stack.push(0);
        while let Some(ni) = stack.pop() {
            let node = &self.nodes[ni as usize];
            if !node.bounds.intersect_test(&ray, inv_dir) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { first, count } => {
                    for &pi in &self.order[first as usize..(first + count) as usize] {
                        if let Some(hit) = prims[pi as usize].intersect(&ray) {
                            ray.t_max = hit.t;
                            best = Some(hit);
                        }
                    }
                }
                NodeKind::Interior { right } => {
                    stack.push(right);
                    stack.push(ni + 1);
                }
            }
        }
        best
    }

    /// Any-hit query for shadow rays; stops at the first intersection.
    pub fn intersect_test(&self, prims: &[Primitive], ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let inv_dir = Vec3f::new(1.0 / ray.dir.x, 1.0 / ray.dir.y, 1.0 / ray.dir.z);
        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        stack.push(0);
        while let Some(ni) = stack.pop() {
            let node = &self.nodes[ni as usize];
            if !node.bounds.intersect_test(ray, inv_dir) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { first, count } => {
                    for &pi in &self.order[first as usize..(first + count) as usize] {
                        if prims[pi as usize].sphere.intersect(ray).is_some() {
                            return true;
                        }
                    }
                }
                NodeKind::Interior { right } => {
                    stack.push(right);
                    stack.push(ni + 1);
                }
            }
        }
        false
    }
}
