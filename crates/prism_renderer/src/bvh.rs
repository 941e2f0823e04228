//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The tree is a flat array of nodes. A branch stores the index of its left
//! child and the right child always sits immediately after it, so the tree
//! never owns pointers and the array is append-only while building.
//!
//! Construction splits each node at the spatial midpoint of its longest
//! axis. When every centroid lands on one side the range is split at its
//! index median instead, so recursion always makes progress.

use std::sync::Arc;

use crate::accelerator::{Accelerator, Hit};
use crate::primitive::Primitive;
use prism_math::{Aabb, Ray, Vec3, EPSILON};

/// Maximum primitives per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node. Children live at `left` and `left + 1`.
    Branch { bbox: Aabb, left: usize },
    /// Leaf covering `count` primitives starting at `first`.
    Leaf {
        bbox: Aabb,
        first: usize,
        count: usize,
    },
}

impl BvhNode {
    pub fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

/// What a traversal is looking for.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Query {
    /// Keep searching for the closest hit.
    Nearest,
    /// Stop at the first hit inside the valid range.
    Any,
}

/// Pending subtree and the ray parameter where the ray enters its box.
struct StackItem {
    node: usize,
    t: f32,
}

/// Bounding volume hierarchy over a set of primitives.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    /// Primitives in leaf order
    primitives: Vec<Arc<dyn Primitive>>,
}

impl Bvh {
    /// Build a BVH with leaves of at most `leaf_size` primitives.
    pub fn with_leaf_size(primitives: Vec<Arc<dyn Primitive>>, leaf_size: usize) -> Self {
        let n = primitives.len();
        let bounds: Vec<Aabb> = primitives.iter().map(|p| p.bounding_box()).collect();
        let centroids: Vec<Vec3> = bounds.iter().map(Aabb::centroid).collect();

        let mut builder = Builder {
            bounds: &bounds,
            centroids: &centroids,
            order: (0..n).collect(),
            nodes: Vec::with_capacity(2 * n.div_ceil(leaf_size.max(1)) + 1),
            leaf_size: leaf_size.max(1),
        };

        let root_box = builder.range_bounds(0, n).padded(EPSILON);
        builder.nodes.push(BvhNode::Leaf {
            bbox: root_box,
            first: 0,
            count: n,
        });
        if n > 0 {
            builder.build_recursive(0, n, 0);
        }

        let Builder { order, nodes, .. } = builder;
        let primitives: Vec<Arc<dyn Primitive>> =
            order.iter().map(|&i| Arc::clone(&primitives[i])).collect();

        let bvh = Self { nodes, primitives };
        log::info!(
            "Built BVH: {} primitives, {} nodes, {} leaves, depth {}",
            n,
            bvh.nodes.len(),
            bvh.leaf_count(),
            bvh.depth()
        );
        bvh
    }

    /// Node array, root first.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitives in the order the leaves reference them.
    pub fn primitives(&self) -> &[Arc<dyn Primitive>] {
        &self.primitives
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let BvhNode::Branch { left, .. } = self.nodes[node] {
                stack.push((left, depth + 1));
                stack.push((left + 1, depth + 1));
            }
        }
        deepest
    }

    /// Entry parameter into `bbox`, 0 when the origin is already inside.
    #[inline]
    fn entry(bbox: &Aabb, ray: &Ray) -> Option<f32> {
        if bbox.is_inside(ray.origin) {
            Some(0.0)
        } else {
            bbox.intercepts(ray)
        }
    }

    /// Nearest-child-first traversal with branch-and-bound pruning.
    ///
    /// Returns the leaf-order index of the accepted primitive and its ray
    /// parameter. Only hits with `EPSILON < t < limit` are accepted; for
    /// `Query::Any` the first accepted hit ends the search.
    fn traverse(&self, ray: &Ray, query: Query, limit: f32) -> Option<(usize, f32)> {
        let root_t = Self::entry(self.nodes[0].bbox(), ray)?;

        let mut best_t = limit;
        let mut best = None;
        let mut stack = Vec::with_capacity(32);
        stack.push(StackItem { node: 0, t: root_t });

        while let Some(item) = stack.pop() {
            // This subtree cannot beat what we already have
            if item.t >= best_t {
                continue;
            }

            let mut current = Some(item.node);
            while let Some(node) = current {
                match self.nodes[node] {
                    BvhNode::Leaf { first, count, .. } => {
                        for i in first..first + count {
                            if let Some(t) = self.primitives[i].intersect(ray) {
                                if t > EPSILON && t < best_t {
                                    best_t = t;
                                    best = Some(i);
                                    if query == Query::Any {
                                        return Some((i, t));
                                    }
                                }
                            }
                        }
                        current = None;
                    }
                    BvhNode::Branch { left, .. } => {
                        let right = left + 1;
                        let t_left = Self::entry(self.nodes[left].bbox(), ray);
                        let t_right = Self::entry(self.nodes[right].bbox(), ray);

                        current = match (t_left, t_right) {
                            (Some(tl), Some(tr)) => {
                                let (near, far, t_far) =
                                    if tl <= tr { (left, right, tr) } else { (right, left, tl) };
                                stack.push(StackItem { node: far, t: t_far });
                                Some(near)
                            }
                            (Some(_), None) => Some(left),
                            (None, Some(_)) => Some(right),
                            (None, None) => None,
                        };
                    }
                }
            }
        }

        best.map(|i| (i, best_t))
    }
}

impl Accelerator for Bvh {
    fn build(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        Self::with_leaf_size(primitives, LEAF_MAX_SIZE)
    }

    fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.traverse(ray, Query::Nearest, f32::INFINITY)
            .map(|(i, t)| Hit::new(self.primitives[i].as_ref(), ray, t))
    }

    fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool {
        self.traverse(ray, Query::Any, max_distance).is_some()
    }

    fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}

/// Build-time state. Primitives are addressed through `order`, which is
/// permuted in place and becomes the final leaf order.
struct Builder<'a> {
    bounds: &'a [Aabb],
    centroids: &'a [Vec3],
    order: Vec<usize>,
    nodes: Vec<BvhNode>,
    leaf_size: usize,
}

impl Builder<'_> {
    /// Tight union of the boxes in `order[left..right]`.
    fn range_bounds(&self, left: usize, right: usize) -> Aabb {
        let mut bbox = Aabb::EMPTY;
        for &i in &self.order[left..right] {
            bbox.extend(&self.bounds[i]);
        }
        bbox
    }

    fn build_recursive(&mut self, left: usize, right: usize, node: usize) {
        let bbox = *self.nodes[node].bbox();
        if right - left <= self.leaf_size {
            self.nodes[node] = BvhNode::Leaf {
                bbox,
                first: left,
                count: right - left,
            };
            return;
        }

        let axis = bbox.longest_axis();
        let mid = bbox.axis_interval(axis).center();

        let centroids = self.centroids;
        self.order[left..right]
            .sort_unstable_by(|&a, &b| centroids[a][axis].total_cmp(&centroids[b][axis]));

        let mut split = left
            + self.order[left..right].partition_point(|&i| centroids[i][axis] < mid);
        if split == left || split == right {
            // Everything on one side of the midpoint
            split = left + (right - left) / 2;
        }

        let child = self.nodes.len();
        let left_box = self.range_bounds(left, split);
        let right_box = self.range_bounds(split, right);
        self.nodes.push(BvhNode::Leaf {
            bbox: left_box,
            first: left,
            count: split - left,
        });
        self.nodes.push(BvhNode::Leaf {
            bbox: right_box,
            first: split,
            count: right - split,
        });
        self.nodes[node] = BvhNode::Branch { bbox, left: child };

        self.build_recursive(left, split, child);
        self.build_recursive(split, right, child + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aa_box::AaBox;
    use crate::accelerator::LinearScan;
    use crate::sphere::Sphere;
    use prism_core::Material;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_spheres(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Primitive>> {
        let material = Arc::new(Material::default());
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let radius = rng.gen_range(0.2..1.0);
                Arc::new(Sphere::new(center, radius, Arc::clone(&material))) as Arc<dyn Primitive>
            })
            .collect()
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let origin = Vec3::new(
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
        );
        let target = Vec3::new(
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
        );
        Ray::new(origin, (target - origin).normalize_or_zero())
    }

    fn same_primitive(a: &dyn Primitive, b: &dyn Primitive) -> bool {
        std::ptr::eq(a as *const dyn Primitive as *const (), b as *const dyn Primitive as *const ())
    }

    /// Collect the leaf ranges reachable from `node`, checking containment on the way.
    fn collect_leaves(bvh: &Bvh, node: usize, ranges: &mut Vec<(usize, usize)>) {
        match bvh.nodes()[node] {
            BvhNode::Leaf { bbox, first, count } => {
                for p in &bvh.primitives()[first..first + count] {
                    assert!(bbox.contains_box(&p.bounding_box()));
                }
                ranges.push((first, count));
            }
            BvhNode::Branch { bbox, left } => {
                assert!(bbox.contains_box(bvh.nodes()[left].bbox()));
                assert!(bbox.contains_box(bvh.nodes()[left + 1].bbox()));
                collect_leaves(bvh, left, ranges);
                collect_leaves(bvh, left + 1, ranges);
            }
        }
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = Bvh::build(Vec::new());
        assert_eq!(bvh.nodes().len(), 1);
        assert!(bvh.nodes()[0].is_leaf());
        assert!(bvh.nearest_hit(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
        assert!(!bvh.any_hit(&Ray::new(Vec3::ZERO, Vec3::X), f32::INFINITY));
    }

    #[test]
    fn test_single_primitive() {
        let sphere: Arc<dyn Primitive> =
            Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Material::default()));
        let bvh = Bvh::build(vec![sphere]);

        assert_eq!(bvh.nodes().len(), 1);
        let hit = bvh.nearest_hit(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_axis_split_three_boxes() {
        let material = Arc::new(Material::default());
        let boxes: Vec<Arc<dyn Primitive>> = (0..3)
            .map(|i| {
                let center = Vec3::new(i as f32 * 2.0, 0.0, 0.0);
                Arc::new(AaBox::unit(center, Arc::clone(&material))) as Arc<dyn Primitive>
            })
            .collect();

        let bvh = Bvh::with_leaf_size(boxes, 1);

        assert_eq!(bvh.nodes().len(), 5);
        assert_eq!(bvh.leaf_count(), 3);
        assert_eq!(bvh.depth(), 2);
        for node in bvh.nodes() {
            if let BvhNode::Leaf { count, .. } = node {
                assert_eq!(*count, 1);
            }
        }

        // Root split separates children along x
        let BvhNode::Branch { left, .. } = bvh.nodes()[0] else {
            panic!("root should be a branch");
        };
        let l = bvh.nodes()[left].bbox();
        let r = bvh.nodes()[left + 1].bbox();
        assert!(l.x.max <= r.x.min);
    }

    #[test]
    fn test_degenerate_split_falls_back_to_median() {
        // Identical centroids, the midpoint split can never separate them
        let material = Arc::new(Material::default());
        let spheres: Vec<Arc<dyn Primitive>> = (0..10)
            .map(|_| Arc::new(Sphere::new(Vec3::ZERO, 1.0, Arc::clone(&material))) as Arc<dyn Primitive>)
            .collect();

        let bvh = Bvh::with_leaf_size(spheres, 1);
        assert_eq!(bvh.leaf_count(), 10);
        assert!(bvh.nearest_hit(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)).is_some());
    }

    #[test]
    fn test_partition_completeness_and_containment() {
        let mut rng = StdRng::seed_from_u64(42);
        let prims = random_spheres(&mut rng, 200);
        let originals: Vec<*const ()> = prims.iter().map(|p| Arc::as_ptr(p) as *const ()).collect();

        let bvh = Bvh::build(prims);

        let mut ranges = Vec::new();
        collect_leaves(&bvh, 0, &mut ranges);

        // Leaf ranges tile [0, n) in array order
        ranges.sort();
        let mut next = 0;
        for (first, count) in ranges {
            assert_eq!(first, next);
            assert!(count <= LEAF_MAX_SIZE);
            next = first + count;
        }
        assert_eq!(next, 200);

        // Reordered primitives are a permutation of the input
        let mut reordered: Vec<*const ()> =
            bvh.primitives().iter().map(|p| Arc::as_ptr(p) as *const ()).collect();
        let mut expected = originals;
        reordered.sort();
        expected.sort();
        assert_eq!(reordered, expected);
    }

    #[test]
    fn test_children_are_strictly_smaller() {
        let mut rng = StdRng::seed_from_u64(7);
        let bvh = Bvh::with_leaf_size(random_spheres(&mut rng, 64), 2);

        let count = |node: &BvhNode| -> usize {
            let mut total = 0;
            let mut stack = vec![*node];
            while let Some(n) = stack.pop() {
                match n {
                    BvhNode::Leaf { count, .. } => total += count,
                    BvhNode::Branch { left, .. } => {
                        stack.push(bvh.nodes()[left]);
                        stack.push(bvh.nodes()[left + 1]);
                    }
                }
            }
            total
        };

        for node in bvh.nodes() {
            if let BvhNode::Branch { left, .. } = node {
                let parent = count(node);
                let a = count(&bvh.nodes()[*left]);
                let b = count(&bvh.nodes()[*left + 1]);
                assert!(a > 0 && b > 0);
                assert!(a < parent && b < parent);
                assert_eq!(a + b, parent);
            }
        }
    }

    #[test]
    fn test_any_hit_max_distance() {
        let sphere: Arc<dyn Primitive> =
            Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::default()));
        let bvh = Bvh::build(vec![sphere]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(bvh.any_hit(&ray, 10.0));
        assert!(!bvh.any_hit(&ray, 3.0));
    }

    #[test]
    fn test_ray_starting_inside_scene() {
        let mut rng = StdRng::seed_from_u64(3);
        let prims = random_spheres(&mut rng, 50);
        let scan = LinearScan::build(prims.clone());
        let bvh = Bvh::build(prims);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.3, -0.2).normalize());
        let a = bvh.nearest_hit(&ray).map(|h| h.distance);
        let b = scan.nearest_hit(&ray).map(|h| h.distance);
        match (a, b) {
            (Some(a), Some(b)) => assert!((a - b).abs() < 1e-4),
            (None, None) => {}
            _ => panic!("bvh and linear scan disagree"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_matches_linear_scan(seed in any::<u64>(), count in 0usize..120, leaf_size in 1usize..6) {
            let mut rng = StdRng::seed_from_u64(seed);
            let prims = random_spheres(&mut rng, count);
            let scan = LinearScan::build(prims.clone());
            let bvh = Bvh::with_leaf_size(prims, leaf_size);

            for _ in 0..64 {
                let ray = random_ray(&mut rng);

                match (bvh.nearest_hit(&ray), scan.nearest_hit(&ray)) {
                    (Some(a), Some(b)) => {
                        prop_assert!((a.distance - b.distance).abs() < 1e-4);
                        prop_assert!(same_primitive(a.primitive, b.primitive));
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "nearest hit disagrees"),
                }

                let max_distance = rng.gen_range(0.5..30.0);
                prop_assert_eq!(bvh.any_hit(&ray, max_distance), scan.any_hit(&ray, max_distance));
            }
        }
    }
}
