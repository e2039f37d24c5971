use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use log::trace;
use ordered_float::OrderedFloat;

use crate::{
    distance::Metric,
    error::{check_count, check_radius, NearTreeError, Result},
    neartree::NearTree,
    node::Node,
};

/// A subtree waiting to be visited, with bounds on the distance from the
/// probe to any point inside it.
struct Branch<'a, P> {
    node: &'a Node<P>,
    lower: f64,
    upper: f64,
}

/// The objective of one traversal.
trait Search<'a, P> {
    /// Visit the child whose bound reaches farther first.
    const FAR_FIRST: bool = false;

    /// Whether a subtree with these distance bounds can be skipped.
    fn excludes(&self, lower: f64, upper: f64) -> bool;

    fn offer(&mut self, point: &'a P, distance: f64);
}

impl<P, M: Metric<P>> NearTree<P, M> {
    fn traverse<'a, S: Search<'a, P>>(&'a self, probe: &P, search: &mut S) -> Result<()> {
        let root = self.root()?;
        let pre_prune = !self.config.no_pre_prune;
        let mut visits = 0;
        let mut stack = vec![Branch {
            node: root,
            lower: 0.0,
            upper: f64::INFINITY,
        }];

        while let Some(branch) = stack.pop() {
            if pre_prune && search.excludes(branch.lower, branch.upper) {
                continue;
            }
            visits += 1;
            if search.excludes(branch.lower, branch.upper) {
                continue;
            }

            let node = branch.node;
            let to_primary = self.metric.distance(&node.primary, probe);
            search.offer(&node.primary, to_primary);
            let Some(secondary) = &node.secondary else {
                continue;
            };
            let to_secondary = self.metric.distance(secondary, probe);
            search.offer(secondary, to_secondary);

            let left = node.left.as_deref().map(|child| Branch {
                node: child,
                lower: to_primary - node.left_radius,
                upper: to_primary + node.left_radius,
            });
            let right = node.right.as_deref().map(|child| Branch {
                node: child,
                lower: to_secondary - node.right_radius,
                upper: to_secondary + node.right_radius,
            });
            let left_first = if S::FAR_FIRST {
                left.as_ref().map_or(0.0, |b| b.upper) >= right.as_ref().map_or(0.0, |b| b.upper)
            } else {
                to_primary <= to_secondary
            };
            let (first, second) = if left_first { (left, right) } else { (right, left) };

            // The stack is LIFO: push the less promising child first.
            for child in second.into_iter().chain(first) {
                if pre_prune && search.excludes(child.lower, child.upper) {
                    continue;
                }
                stack.push(child);
            }
        }

        trace!("traversal visited {visits} nodes");
        self.record_visits(visits);
        Ok(())
    }

    /// The closest point to `probe` within `radius`, or `None` if no point
    /// lies that close. Among equally close points the first one reached
    /// wins.
    pub fn nearest_within_radius(&self, radius: f64, probe: &P) -> Result<Option<&P>> {
        check_radius("radius", radius)?;
        let mut search = Nearest {
            limit: radius,
            best: None,
        };
        self.traverse(probe, &mut search)?;
        Ok(search.best)
    }

    /// The closest point to `probe`.
    pub fn nearest(&self, probe: &P) -> Result<&P> {
        self.nearest_within_radius(f64::INFINITY, probe)?
            .ok_or(NearTreeError::EmptyStructure)
    }

    /// Up to `k` points within `radius` of `probe`, nearest first, with their
    /// distances.
    pub fn k_nearest(&self, k: usize, radius: f64, probe: &P) -> Result<(Vec<&P>, Vec<f64>)> {
        check_count(k)?;
        check_radius("radius", radius)?;
        let mut search = KNearest {
            k,
            radius,
            discovered: 0,
            heap: BinaryHeap::with_capacity(k + 1),
        };
        self.traverse(probe, &mut search)?;
        Ok(search
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| (candidate.point, candidate.distance.0))
            .unzip())
    }

    /// The point farthest from `probe`.
    pub fn farthest(&self, probe: &P) -> Result<&P> {
        let mut search = Farthest { best: None };
        self.traverse(probe, &mut search)?;
        search
            .best
            .map(|(point, _)| point)
            .ok_or(NearTreeError::EmptyStructure)
    }

    /// Up to `k` points, farthest from `probe` first, with their distances.
    /// Among equally distant points the first ones reached are kept.
    pub fn k_farthest(&self, k: usize, probe: &P) -> Result<(Vec<&P>, Vec<f64>)> {
        check_count(k)?;
        let mut search = KFarthest {
            k,
            discovered: 0,
            heap: BinaryHeap::with_capacity(k + 1),
        };
        self.traverse(probe, &mut search)?;
        Ok(search
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|Far(candidate)| (candidate.point, candidate.distance.0))
            .unzip())
    }

    /// Every point within `radius` of `probe`, nearest first.
    pub fn find_in_sphere(&self, radius: f64, probe: &P) -> Result<(Vec<&P>, Vec<f64>)> {
        check_radius("radius", radius)?;
        let mut search = Collect::new(f64::NEG_INFINITY, radius);
        self.traverse(probe, &mut search)?;
        Ok(search.into_sorted(false))
    }

    /// Every point farther than `radius` from `probe`, farthest first.
    pub fn find_out_sphere(&self, radius: f64, probe: &P) -> Result<(Vec<&P>, Vec<f64>)> {
        check_radius("radius", radius)?;
        let mut search = Collect::new(radius, f64::INFINITY);
        self.traverse(probe, &mut search)?;
        Ok(search.into_sorted(true))
    }

    /// Every point whose distance `d` from `probe` satisfies
    /// `inner < d <= outer`, nearest first.
    pub fn find_in_annulus(
        &self,
        inner: f64,
        outer: f64,
        probe: &P,
    ) -> Result<(Vec<&P>, Vec<f64>)> {
        check_radius("inner radius", inner)?;
        check_radius("outer radius", outer)?;
        if inner > outer {
            return Err(NearTreeError::InvalidParameter(format!(
                "inner radius {inner} exceeds outer radius {outer}"
            )));
        }
        let mut search = Collect::new(inner, outer);
        self.traverse(probe, &mut search)?;
        Ok(search.into_sorted(false))
    }

    /// Number of points within `radius` of `probe`.
    pub fn count_in_sphere(&self, radius: f64, probe: &P) -> Result<usize> {
        check_radius("radius", radius)?;
        let mut search = Count { radius, count: 0 };
        self.traverse(probe, &mut search)?;
        Ok(search.count)
    }
}

struct Nearest<'a, P> {
    limit: f64,
    best: Option<&'a P>,
}

impl<'a, P> Search<'a, P> for Nearest<'a, P> {
    fn excludes(&self, lower: f64, _upper: f64) -> bool {
        lower > self.limit
    }

    fn offer(&mut self, point: &'a P, distance: f64) {
        if distance < self.limit || (self.best.is_none() && distance <= self.limit) {
            self.limit = distance;
            self.best = Some(point);
        }
    }
}

/// A point found by a k-bounded search, ordered by distance and then by the
/// order in which it was reached.
struct Candidate<'a, P> {
    distance: OrderedFloat<f64>,
    order: usize,
    point: &'a P,
}

impl<P> PartialEq for Candidate<'_, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Candidate<'_, P> {}

impl<P> PartialOrd for Candidate<'_, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Candidate<'_, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.distance, self.order).cmp(&(other.distance, other.order))
    }
}

struct KNearest<'a, P> {
    k: usize,
    radius: f64,
    discovered: usize,
    heap: BinaryHeap<Candidate<'a, P>>,
}

impl<'a, P> KNearest<'a, P> {
    fn limit(&self) -> f64 {
        match self.heap.peek() {
            Some(worst) if self.heap.len() == self.k => worst.distance.0.min(self.radius),
            _ => self.radius,
        }
    }
}

impl<'a, P> Search<'a, P> for KNearest<'a, P> {
    fn excludes(&self, lower: f64, _upper: f64) -> bool {
        lower > self.limit()
    }

    fn offer(&mut self, point: &'a P, distance: f64) {
        if distance > self.radius {
            return;
        }
        if self.heap.len() == self.k && distance >= self.limit() {
            return;
        }
        self.heap.push(Candidate {
            distance: OrderedFloat(distance),
            order: self.discovered,
            point,
        });
        self.discovered += 1;
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }
}

struct Farthest<'a, P> {
    best: Option<(&'a P, f64)>,
}

impl<'a, P> Search<'a, P> for Farthest<'a, P> {
    const FAR_FIRST: bool = true;

    fn excludes(&self, _lower: f64, upper: f64) -> bool {
        self.best.map_or(false, |(_, best)| upper <= best)
    }

    fn offer(&mut self, point: &'a P, distance: f64) {
        if self.best.map_or(true, |(_, best)| distance > best) {
            self.best = Some((point, distance));
        }
    }
}

/// Orders candidates so the heap top is the one to evict from a k-farthest
/// search: the nearest, and among equally near ones the last reached.
struct Far<'a, P>(Candidate<'a, P>);

impl<P> PartialEq for Far<'_, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Far<'_, P> {}

impl<P> PartialOrd for Far<'_, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Far<'_, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .distance
            .cmp(&self.0.distance)
            .then(self.0.order.cmp(&other.0.order))
    }
}

struct KFarthest<'a, P> {
    k: usize,
    discovered: usize,
    heap: BinaryHeap<Far<'a, P>>,
}

impl<'a, P> Search<'a, P> for KFarthest<'a, P> {
    const FAR_FIRST: bool = true;

    fn excludes(&self, _lower: f64, upper: f64) -> bool {
        match self.heap.peek() {
            Some(Far(nearest)) if self.heap.len() == self.k => upper <= nearest.distance.0,
            _ => false,
        }
    }

    fn offer(&mut self, point: &'a P, distance: f64) {
        if let Some(Far(nearest)) = self.heap.peek() {
            if self.heap.len() == self.k && distance <= nearest.distance.0 {
                return;
            }
        }
        self.heap.push(Far(Candidate {
            distance: OrderedFloat(distance),
            order: self.discovered,
            point,
        }));
        self.discovered += 1;
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }
}

/// Collects every point whose distance lies in `(inner, outer]`.
struct Collect<'a, P> {
    inner: f64,
    outer: f64,
    found: Vec<(&'a P, f64)>,
}

impl<'a, P> Collect<'a, P> {
    fn new(inner: f64, outer: f64) -> Self {
        Collect {
            inner,
            outer,
            found: Vec::new(),
        }
    }

    fn into_sorted(mut self, descending: bool) -> (Vec<&'a P>, Vec<f64>) {
        if descending {
            self.found
                .sort_by_key(|(_, distance)| Reverse(OrderedFloat(*distance)));
        } else {
            self.found.sort_by_key(|(_, distance)| OrderedFloat(*distance));
        }
        self.found.into_iter().unzip()
    }
}

impl<'a, P> Search<'a, P> for Collect<'a, P> {
    fn excludes(&self, lower: f64, upper: f64) -> bool {
        lower > self.outer || upper <= self.inner
    }

    fn offer(&mut self, point: &'a P, distance: f64) {
        if self.inner < distance && distance <= self.outer {
            self.found.push((point, distance));
        }
    }
}

struct Count {
    radius: f64,
    count: usize,
}

impl<'a, P> Search<'a, P> for Count {
    fn excludes(&self, lower: f64, _upper: f64) -> bool {
        lower > self.radius
    }

    fn offer(&mut self, _point: &'a P, distance: f64) {
        if distance <= self.radius {
            self.count += 1;
        }
    }
}
