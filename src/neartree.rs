use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    config::Config,
    distance::Metric,
    error::{NearTreeError, Result},
    node::{self, Node, Points},
};

const STALE_DEPTH: usize = usize::MAX;

/// A metric tree answering exact nearest, k-nearest and farthest neighbor
/// queries over any point type with a distance function.
///
/// Points are added either one at a time with [`NearTree::insert`] or
/// buffered with [`NearTree::delay_insert`] and placed in bulk by
/// [`NearTree::complete_delayed_insert`] or
/// [`NearTree::complete_delayed_insert_random`]. Inserting pre-sorted data in
/// its original order produces long chains; the random completion order
/// avoids them.
pub struct NearTree<P, M> {
    pub(crate) metric: M,
    pub(crate) root: Option<Box<Node<P>>>,
    pub(crate) config: Config,
    len: usize,
    delayed: Vec<P>,
    rng: StdRng,
    node_visits: AtomicUsize,
    depth: AtomicUsize,
}

impl<P, M: Metric<P>> NearTree<P, M> {
    #[must_use]
    pub fn new(metric: M) -> Self {
        Self::with_config(metric, Config::default())
    }

    #[must_use]
    pub fn with_config(metric: M, config: Config) -> Self {
        NearTree {
            metric,
            root: None,
            config,
            len: 0,
            delayed: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
            node_visits: AtomicUsize::new(0),
            depth: AtomicUsize::new(0),
        }
    }

    /// Create a tree whose points are all buffered as delayed insertions.
    ///
    /// Nothing is searchable until one of the completion methods runs.
    #[must_use]
    pub fn from_points(metric: M, points: impl IntoIterator<Item = P>) -> Self {
        Self::from_points_with_config(metric, Config::default(), points)
    }

    /// Like [`NearTree::from_points`], with the seed and flags taken from
    /// `config`.
    #[must_use]
    pub fn from_points_with_config(
        metric: M,
        config: Config,
        points: impl IntoIterator<Item = P>,
    ) -> Self {
        let mut tree = Self::with_config(metric, config);
        tree.delayed.extend(points);
        tree
    }

    pub fn insert(&mut self, point: P) {
        node::insert(&mut self.root, &self.metric, point);
        self.len += 1;
        self.depth.store(STALE_DEPTH, Ordering::Relaxed);
    }

    /// Buffer a point until the next delayed-insert completion.
    pub fn delay_insert(&mut self, point: P) {
        self.delayed.push(point);
    }

    /// Insert every buffered point in the order it was buffered.
    pub fn complete_delayed_insert(&mut self) {
        let delayed = std::mem::take(&mut self.delayed);
        let count = delayed.len();
        for point in delayed {
            self.insert(point);
        }
        if count > 0 {
            debug!(
                "inserted {count} delayed points in buffer order, depth {}",
                self.depth()
            );
        }
    }

    /// Insert every buffered point in a pseudo-random order drawn from the
    /// tree's seeded generator.
    pub fn complete_delayed_insert_random(&mut self) {
        let mut delayed = std::mem::take(&mut self.delayed);
        let count = delayed.len();
        delayed.shuffle(&mut self.rng);
        for point in delayed {
            self.insert(point);
        }
        if count > 0 {
            debug!(
                "inserted {count} delayed points in random order, depth {}",
                self.depth()
            );
        }
    }

    pub fn insert_sequential(&mut self, points: impl IntoIterator<Item = P>) {
        self.delayed.extend(points);
        self.complete_delayed_insert();
    }

    pub fn insert_random_order(&mut self, points: impl IntoIterator<Item = P>) {
        self.delayed.extend(points);
        self.complete_delayed_insert_random();
    }
}

impl<P, M> NearTree<P, M> {
    /// Number of points placed in the tree; buffered points are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    /// Maximum number of edges from the root to any node.
    #[must_use]
    pub fn depth(&self) -> usize {
        let cached = self.depth.load(Ordering::Relaxed);
        if cached != STALE_DEPTH {
            return cached;
        }
        let depth = self.root.as_deref().map_or(0, node::depth);
        self.depth.store(depth, Ordering::Relaxed);
        depth
    }

    /// Total nodes examined by queries since creation or the last reset.
    #[must_use]
    pub fn node_visits(&self) -> usize {
        self.node_visits.load(Ordering::Relaxed)
    }

    pub fn reset_node_visits(&self) {
        self.node_visits.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_no_pre_prune(&mut self, no_pre_prune: bool) {
        self.config.no_pre_prune = no_pre_prune;
    }

    pub fn iter(&self) -> Points<'_, P> {
        Points::new(self.root.as_deref())
    }

    /// Drop every point, including buffered ones. Node visits are kept.
    pub fn clear(&mut self) {
        node::release(self.root.take());
        self.delayed.clear();
        self.len = 0;
        self.depth.store(0, Ordering::Relaxed);
    }

    pub(crate) fn root(&self) -> Result<&Node<P>> {
        self.root.as_deref().ok_or(NearTreeError::EmptyStructure)
    }

    pub(crate) fn record_visits(&self, visits: usize) {
        self.node_visits.fetch_add(visits, Ordering::Relaxed);
    }
}

impl<P, M> Drop for NearTree<P, M> {
    fn drop(&mut self) {
        node::release(self.root.take());
    }
}

impl<'a, P, M> IntoIterator for &'a NearTree<P, M> {
    type Item = &'a P;
    type IntoIter = Points<'a, P>;

    fn into_iter(self) -> Points<'a, P> {
        self.iter()
    }
}
