use crate::distance::Metric;

/// A node of the tree holding one or two points.
///
/// Every point reachable through `left` lies within `left_radius` of
/// `primary`, and every point reachable through `right` lies within
/// `right_radius` of `secondary`. Children exist only once both points are
/// present.
pub struct Node<P> {
    pub primary: P,
    pub secondary: Option<P>,
    pub left_radius: f64,
    pub right_radius: f64,
    pub left: Option<Box<Node<P>>>,
    pub right: Option<Box<Node<P>>>,
}

impl<P> Node<P> {
    #[must_use]
    pub fn new(point: P) -> Node<P> {
        Node {
            primary: point,
            secondary: None,
            left_radius: 0.0,
            right_radius: 0.0,
            left: None,
            right: None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Node<P>> {
        self.left.iter().chain(self.right.iter()).map(|child| &**child)
    }
}

/// Place `point` below `slot`, widening the radii along the descent path.
///
/// Returns the number of edges between the root and the node that received
/// the point.
pub fn insert<P, M: Metric<P>>(slot: &mut Option<Box<Node<P>>>, metric: &M, point: P) -> usize {
    let mut slot = slot;
    let mut level = 0;
    while let Some(node) = slot {
        let Some(secondary) = &node.secondary else {
            node.secondary = Some(point);
            return level;
        };
        let to_primary = metric.distance(&node.primary, &point);
        let to_secondary = metric.distance(secondary, &point);
        debug_assert!(
            to_primary >= 0.0 && to_secondary >= 0.0,
            "metric returned a negative distance"
        );

        // Ties go left.
        if to_primary <= to_secondary {
            node.left_radius = node.left_radius.max(to_primary);
            slot = &mut node.left;
        } else {
            node.right_radius = node.right_radius.max(to_secondary);
            slot = &mut node.right;
        }
        level += 1;
    }
    *slot = Some(Box::new(Node::new(point)));
    level
}

/// Maximum number of edges from `root` to any node below it.
pub fn depth<P>(root: &Node<P>) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 0)];
    while let Some((node, level)) = stack.pop() {
        deepest = deepest.max(level);
        for child in node.children() {
            stack.push((child, level + 1));
        }
    }
    deepest
}

/// Release a subtree without recursing, so long chains cannot exhaust the stack.
pub fn release<P>(root: Option<Box<Node<P>>>) {
    let mut stack: Vec<Box<Node<P>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Iterator over every point stored below a node, in depth-first order.
pub struct Points<'a, P> {
    stack: Vec<&'a Node<P>>,
    pending: Option<&'a P>,
}

impl<'a, P> Points<'a, P> {
    pub(crate) fn new(root: Option<&'a Node<P>>) -> Self {
        Points {
            stack: root.into_iter().collect(),
            pending: None,
        }
    }
}

impl<'a, P> Iterator for Points<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<&'a P> {
        if let Some(point) = self.pending.take() {
            return Some(point);
        }
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        self.pending = node.secondary.as_ref();
        Some(&node.primary)
    }
}

#[cfg(test)]
pub(crate) fn assert_radius_invariant<P, M: Metric<P>>(root: &Node<P>, metric: &M) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(left) = node.left.as_deref() {
            for point in Points::new(Some(left)) {
                assert!(metric.distance(&node.primary, point) <= node.left_radius);
            }
        }
        if let Some(right) = node.right.as_deref() {
            let secondary = node
                .secondary
                .as_ref()
                .expect("a node with children holds two points");
            for point in Points::new(Some(right)) {
                assert!(metric.distance(secondary, point) <= node.right_radius);
            }
        }
        stack.extend(node.children());
    }
}
