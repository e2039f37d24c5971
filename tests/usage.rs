use neartree::{distance::euclidean, NearTree, NearTreeError};

#[test]
fn basic_usage() {
    let mut tree = NearTree::new(euclidean::<2>);

    // Insert some points
    tree.insert([0.0, 0.0]);
    tree.insert([1.0, 0.0]);
    tree.insert([0.0, 1.0]);
    tree.insert([5.0, 5.0]);
    assert_eq!(tree.len(), 4);

    // The two nearest points to the origin are the origin itself and one of
    // the two points tied at distance 1
    let probe = [0.0, 0.0];
    let (points, distances) = tree.k_nearest(2, f64::INFINITY, &probe).unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0], &[0.0, 0.0]);
    assert!(points[1] == &[1.0, 0.0] || points[1] == &[0.0, 1.0]);
    assert_eq!(distances, vec![0.0, 1.0]);

    assert_eq!(tree.farthest(&probe).unwrap(), &[5.0, 5.0]);
    assert_eq!(
        tree.nearest_within_radius(0.5, &probe).unwrap(),
        Some(&[0.0, 0.0])
    );

    // Nothing lies within 0.5 of (3, 3)
    assert_eq!(tree.nearest_within_radius(0.5, &[3.0, 3.0]).unwrap(), None);
}

#[test]
fn dynamic_dimension_points() {
    use neartree::distance::euclidean_slice;

    let mut tree = NearTree::new(|a: &Vec<f64>, b: &Vec<f64>| euclidean_slice(a, b));
    tree.insert_sequential(vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 1.0, 1.0],
        vec![2.0, 2.0, 2.0],
    ]);
    assert_eq!(tree.nearest(&vec![1.9, 2.0, 2.1]).unwrap(), &vec![2.0, 2.0, 2.0]);
    assert_eq!(tree.farthest(&vec![1.9, 2.0, 2.1]).unwrap(), &vec![0.0, 0.0, 0.0]);
}

#[test]
fn invalid_parameters() {
    let mut tree = NearTree::new(euclidean::<2>);
    tree.insert([0.0, 0.0]);
    let probe = [0.0, 0.0];

    assert!(matches!(
        tree.k_nearest(0, 1.0, &probe),
        Err(NearTreeError::InvalidParameter(_))
    ));
    assert!(matches!(
        tree.nearest_within_radius(-0.1, &probe),
        Err(NearTreeError::InvalidParameter(_))
    ));
    assert!(matches!(
        tree.find_in_sphere(f64::NAN, &probe),
        Err(NearTreeError::InvalidParameter(_))
    ));
}

#[test]
fn node_visits_are_counted_and_reset() {
    let mut tree = NearTree::new(euclidean::<2>);
    tree.insert_random_order((0..100_i32).map(|i| [f64::from(i), 0.0]));
    assert_eq!(tree.node_visits(), 0);

    tree.nearest_within_radius(1.0, &[50.0, 0.0]).unwrap();
    let visits = tree.node_visits();
    assert!(visits > 0);
    tree.farthest(&[50.0, 0.0]).unwrap();
    assert!(tree.node_visits() > visits);

    tree.reset_node_visits();
    assert_eq!(tree.node_visits(), 0);
}
