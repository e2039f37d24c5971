//! A near tree: exact nearest, k-nearest and farthest neighbor search over
//! any point type equipped with a metric.
//!
//! ```
//! use neartree::{distance::euclidean, NearTree};
//!
//! let mut tree = NearTree::new(euclidean::<2>);
//! tree.insert_random_order([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]]);
//!
//! assert_eq!(tree.farthest(&[0.0, 0.0]).unwrap(), &[5.0, 5.0]);
//! let (points, distances) = tree.k_nearest(2, f64::INFINITY, &[0.0, 0.0]).unwrap();
//! assert_eq!(points[0], &[0.0, 0.0]);
//! assert_eq!(distances[1], 1.0);
//! ```

mod config;
pub mod distance;
mod error;
#[allow(clippy::module_name_repetitions)]
mod neartree;
mod node;
mod query;
mod stats;

pub use config::Config;
pub use distance::Metric;
pub use error::{NearTreeError, Result};
pub use neartree::NearTree;
pub use node::Points;
