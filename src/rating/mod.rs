pub mod bradley_terry;
pub mod confidence;
pub mod convergence;
pub mod edges;
pub mod engine;
pub mod graph;
pub mod ranking;
pub mod types;
pub mod weighting;

pub use edges::derive_edges;
pub use engine::calculate_ratings;
pub use graph::ComparisonGraph;
pub use types::{Comparison, Evaluation, MatchupEdge};
pub use weighting::calculate_weight;
