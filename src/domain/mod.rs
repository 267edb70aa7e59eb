pub mod lineup;
pub mod models;

pub use lineup::{detect_swap, validate_piece};
pub use models::*;
