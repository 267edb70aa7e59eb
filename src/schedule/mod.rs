pub mod latin_square;
pub mod rotation;
pub mod types;

pub use latin_square::LatinSquare;
pub use rotation::generate_schedule;
pub use types::{BoatConfig, BoatLineup, Coverage, PieceSpec, Schedule, ScheduleRequest};
