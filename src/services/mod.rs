pub mod ranking;
pub mod server;

pub use ranking::RankingService;
pub use server::ServerService;
