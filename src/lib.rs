pub mod alt_lines;
pub mod config;
pub mod edge;
pub mod error;
pub mod game_log;
pub mod insights;
pub mod line;
pub mod prop_board;
pub mod seed;
pub mod window;

pub use config::{EngineConfig, ProbabilityTable};
pub use error::EngineError;
pub use seed::SeedKey;
pub use window::Window;
