pub mod config;
pub mod constants;
pub mod factory;
pub mod geometry;
pub mod placement;
pub mod state;

pub use config::*;
pub use factory::*;
pub use placement::*;
pub use state::*;
