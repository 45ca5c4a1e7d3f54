pub mod config;
pub mod email;
pub mod event;
pub mod task;

pub use config::*;
pub use email::*;
pub use event::*;
pub use task::*;
