pub mod agenda;
pub mod cli;
pub mod clock;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;

pub use agenda::Agenda;
