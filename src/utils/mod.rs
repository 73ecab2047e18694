//! contains utils used in parsing dirs, parameters and dumps

pub mod dumpload;
pub mod files;
pub mod parameters;

pub use files::*;
pub use parameters::*;
