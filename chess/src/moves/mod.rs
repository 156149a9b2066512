mod base;

pub mod notation;

pub use base::*;
