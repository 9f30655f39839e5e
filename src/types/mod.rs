//! Type system for stop programs

mod type_system;

pub use type_system::{Type, STRING_DELIMITER};
