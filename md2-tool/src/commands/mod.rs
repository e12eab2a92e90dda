//! Command implementations

pub mod md2;
