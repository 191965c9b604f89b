// Library exports for the playerstats command line, used by tests

pub mod commands;
pub mod common;
pub mod error_utils;
