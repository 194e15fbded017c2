pub mod catalog;
pub mod config;
pub mod journey;
pub mod schedule;
