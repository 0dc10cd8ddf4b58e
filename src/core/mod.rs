//! Configuration, wire models and timestamp rules shared by every surface.

pub mod config;
pub mod models;
pub mod timestamp;
