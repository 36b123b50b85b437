// NestMap - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, serde, chrono.
// Must NOT depend on: platform, app, or any I/O beyond Write sinks.

pub mod catalog;
pub mod export;
pub mod filter;
pub mod geojson;
pub mod model;
