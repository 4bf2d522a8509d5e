//! Lesson catalog backend: browse, filter and assemble security-awareness
//! lessons into courses, plus admin CRUD over the lesson catalog.

pub mod assembler;
pub mod config;
pub mod describe;
pub mod domain;
pub mod error;
pub mod filter;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod selection;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod util;
