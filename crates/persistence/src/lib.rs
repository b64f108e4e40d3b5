//! Persistence layer for the FleetTrack backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Schema-capability detection for optional column families

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod schema;
