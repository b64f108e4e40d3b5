//! Domain layer for the FleetTrack backend.
//!
//! This crate contains:
//! - Tenant entity models (Account, User, Driver)
//! - Unit-of-measure enumerations and conversions
//! - Business logic services (password policy, property delegation,
//!   device authorization, provisioning, provider registries)

pub mod models;
pub mod services;
