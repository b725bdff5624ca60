//! Ambient plumbing shared by code store binaries: tracing setup, env config
//! loading and sea-orm helpers.

pub mod config;
pub mod sea_ext;
pub mod tracing;
