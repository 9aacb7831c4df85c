// Tabstash shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod metadata;
pub mod options;
pub mod tab;
pub mod tab_group;
