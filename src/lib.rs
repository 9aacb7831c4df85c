//! Tabstash: save browser tab groups into chunked, compressed sync storage and restore them.
//!
//! This library crate exposes all modules for use by the host binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
