// Tabstash services
// Services provide core functionality: compression, tab list merging and extension options.

pub mod compression_service;
pub mod merge_resolver;
pub mod options_engine;
