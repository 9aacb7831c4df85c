// Tabstash state managers
// Managers handle stateful operations: the metadata index, tab group persistence, browser state and tab group flows.

pub mod browser_state;
pub mod metadata_index;
pub mod persistence_engine;
pub mod tab_group_manager;
