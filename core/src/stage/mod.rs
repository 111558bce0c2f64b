//! Stage definitions
//!
//! This module provides:
//! - **Definitions**: stage, move, and break tables loaded from TOML
//! - **Loader**: file and directory loading with validation
//! - **Registry**: id → definition lookup for stage selection

mod definition;
mod error;
mod loader;
mod registry;

pub use definition::{BreakEntry, BreakTimingRule, MoveDefinition, StageConfig, StageDefinition};
pub use error::StageError;
pub use loader::{load_stages_from_dir, load_stages_from_file, load_stages_from_str};
pub use registry::StageRegistry;
