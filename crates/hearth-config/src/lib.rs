//! Configuration for the Hearth client and CLI.
//!
//! Provides TOML-based configuration with:
//! - The API base URL, request timeout and user agent
//! - The location of the persisted session file
//! - Config file layering (user config dir + project-local `hearth.toml`)
//! - Environment overrides (`HEARTH_API_URL`, `HEARTH_SESSION_FILE`,
//!   `HEARTH_TIMEOUT_SECS`)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, config_dir, config_path, data_dir, default_session_file, load_config,
    load_config_file, load_config_with_options, save_config,
};
pub use error::{ConfigError, Result};
pub use types::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
