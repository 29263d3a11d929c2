//! Configuration and manifest sources for chartkit.
//!
//! Both loaders come in two flavours: a strict one returning
//! `Result<Option<T>, E>` (`None` = file absent), and a soft one that degrades
//! to the default value and logs why. The tools use the soft flavour so they
//! stay usable on a partially scaffolded repository.

mod config;
mod manifest;

pub use config::{
    ConfigError, load_config, load_config_or_default, load_merged_config, load_yaml_value,
};
pub use manifest::{ManifestError, load_manifest, load_manifest_or_empty};
