pub mod context_name;
pub mod direct;
pub mod merge;
pub mod resolve;

use std::path::PathBuf;

use anyhow::Context as _;

pub use direct::KubeConfig;
pub use merge::{MergeReport, Merger};
pub use resolve::{
    Collision, EntityKind, LinePrompter, NamePrompter, ResolveError, ScriptedPrompter,
};

pub fn kube_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("Locating home directory")?;
    Ok(home.join(".kube"))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    kube_dir().map(|dir| dir.join("config"))
}
