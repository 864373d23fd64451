//! # Configuration
//!
//! Funnel configuration is managed by [`confique`], which handles layered loading
//! from TOML files, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PORT`, `FUNNEL_HOST`, `FUNNEL_DIST_DIR`, `FUNNEL_ASSETS_DIR`.
//! 2. **Explicit file**: passed with `--config <path>`; must exist.
//! 3. **Project file**: `funnel.toml` in the working directory, if present.
//! 4. **Global file**: `funnel.toml` in the OS config directory (via `directories`).
//! 5. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `port` | `PORT` | `8080` | Listen port for `funnel serve` |
//! | `host` | `FUNNEL_HOST` | `127.0.0.1` | Bind address |
//! | `dist_dir` | `FUNNEL_DIST_DIR` | `web/dist` | Built pages, searched first for assets |
//! | `assets_dir` | `FUNNEL_ASSETS_DIR` | `web/src` | Source assets, searched second |
//! | `index_page` | | `app.html` | Page served at `/` |
//! | `filtering_page` | | `filtering.html` | Page served at `/filtering` |

use crate::error::Result;
use confique::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "funnel.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FunnelConfig {
    /// Port the static asset server listens on.
    #[config(env = "PORT", default = 8080)]
    pub port: u16,

    /// Address the static asset server binds to.
    #[config(env = "FUNNEL_HOST", default = "127.0.0.1")]
    pub host: String,

    /// Directory holding the built entry pages.
    #[config(env = "FUNNEL_DIST_DIR", default = "web/dist")]
    pub dist_dir: PathBuf,

    /// Fallback directory for scripts, styles and other source assets.
    #[config(env = "FUNNEL_ASSETS_DIR", default = "web/src")]
    pub assets_dir: PathBuf,

    /// File under `dist_dir` served at `/`.
    #[config(default = "app.html")]
    pub index_page: String,

    /// File under `dist_dir` served at `/filtering`.
    #[config(default = "filtering.html")]
    pub filtering_page: String,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            dist_dir: PathBuf::from("web/dist"),
            assets_dir: PathBuf::from("web/src"),
            index_page: "app.html".to_string(),
            filtering_page: "filtering.html".to_string(),
        }
    }
}

impl FunnelConfig {
    /// Load with the full resolution order, rooted at `cwd`.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = explicit {
            builder = builder.preloaded(required_layer(path)?);
        }
        builder = builder.file(cwd.join(CONFIG_FILE_NAME));
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        Ok(builder.load()?)
    }

    /// Load from a single file plus defaults, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::builder().preloaded(required_layer(path)?).load()?)
    }

    /// `host:port`, ready for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the asset directories against `root` when they are relative.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        if self.dist_dir.is_relative() {
            self.dist_dir = root.join(&self.dist_dir);
        }
        if self.assets_dir.is_relative() {
            self.assets_dir = root.join(&self.assets_dir);
        }
        self
    }
}

fn required_layer(path: &Path) -> Result<<FunnelConfig as Config>::Layer> {
    Ok(File::with_format(path, FileFormat::Toml).required().load()?)
}

/// `funnel.toml` inside the OS-appropriate config directory.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "funnel")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
