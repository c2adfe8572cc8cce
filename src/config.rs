//! # Application configuration
//!
//! One TOML file under `~/.config/heroslider/` holds the slider timing, the window
//! settings and the slide deck. Missing fields fall back to defaults, and a missing file
//! is created with the default deck on first start.

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::slider::{SlideView, SliderSettings};

const CONFIG_DIR: &str = ".config/heroslider";
const CONFIG_FILE: &str = "config.toml";

/// Host window settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub fullscreen: bool,
    pub width: f32,
    pub height: f32,
    /// Target frames per second for UI rendering
    pub fps: u8,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            width: 1280.0,
            height: 720.0,
            fps: 60,
        }
    }
}

/// One slide of the hero deck
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SlideConfig {
    pub title: String,
    #[serde(default)]
    pub caption: String,
    /// Background color as RGB
    #[serde(default = "default_accent")]
    pub accent: (u8, u8, u8),
}

fn default_accent() -> (u8, u8, u8) {
    (40, 44, 52)
}

impl From<&SlideConfig> for SlideView {
    fn from(slide: &SlideConfig) -> Self {
        SlideView::new(slide.title.clone(), slide.caption.clone(), slide.accent)
    }
}

/// Complete application configuration
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub slider: SliderSettings,
    pub window: WindowConfig,
    pub slides: Vec<SlideConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slider: SliderSettings::default(),
            window: WindowConfig::default(),
            slides: vec![
                SlideConfig {
                    title: "Stories worth reading".to_string(),
                    caption: "Fresh posts from the team every week".to_string(),
                    accent: (32, 58, 96),
                },
                SlideConfig {
                    title: "Built in the open".to_string(),
                    caption: "Follow along as we ship".to_string(),
                    accent: (96, 42, 64),
                },
                SlideConfig {
                    title: "Join the newsletter".to_string(),
                    caption: "One email a month, no noise".to_string(),
                    accent: (34, 90, 62),
                },
            ],
        }
    }
}

impl AppConfig {
    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        let mut path = get_home_dir();
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Writes the default configuration unless a file already exists at `path`
    pub async fn ensure_default(path: &Path) -> Result<()> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| eyre!("Failed to check if config file exists: {}", e))?;
        if exists {
            debug!("Config file present at {}", path.display());
            return Ok(());
        }

        info!("No config found, writing defaults to {}", path.display());
        AppConfig::default().save_to(path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| eyre!("Failed to parse config file: {}", e))?;

        if config.slides.is_empty() {
            warn!("Config defines no slides, hero slider will stay inert");
        }
        info!(
            "Loaded config with {} slides from {}",
            config.slides.len(),
            path.display()
        );
        Ok(config)
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| eyre!("Failed to write config file {}: {}", path.display(), e))?;
        debug!("Config written to {}", path.display());
        Ok(())
    }

    /// Ensures a config file exists at the default path and loads it
    pub async fn load_or_create() -> Result<Self> {
        let path = Self::default_path();
        Self::ensure_default(&path).await?;
        Self::load_from(&path).await
    }

    pub fn slide_views(&self) -> Vec<SlideView> {
        self.slides.iter().map(SlideView::from).collect()
    }
}

fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    })
}
