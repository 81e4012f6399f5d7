//! TOML configuration for the viewer.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::color::Color;
use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Any color `Color::parse` accepts.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: default_width(),
            height: default_height(),
            background: default_background(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Start in alpha-mask mode.
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub debug: bool,
    /// TTF/OTF used for labels. Without one, labels are skipped.
    pub font: Option<PathBuf>,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { mask: false, debug: false, font: None, fps: default_fps() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_socket")]
    pub socket: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig { socket: default_socket() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Preset file. Defaults to the user data directory.
    pub path: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load config with fallback chain:
    /// 1. $GAMEPAD_VISUALIZER_CONFIG env var
    /// 2. ./gamepad-visualizer.toml
    /// 3. $HOME/.config/gamepad-visualizer/config.toml
    /// 4. Built-in defaults
    pub fn find_and_load() -> Self {
        let candidates: Vec<PathBuf> = vec![
            std::env::var("GAMEPAD_VISUALIZER_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("gamepad-visualizer.toml")),
            home_dir().map(|h| h.join(".config/gamepad-visualizer/config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in &candidates {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => warn!("Failed to load {}: {e}", path.display()),
                }
            }
        }

        info!("Using built-in default config");
        ViewerConfig::default()
    }

    /// Configured background, or mid grey when it does not parse.
    pub fn background(&self) -> Color {
        Color::parse(&self.canvas.background).unwrap_or_else(|| {
            warn!("Unparseable background {:?}, using grey", self.canvas.background);
            Color::rgb(0x80, 0x80, 0x80)
        })
    }

    pub fn store_path(&self) -> PathBuf {
        if let Some(p) = &self.store.path {
            return p.clone();
        }
        match home_dir() {
            Some(h) => h.join(".local/share/gamepad-visualizer/styles.toml"),
            None => PathBuf::from("gamepad-visualizer-styles.toml"),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_background() -> String { "#808080".into() }
fn default_fps() -> u32 { 60 }
fn default_socket() -> PathBuf { PathBuf::from("/tmp/gamepad-visualizer.sock") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_viewer_toml() {
        let toml_str = r##"
[canvas]
width = 1920
height = 1080
background = "#00ff00"

[render]
mask = true
font = "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"
fps = 30

[feed]
socket = "/run/user/1000/pads.sock"

[store]
path = "/tmp/styles.toml"
"##;
        let config: ViewerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.canvas.width, 1920);
        assert_eq!(config.background(), Color::rgb(0, 255, 0));
        assert!(config.render.mask);
        assert!(!config.render.debug);
        assert_eq!(config.render.fps, 30);
        assert_eq!(config.feed.socket, PathBuf::from("/run/user/1000/pads.sock"));
        assert_eq!(config.store_path(), PathBuf::from("/tmp/styles.toml"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: ViewerConfig = toml::from_str("[render]\ndebug = true\n").unwrap();
        assert!(config.render.debug);
        assert_eq!(config.render.fps, 60);
        assert_eq!((config.canvas.width, config.canvas.height), (1280, 720));
        assert_eq!(config.feed.socket, PathBuf::from("/tmp/gamepad-visualizer.sock"));
        assert!(config.render.font.is_none());
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[canvas\nwidth = ").unwrap();
        assert!(matches!(ViewerConfig::load(&path), Err(crate::error::Error::ConfigParse(_))));
        assert!(matches!(ViewerConfig::load(&dir.path().join("none.toml")), Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn bad_background_falls_back() {
        let config: ViewerConfig = toml::from_str("[canvas]\nbackground = \"plaid\"\n").unwrap();
        assert_eq!(config.background(), Color::rgb(0x80, 0x80, 0x80));
    }
}
