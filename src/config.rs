//! Configuration file handling for ascii-mosaic.
//!
//! Loads configuration from `<config dir>/ascii-mosaic/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Glyph width used when neither the config file nor the CLI sets one.
pub const DEFAULT_SIZE: u32 = 8;

/// Configuration file structure for ascii-mosaic.
/// Loaded from the user config dir (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub ascii: AsciiConfig,
    #[serde(default)]
    pub pixelize: PixelizeConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// TrueType/OpenType font used to draw glyphs.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Glyph width in pixels; the height follows the font's line height.
    #[serde(default = "default_size")]
    pub size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: None,
            size: DEFAULT_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AsciiConfig {
    /// Characters to draw with. Absent means every printable character.
    #[serde(default)]
    pub subset: Option<String>,
    #[serde(default)]
    pub color: bool,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct PixelizeConfig {
    #[serde(default)]
    pub block_size: Option<u32>,
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Pixelization block size: `[pixelize] block_size`, else `[render] size`.
    pub fn block_size(&self) -> u32 {
        self.pixelize.block_size.unwrap_or(self.render.size)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("ascii-mosaic").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-mosaic/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# ascii-mosaic configuration

[render]
# Font used to draw glyphs (required for ASCII art)
# font = "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf"
# Glyph width in pixels; the height follows the font's line height
size = 8

[ascii]
# Characters to draw with, lightest first. Leave unset for every printable
# character, ordered by how much ink each one uses.
# subset = " .,:;ox%#@"
# Tint glyphs with the average color of the block they replace
color = false

[pixelize]
# Block edge in pixels (defaults to render.size)
# block_size = 8
"#;
