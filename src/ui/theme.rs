//! Colour scheme for the panel screens.
//!
//! The built-in scheme reproduces the player's stock look: white on black, red
//! folder names in magenta frames, indigo buttons and a blue farewell screen.
//! Custom schemes are loaded from TOML files.
//!
//! # TOML Format
//!
//! ```toml
//! name = "night"
//!
//! [colors]
//! background = "#000000"
//! text = "#ffffff"
//! list_border = "#ff00ff"
//! list_text = "#ff0000"
//! button_bg = "#4b0082"
//! button_text = "#ffffff"
//! farewell_bg = "#0000ff"
//! ```

use crate::domain::{Result, TagsyncError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colour scheme configuration for screen rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Colour palette for all screen elements.
    pub colors: ThemeColors,
}

/// Colour definitions as hex strings (e.g. `"#ff00ff"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
    /// Frame around each folder row.
    pub list_border: String,
    /// Folder names.
    pub list_text: String,
    pub button_bg: String,
    pub button_text: String,
    /// Background of the screen shown on exit.
    pub farewell_bg: String,
}

impl Theme {
    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| TagsyncError::Config(format!("failed to read theme {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| TagsyncError::Config(format!("failed to parse theme {}: {e}", path.display())))
    }

    /// Converts a hex colour to [`Rgb`].
    ///
    /// Strips a `#` prefix if present. Malformed values fall back to white.
    #[must_use]
    pub fn rgb(hex: &str) -> Rgb {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return Rgb(255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        Rgb(channel(0..2), channel(2..4), channel(4..6))
    }

    pub fn background(&self) -> Rgb {
        Self::rgb(&self.colors.background)
    }

    pub fn text(&self) -> Rgb {
        Self::rgb(&self.colors.text)
    }

    pub fn list_border(&self) -> Rgb {
        Self::rgb(&self.colors.list_border)
    }

    pub fn list_text(&self) -> Rgb {
        Self::rgb(&self.colors.list_text)
    }

    pub fn button_bg(&self) -> Rgb {
        Self::rgb(&self.colors.button_bg)
    }

    pub fn button_text(&self) -> Rgb {
        Self::rgb(&self.colors.button_text)
    }

    pub fn farewell_bg(&self) -> Rgb {
        Self::rgb(&self.colors.farewell_bg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "classic".to_string(),
            colors: ThemeColors {
                background: "#000000".to_string(),
                text: "#ffffff".to_string(),
                list_border: "#ff00ff".to_string(),
                list_text: "#ff0000".to_string(),
                button_bg: "#4b0082".to_string(),
                button_text: "#ffffff".to_string(),
                farewell_bg: "#0000ff".to_string(),
            },
        }
    }
}
