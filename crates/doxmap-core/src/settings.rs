// Doxmap Settings Module
// Build-time identity and lighting options the dispatcher reads

use std::path::{Path, PathBuf};

/// Underglow effect number QMK uses for a static color.
pub const RGBLIGHT_MODE_STATIC: u8 = 1;

/// Options that the firmware would take from its build configuration.
///
/// These settings are loaded from a TOML file
/// (default: ~/.config/doxmap/settings.toml). Anything missing keeps the
/// value an ErgoDox EZ build of this keymap would have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Keyboard name reported by VRSN (e.g. "ergodox_ez")
    keyboard: String,

    /// Keymap name reported by VRSN
    keymap: String,

    /// Version string reported by VRSN
    version: String,

    /// Whether the underglow feature is compiled in
    rgblight_enabled: bool,

    /// Mode applied by RGB_SLD
    solid_mode: u8,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    identity: Option<IdentitySettings>,

    #[serde(default)]
    rgblight: Option<RgblightSettings>,
}

#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct IdentitySettings {
    #[serde(default)]
    keyboard: Option<String>,
    #[serde(default)]
    keymap: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct RgblightSettings {
    #[serde(default)]
    enabled: Option<toml::Value>,
    #[serde(default)]
    solid_mode: Option<i64>,
}

impl Settings {
    /// Settings for the stock ErgoDox EZ build
    pub fn new() -> Self {
        Self {
            keyboard: "ergodox_ez".to_string(),
            keymap: "anydoby".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rgblight_enabled: true,
            solid_mode: RGBLIGHT_MODE_STATIC,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    #[cfg(feature = "settings")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        log::debug!("loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings from TOML string
    #[cfg(feature = "settings")]
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(identity) = toml_settings.identity {
            if let Some(keyboard) = identity.keyboard {
                settings.keyboard = non_empty("identity.keyboard", keyboard)?;
            }
            if let Some(keymap) = identity.keymap {
                settings.keymap = non_empty("identity.keymap", keymap)?;
            }
            if let Some(version) = identity.version {
                settings.version = non_empty("identity.version", version)?;
            }
        }

        if let Some(rgblight) = toml_settings.rgblight {
            if let Some(enabled) = rgblight.enabled {
                settings.rgblight_enabled = parse_bool_value(&enabled)?;
            }
            if let Some(mode) = rgblight.solid_mode {
                settings.solid_mode = u8::try_from(mode).map_err(|_| {
                    SettingsError::InvalidValue(format!("rgblight.solid_mode {} is not 0-255", mode))
                })?;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    #[cfg(feature = "settings")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("doxmap").join("settings.toml"))
    }

    /// Load from default location (~/.config/doxmap/settings.toml)
    #[cfg(feature = "settings")]
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) => Self::load_or_default(path),
            None => Ok(Self::new()),
        }
    }

    /// Load `path` if it exists, otherwise the stock settings
    #[cfg(feature = "settings")]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        if path.as_ref().exists() {
            return Self::from_file(path);
        }
        log::debug!("no settings at {}, using defaults", path.as_ref().display());
        Ok(Self::new())
    }

    /// Reload settings from the original file
    #[cfg(feature = "settings")]
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        match self.source_path {
            Some(ref path) => {
                *self = Self::from_file(path)?;
                Ok(())
            }
            None => Err(SettingsError::InvalidValue("No source path set".to_string())),
        }
    }

    pub fn keyboard(&self) -> &str {
        &self.keyboard
    }

    pub fn keymap(&self) -> &str {
        &self.keymap
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rgblight_enabled(&self) -> bool {
        self.rgblight_enabled
    }

    pub fn solid_mode(&self) -> u8 {
        self.solid_mode
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The text typed by VRSN: `<keyboard>/<keymap> @ <version>`
    pub fn identification(&self) -> String {
        format!("{}/{} @ {}", self.keyboard, self.keymap, self.version)
    }

    pub fn with_identity(
        mut self,
        keyboard: impl Into<String>,
        keymap: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.keyboard = keyboard.into();
        self.keymap = keymap.into();
        self.version = version.into();
        self
    }

    pub fn with_rgblight(mut self, enabled: bool) -> Self {
        self.rgblight_enabled = enabled;
        self
    }
}

#[cfg(feature = "settings")]
fn non_empty(field: &str, value: String) -> Result<String, SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::InvalidValue(format!("{} must not be empty", field)));
    }
    Ok(value)
}

/// Parse a TOML value as a boolean
#[cfg(feature = "settings")]
fn parse_bool_value(value: &toml::Value) -> Result<bool, SettingsError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(SettingsError::InvalidValue(format!(
                "Cannot convert '{}' to boolean",
                s
            ))),
        },
        _ => Err(SettingsError::InvalidValue(format!(
            "Cannot convert {:?} to boolean",
            value
        ))),
    }
}

/// Default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Doxmap Settings
# Place this file at: ~/.config/doxmap/settings.toml

[identity]
# Reported by the VRSN key as "<keyboard>/<keymap> @ <version>"
keyboard = "ergodox_ez"
keymap = "anydoby"
# version = "0.3.0"

[rgblight]
# Set to false to build as if the underglow were not compiled in
enabled = true
# Effect mode applied by RGB_SLD
solid_mode = 1
"#
}
