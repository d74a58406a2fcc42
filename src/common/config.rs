use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MAX_WORKSPACES: usize = 32;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".sash.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub workspaces: WorkspaceSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub float: FloatSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Gap between windows and around the tiling area, in pixels. Split
    /// handles occupy the 2*gap band between adjacent panes.
    #[serde(default = "default_gap")]
    pub gap: f64,
}

/// Geometry for windows pulled out of the tiling tree.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FloatSettings {
    /// Rect assigned when a window is toggled to floating.
    #[serde(default = "default_float_x")]
    pub default_x: f64,
    #[serde(default = "default_float_y")]
    pub default_y: f64,
    #[serde(default = "default_float_width")]
    pub default_width: f64,
    #[serde(default = "default_float_height")]
    pub default_height: f64,
    /// Floating windows are never resized below these.
    #[serde(default = "default_float_min_width")]
    pub min_width: f64,
    #[serde(default = "default_float_min_height")]
    pub min_height: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    #[serde(default = "default_workspace_count")]
    pub count: usize,
    /// Display names for the status-bar layer; slots without a name fall
    /// back to their number.
    #[serde(default = "default_workspace_names")]
    pub names: Vec<String>,
}

impl Default for LayoutSettings {
    fn default() -> Self { Self { gap: default_gap() } }
}

impl Default for FloatSettings {
    fn default() -> Self {
        Self {
            default_x: default_float_x(),
            default_y: default_float_y(),
            default_width: default_float_width(),
            default_height: default_float_height(),
            min_width: default_float_min_width(),
            min_height: default_float_min_height(),
        }
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            count: default_workspace_count(),
            names: default_workspace_names(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.gap.is_finite() || self.gap < 0.0 {
            issues.push(format!("gap must be non-negative, got {}", self.gap));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !self.gap.is_finite() || self.gap < 0.0 {
            self.gap = default_gap();
            fixes += 1;
        }

        fixes
    }
}

impl FloatSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value) in [
            ("default_width", self.default_width),
            ("default_height", self.default_height),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                issues.push(format!("{} must be positive, got {}", name, value));
            }
        }

        if self.min_width > self.default_width {
            issues.push(format!(
                "min_width ({}) exceeds default_width ({})",
                self.min_width, self.default_width
            ));
        }
        if self.min_height > self.default_height {
            issues.push(format!(
                "min_height ({}) exceeds default_height ({})",
                self.min_height, self.default_height
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        let stock = FloatSettings::default();

        for (value, fallback) in [
            (&mut self.default_width, stock.default_width),
            (&mut self.default_height, stock.default_height),
            (&mut self.min_width, stock.min_width),
            (&mut self.min_height, stock.min_height),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                *value = fallback;
                fixes += 1;
            }
        }

        if self.min_width > self.default_width {
            self.min_width = self.default_width;
            fixes += 1;
        }
        if self.min_height > self.default_height {
            self.min_height = self.default_height;
            fixes += 1;
        }

        fixes
    }
}

impl WorkspaceSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.count == 0 {
            issues.push("workspace count must be at least 1".to_string());
        }
        if self.count > MAX_WORKSPACES {
            issues.push(format!("workspace count should not exceed {}", MAX_WORKSPACES));
        }
        if self.names.len() > self.count {
            issues.push("more workspace names provided than workspace count".to_string());
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.count == 0 {
            self.count = 1;
            fixes += 1;
        }
        if self.count > MAX_WORKSPACES {
            self.count = MAX_WORKSPACES;
            fixes += 1;
        }
        if self.names.len() > self.count {
            self.names.truncate(self.count);
            fixes += 1;
        }

        fixes
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.layout.validate());
        issues.extend(self.float.validate());
        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        self.layout.auto_fix_values() + self.float.auto_fix_values()
    }
}

fn default_gap() -> f64 { 6.0 }

fn default_float_x() -> f64 { 100.0 }

fn default_float_y() -> f64 { 100.0 }

fn default_float_width() -> f64 { 600.0 }

fn default_float_height() -> f64 { 400.0 }

fn default_float_min_width() -> f64 { 200.0 }

fn default_float_min_height() -> f64 { 150.0 }

fn default_workspace_count() -> usize { 5 }

fn default_workspace_names() -> Vec<String> {
    (1..=default_workspace_count()).map(|n| n.to_string()).collect()
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        Ok(config)
    }

    pub fn default() -> Config { Self::parse(include_str!("../../sash.default.toml")).unwrap() }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the whole configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.settings.validate());
        issues.extend(self.workspaces.validate());
        issues
    }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        self.settings.auto_fix_values() + self.workspaces.auto_fix_values()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default();
        assert_eq!(config.settings.layout.gap, 6.0);
        assert_eq!(config.settings.float.default_width, 600.0);
        assert_eq!(config.workspaces.count, 5);
        assert_eq!(config.workspaces.names, vec!["1", "2", "3", "4", "5"]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());

        let config = Config::parse("[settings.layout]\ngap = 12.0\n").unwrap();
        assert_eq!(config.settings.layout.gap, 12.0);
        assert_eq!(config.settings.float, FloatSettings::default());
        assert_eq!(config.workspaces, WorkspaceSettings::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::parse("[settings.layout]\nspacing = 4.0\n").is_err());
    }

    #[test]
    fn validation_and_auto_fix() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.settings.layout.gap = -3.0;
        config.workspaces.count = 0;
        let issues = config.validate();
        // Bad gap, zero count, and five names for a zero-count set.
        assert_eq!(issues.len(), 3);

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 3);
        assert_eq!(config.settings.layout.gap, 6.0);
        assert_eq!(config.workspaces.count, 1);
        assert_eq!(config.workspaces.names, vec!["1"]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn float_minimums_clamp_to_defaults() {
        let mut config = Config::default();
        config.settings.float.min_width = 900.0;
        assert_eq!(config.validate().len(), 1);
        assert_eq!(config.auto_fix_values(), 1);
        assert_eq!(config.settings.float.min_width, config.settings.float.default_width);
    }

    #[test]
    fn oversized_workspace_count_is_capped() {
        let mut config = Config::default();
        config.workspaces.count = 64;
        assert_eq!(config.validate().len(), 1);
        assert_eq!(config.auto_fix_values(), 1);
        assert_eq!(config.workspaces.count, MAX_WORKSPACES);
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sash.toml");

        let mut config = Config::default();
        config.settings.layout.gap = 9.0;
        config.workspaces.names[0] = "main".to_string();
        config.save(&path).unwrap();

        let loaded = Config::read(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
