use crate::data::datatable::{DEFAULT_COL_WIDTH, MAX_COL_WIDTH, MIN_COL_WIDTH};
use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub grid: GridConfig,
    pub keybindings: KeybindingConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Title shown above the grid
    pub title: String,

    /// Show row numbers in a gutter column
    pub show_row_numbers: bool,

    /// Show the column visibility checkboxes above the grid
    pub show_column_toggles: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width given to columns loaded from a data file
    pub default_column_width: u16,

    pub min_column_width: u16,

    pub max_column_width: u16,

    /// Cells added or removed per `<` / `>` press
    pub resize_step: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    /// Accept h/j/k/l as arrow keys
    pub vim_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub focus_style: FocusStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusStyle {
    /// Foreground color of the focused cell (e.g., "black", "yellow", "#1e3a8a")
    pub foreground: String,

    /// Background color of the focused cell
    pub background: String,

    pub bold: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Team Spreadsheet".to_string(),
            show_row_numbers: false,
            show_column_toggles: true,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COL_WIDTH,
            min_column_width: MIN_COL_WIDTH,
            max_column_width: MAX_COL_WIDTH,
            resize_step: 2,
        }
    }
}

impl Default for FocusStyle {
    fn default() -> Self {
        Self {
            foreground: "black".to_string(),
            background: "lightblue".to_string(),
            bold: true,
        }
    }
}

impl FocusStyle {
    /// Resolve to a ratatui style. Unparseable colors fall back to the
    /// defaults rather than failing the render.
    pub fn to_style(&self) -> Style {
        let defaults = FocusStyle::default();
        let fg = parse_color(&self.foreground)
            .or_else(|| parse_color(&defaults.foreground))
            .unwrap_or(Color::Black);
        let bg = parse_color(&self.background)
            .or_else(|| parse_color(&defaults.background))
            .unwrap_or(Color::LightBlue);

        let mut style = Style::default().fg(fg).bg(bg);
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }
}

fn parse_color(name: &str) -> Option<Color> {
    Color::from_str(name.trim()).ok()
}

impl Config {
    /// Load config from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            info!(target: "config", "Wrote default config to {}", config_path.display());
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config.normalized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("sheet-grid").join("config.toml"))
    }

    /// Repair width settings that can't work together
    fn normalized(mut self) -> Self {
        let grid = &mut self.grid;
        if grid.min_column_width == 0 {
            warn!(target: "config", "min_column_width must be at least 1");
            grid.min_column_width = 1;
        }
        if grid.max_column_width < grid.min_column_width {
            warn!(
                target: "config",
                "max_column_width {} below min_column_width {}, raising it",
                grid.max_column_width,
                grid.min_column_width
            );
            grid.max_column_width = grid.min_column_width;
        }
        grid.default_column_width = grid
            .default_column_width
            .clamp(grid.min_column_width, grid.max_column_width);
        self
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r##"# Sheet Grid Configuration File
# Location: ~/.config/sheet-grid/config.toml (Linux)
#           ~/Library/Application Support/sheet-grid/config.toml (macOS)
#           %APPDATA%\sheet-grid\config.toml (Windows)

[display]
# Title shown above the grid
title = "Team Spreadsheet"

# Show a row number gutter
show_row_numbers = false

# Show the column visibility checkboxes (toggle with 1-9 or a click)
show_column_toggles = true

[grid]
# Width of columns loaded from CSV/JSON files, in terminal cells
default_column_width = 20

# Limits applied when a column is resized by dragging or with < / >
min_column_width = 4
max_column_width = 80

# Cells added or removed per < / > press
resize_step = 2

[keybindings]
# Accept h/j/k/l as arrow keys
vim_mode = false

[theme.focus_style]
# Colors accept names ("yellow", "lightblue") or hex ("#1e3a8a")
foreground = "black"
background = "lightblue"
bold = true
"##
        .to_string()
    }
}
