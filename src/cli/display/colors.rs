//! Color theme for CLI output

use crate::domain::template::ComponentType;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Empty object categories are dimmed
    pub fn get_count_color(&self, count: usize) -> TableColor {
        if count == 0 {
            self.muted
        } else {
            self.info
        }
    }

    pub fn get_component_color(&self, component_type: ComponentType) -> TableColor {
        match component_type {
            ComponentType::Instance => self.success,
            ComponentType::Broker => self.info,
            ComponentType::Both => self.warning,
        }
    }

    pub fn get_health_color(&self, healthy: bool) -> TableColor {
        if healthy {
            self.success
        } else {
            self.error
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}
