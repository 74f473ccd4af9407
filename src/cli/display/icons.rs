//! Status icons for CLI output

use crate::domain::template::ComponentType;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const ERROR: &'static str = "✗";

    /// Template with no objects
    pub const EMPTY: &'static str = "∅";

    pub fn get_health_icon(healthy: bool) -> &'static str {
        if healthy {
            Self::SUCCESS
        } else {
            Self::ERROR
        }
    }

    pub fn get_health_text(healthy: bool) -> &'static str {
        if healthy {
            "Healthy"
        } else {
            "Unhealthy"
        }
    }

    pub fn get_component_icon(component_type: ComponentType) -> &'static str {
        match component_type {
            ComponentType::Instance => "📦",
            ComponentType::Broker => "🔌",
            ComponentType::Both => "🔀",
        }
    }

    pub fn get_objects_icon(object_count: usize) -> &'static str {
        if object_count == 0 {
            Self::EMPTY
        } else {
            Self::SUCCESS
        }
    }
}
