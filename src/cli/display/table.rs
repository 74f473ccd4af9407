//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::template::{ComponentType, Template};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use serde_json::Value;

/// Template information for list display
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub id: String,
    pub component_type: ComponentType,
    pub plan: Option<String>,
    pub deployments: usize,
    pub services: usize,
    pub ingresses: usize,
    pub secrets: usize,
    pub persistent_volume_claims: usize,
    pub service_accounts: usize,
    pub hooks: usize,
}

impl From<&Template> for TemplateInfo {
    fn from(template: &Template) -> Self {
        let body = &template.body;
        Self {
            id: template.id.clone(),
            component_type: body.component_type,
            plan: template.plan.as_ref().map(|p| p.name.clone()),
            deployments: body.deployments.len(),
            services: body.services.len(),
            ingresses: body.ingresses.len(),
            secrets: body.secrets.len(),
            persistent_volume_claims: body.persistent_volume_claims.len(),
            service_accounts: body.service_accounts.len(),
            hooks: template.hooks.len(),
        }
    }
}

impl TemplateInfo {
    fn object_count(&self) -> usize {
        self.deployments
            + self.services
            + self.ingresses
            + self.secrets
            + self.persistent_volume_claims
            + self.service_accounts
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render templates as a table of per-category object counts
    pub fn render_templates_list(&self, templates: &[TemplateInfo]) -> String {
        if templates.is_empty() {
            return "No templates found".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("TEMPLATE").set_alignment(CellAlignment::Left),
                Cell::new("TYPE").set_alignment(CellAlignment::Left),
                Cell::new("PLAN").set_alignment(CellAlignment::Left),
                Cell::new("DEPLOY").set_alignment(CellAlignment::Center),
                Cell::new("SVC").set_alignment(CellAlignment::Center),
                Cell::new("INGRESS").set_alignment(CellAlignment::Center),
                Cell::new("SECRET").set_alignment(CellAlignment::Center),
                Cell::new("PVC").set_alignment(CellAlignment::Center),
                Cell::new("SA").set_alignment(CellAlignment::Center),
                Cell::new("HOOKS").set_alignment(CellAlignment::Center),
            ]);

        for template in templates {
            let icon = StatusIcon::get_objects_icon(template.object_count());
            let component = template.component_type;

            let mut row = vec![
                Cell::new(format!("{} {}", icon, template.id)),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_component_icon(component),
                    component_type_name(component)
                ))
                .fg(self.theme.get_component_color(component)),
                Cell::new(template.plan.as_deref().unwrap_or("-")),
            ];
            for count in [
                template.deployments,
                template.services,
                template.ingresses,
                template.secrets,
                template.persistent_volume_claims,
                template.service_accounts,
                template.hooks,
            ] {
                row.push(
                    Cell::new(count)
                        .fg(self.theme.get_count_color(count))
                        .set_alignment(CellAlignment::Center),
                );
            }
            table.add_row(row);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Templates {} ─╮\n",
            format!("[{} templates]", templates.len())
                .bright_black()
                .to_string()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Has objects  {} Empty\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::EMPTY.bright_black()
        ));

        output
    }

    /// Render the `/healthz` response
    pub fn render_health(&self, address: &str, health: &Value) -> String {
        let healthy = health["status"] == "healthy";
        let color = table_color_to_colored_str(self.theme.get_health_color(healthy));

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.add_row(vec![Cell::new("🩺 Template Repository").set_alignment(CellAlignment::Center)]);
        table.add_row(vec![Cell::new(format!("Address: {}", address))]);
        table.add_row(vec![Cell::new(format!(
            "Status: {} {}",
            StatusIcon::get_health_icon(healthy),
            StatusIcon::get_health_text(healthy)
        ))
        .fg(self.theme.get_health_color(healthy))]);

        for (label, key) in [
            ("Version", "version"),
            ("Templates", "templates"),
            ("Timestamp", "timestamp"),
        ] {
            if let Some(value) = health.get(key) {
                let value = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                table.add_row(vec![Cell::new(format!("{}: {}", label, value))]);
            }
        }

        format!(
            "{}\n{}",
            table,
            StatusIcon::get_health_text(healthy).color(color)
        )
    }
}

fn component_type_name(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Instance => "instance",
        ComponentType::Broker => "broker",
        ComponentType::Both => "both",
    }
}
