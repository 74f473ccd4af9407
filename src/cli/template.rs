//! Template commands that talk to a running repository service

use super::display::{TableRenderer, TemplateInfo};
use super::{parse_key_value_pairs, ClientArgs};
use crate::domain::template::placeholders::QUERY_PLAN_NAME;
use crate::domain::template::RawTemplate;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    fn render<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    #[command(flatten)]
    pub client: ClientArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct GetCommand {
    /// Template ID
    pub id: String,

    #[arg(long, short = 'o', value_enum, default_value = "json")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub client: ClientArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    /// Template ID
    pub id: String,

    /// Service instance ID the template is rendered for
    #[arg(long, short = 'i')]
    pub instance_id: String,

    /// Keep only objects belonging to this plan
    #[arg(long)]
    pub plan: Option<String>,

    /// Placeholder values, each becomes `$key` (-p key=value)
    ///
    /// Example: -p namespace=prod -p storageClass=fast
    #[arg(short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    #[arg(long, short = 'o', value_enum, default_value = "json")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub client: ClientArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct CreateCommand {
    /// Path to a template JSON file
    #[arg(value_name = "FILE")]
    pub file: String,

    #[command(flatten)]
    pub client: ClientArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// Template ID
    pub id: String,

    #[command(flatten)]
    pub client: ClientArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthCommand {
    #[command(flatten)]
    pub client: ClientArgs,
}

impl ListCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let templates = self
            .client
            .client()?
            .list_templates()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list templates: {}", e))?;

        let infos: Vec<TemplateInfo> = templates.iter().map(TemplateInfo::from).collect();
        let output = TableRenderer::new().render_templates_list(&infos);
        println!("{}", output);

        Ok(())
    }
}

impl GetCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let template = self
            .client
            .client()?
            .get_template(&self.id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get template {}: {}", self.id, e))?;

        println!("{}", self.output.render(&template)?);
        Ok(())
    }
}

impl RenderCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut params = parse_key_value_pairs(&self.params)
            .map_err(|e| anyhow::anyhow!("Failed to parse parameters: {}", e))?;
        if let Some(ref plan) = self.plan {
            params.insert(QUERY_PLAN_NAME.to_string(), plan.clone());
        }

        let template = self
            .client
            .client()?
            .generate_parsed_template(&self.id, &self.instance_id, &params)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to render template {}: {}", self.id, e))?;

        println!("{}", self.output.render(&template)?);
        Ok(())
    }
}

impl CreateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.file)
            .map_err(|e| anyhow::anyhow!("Failed to read template file {}: {}", self.file, e))?;
        let template: RawTemplate = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid template file {}: {}", self.file, e))?;

        let id = template
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or_default()
            .to_string();

        self.client
            .client()?
            .create_template(&template)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create template: {}", e))?;

        println!("Template {} created successfully!", id);
        Ok(())
    }
}

impl DeleteCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        self.client
            .client()?
            .delete_template(&self.id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete template {}: {}", self.id, e))?;

        println!("Template {} deleted successfully!", self.id);
        Ok(())
    }
}

impl HealthCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let client = self.client.client()?;
        let health = client
            .health()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach {}: {}", client.address(), e))?;

        let output = TableRenderer::new().render_health(client.address(), &health);
        println!("{}", output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_yaml() {
        let rendered = OutputFormat::Yaml.render(&json!({"id": "mysql"})).unwrap();
        assert_eq!(rendered.trim(), "id: mysql");
    }

    #[test]
    fn test_render_command_args() {
        let cmd = RenderCommand::parse_from([
            "render",
            "mysql",
            "--instance-id",
            "a5740d8a9f4b4ec",
            "-p",
            "namespace=prod",
            "--plan",
            "small",
        ]);
        assert_eq!(cmd.id, "mysql");
        assert_eq!(cmd.params, vec!["namespace=prod".to_string()]);
        assert_eq!(cmd.plan.as_deref(), Some("small"));
        assert_eq!(cmd.output, OutputFormat::Json);
    }
}
