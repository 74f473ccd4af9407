// CLI command definitions

use super::serve::ServeCommand;
use super::template::{
    CreateCommand, DeleteCommand, GetCommand, HealthCommand, ListCommand, RenderCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "template-repository",
    version,
    about = "Repository of parameterized Kubernetes manifest templates",
    long_about = "Stores Kubernetes manifest templates on disk, serves them over HTTP and renders them for service instances"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the template repository HTTP service
    Serve(ServeCommand),

    /// List all templates with their object counts
    List(ListCommand),

    /// Show a template as stored
    Get(GetCommand),

    /// Render a template for a service instance
    Render(RenderCommand),

    /// Create a custom template from a JSON file
    Create(CreateCommand),

    /// Delete a custom template
    Delete(DeleteCommand),

    /// Check service health
    Health(HealthCommand),
}

impl Commands {
    pub fn is_server(&self) -> bool {
        matches!(self, Commands::Serve(_))
    }
}
