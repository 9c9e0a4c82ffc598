use anyhow::Result;
use blueprint_cli::inputs::{build_form_inputs, FormArgs};
use blueprint_cli::Session;
use blueprint_core::Template;
use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use super::truncate;

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Save form inputs as a named template
    Save {
        /// Template name
        template_name: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        features: Option<String>,
        /// Roadmap phase as name:goals (repeatable)
        #[arg(long = "phase")]
        phases: Vec<String>,
    },
    /// List saved templates
    List,
    /// Delete a template
    Delete {
        /// Template ID
        id: String,
    },
    /// Find templates by template or product name
    Search {
        query: String,
    },
}

pub async fn handle_template_command(session: &Session, command: TemplateCommands) -> Result<()> {
    match command {
        TemplateCommands::Save {
            template_name,
            name,
            description,
            audience,
            goals,
            features,
            phases,
        } => {
            let inputs = build_form_inputs(
                FormArgs {
                    name: Some(name),
                    description: Some(description),
                    audience,
                    goals,
                    features,
                    phases,
                    files: Vec::new(),
                },
                None,
            )
            .await?;
            let template = session.templates.save(&template_name, &inputs).await?;
            println!(
                "{} Saved template {} ({})",
                "✓".green(),
                template.name.bold(),
                template.id.dimmed()
            );
            Ok(())
        }
        TemplateCommands::List => {
            let templates = session.templates.list().await?;
            print_templates(&templates);
            Ok(())
        }
        TemplateCommands::Delete { id } => {
            if session.templates.delete(&id).await? {
                println!("{} Deleted template {}", "✓".green(), id);
            } else {
                println!("{} No template with id {}", "!".yellow(), id);
            }
            Ok(())
        }
        TemplateCommands::Search { query } => {
            let templates = session.templates.search(&query).await?;
            print_templates(&templates);
            Ok(())
        }
    }
}

fn print_templates(templates: &[Template]) {
    if templates.is_empty() {
        println!("{}", "No templates found".yellow());
        println!(
            "{}",
            "Use 'blueprint template save' to create your first template".dimmed()
        );
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Template", "Product", "Phases"]);

    for template in templates {
        table.add_row(vec![
            template.id.clone(),
            truncate(&template.name, 25),
            truncate(&template.data.name, 25),
            template.data.roadmap_phases.len().to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} templates", templates.len().to_string().cyan());
}
