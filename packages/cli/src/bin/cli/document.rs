use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use blueprint_cli::inputs::{build_form_inputs, FormArgs};
use blueprint_cli::Session;
use blueprint_core::{Document, Priority};
use blueprint_studio::{
    comment_counts, comments_for_section, filter_requirements, ExportFormat, ExportOptions,
    ExportService,
};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use super::truncate;

// The tip runs alongside generation and usually lands shortly after it
const QUICK_TIP_WAIT_SECS: u64 = 5;

#[derive(Args)]
pub struct DocumentArgs {
    /// Product name
    #[arg(short, long)]
    name: Option<String>,
    /// Executive summary of the product
    #[arg(short, long)]
    description: Option<String>,
    /// Primary users
    #[arg(long)]
    audience: Option<String>,
    /// Key objectives
    #[arg(long)]
    goals: Option<String>,
    /// Core features
    #[arg(long)]
    features: Option<String>,
    /// Roadmap phase as name:goals (repeatable)
    #[arg(long = "phase")]
    phases: Vec<String>,
    /// Context file to attach (repeatable)
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    /// Start from a saved template
    #[arg(short, long)]
    template: Option<String>,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Comment on a section
    Add {
        /// Section tag, e.g. Vision, Requirements, Roadmap
        section: String,
        /// Comment text
        text: String,
    },
    /// List comments, optionally for one section
    List {
        #[arg(short, long)]
        section: Option<String>,
    },
}

pub async fn generate(session: &Session, args: DocumentArgs) -> Result<()> {
    let base = match &args.template {
        Some(id) => Some(
            session
                .templates
                .get(id)
                .await?
                .ok_or_else(|| anyhow!("Template {} not found", id))?
                .data,
        ),
        None => None,
    };

    let form = FormArgs {
        name: args.name,
        description: args.description,
        audience: args.audience,
        goals: args.goals,
        features: args.features,
        phases: args.phases,
        files: args.files,
    };
    let inputs = build_form_inputs(form, base).await?;

    println!(
        "{} {}",
        "Generating blueprint for".blue(),
        inputs.name.bold()
    );

    match session.controller.submit(inputs).await {
        Ok(document) => {
            print_document(&document, None);
            if let Some(tip) = session
                .controller
                .wait_for_quick_tip(Duration::from_secs(QUICK_TIP_WAIT_SECS))
                .await
            {
                println!("{} {}", "Tip:".yellow().bold(), tip);
            }
            Ok(())
        }
        Err(e) => {
            if let Some(record) = session.controller.snapshot().await.error {
                eprintln!("{} [{}]", "Blueprint Generation Failed".red().bold(), record.status);
            }
            Err(e.into())
        }
    }
}

pub async fn show(session: &Session, query: Option<&str>) -> Result<()> {
    match session.controller.document().await {
        Some(document) => {
            print_document(&document, query);
            let counts = comment_counts(&session.controller.comments().await);
            if !counts.is_empty() {
                let summary: Vec<String> = counts
                    .iter()
                    .map(|(section, n)| format!("{} ({})", section, n))
                    .collect();
                println!("{} {}", "Comments:".dimmed(), summary.join(", "));
            }
            Ok(())
        }
        None => {
            println!("{}", "No document yet".yellow());
            println!("{}", "Use 'blueprint generate' to create one".dimmed());
            Ok(())
        }
    }
}

fn print_document(document: &Document, query: Option<&str>) {
    println!();
    println!("{}", document.product_name.blue().bold());
    println!("{}", document.vision.italic());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Requirement", "Priority", "Sub-tasks"]);

    let requirements = filter_requirements(document, query.unwrap_or(""));
    for req in &requirements {
        table.add_row(vec![
            req.id.clone(),
            truncate(&req.title, 40),
            req.priority.to_string(),
            req.sub_tasks.len().to_string(),
        ]);
    }
    println!("{}", table);

    if !document.roadmap.is_empty() {
        println!("{}", "Roadmap".bold());
        for phase in &document.roadmap {
            println!(
                "  {} {} - {}",
                "•".cyan(),
                phase.phase,
                phase.duration.dimmed()
            );
        }
    }
    println!(
        "Showing {} of {} requirements",
        requirements.len().to_string().cyan(),
        document.functional_requirements.len()
    );
}

pub async fn handle_comment_command(session: &Session, command: CommentCommands) -> Result<()> {
    match command {
        CommentCommands::Add { section, text } => {
            match session.controller.add_comment(&section, &text).await? {
                Some(comment) => println!(
                    "{} Comment added to {} by {}",
                    "✓".green(),
                    comment.section_id.bold(),
                    comment.author
                ),
                None => println!("{}", "Empty comment ignored".yellow()),
            }
            Ok(())
        }
        CommentCommands::List { section } => {
            let all = session.controller.comments().await;
            let shown = match &section {
                Some(section) => comments_for_section(&all, section),
                None => all.iter().collect(),
            };
            if shown.is_empty() {
                println!("{}", "No comments".yellow());
                return Ok(());
            }
            for comment in shown {
                let when = i64::try_from(comment.timestamp)
                    .ok()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "[{}] {} {}: {}",
                    comment.section_id.cyan(),
                    when.dimmed(),
                    comment.author.bold(),
                    comment.text
                );
            }
            Ok(())
        }
    }
}

pub async fn set_priority(session: &Session, requirement_id: &str, priority: &str) -> Result<()> {
    let priority: Priority = priority.parse().map_err(|e: String| anyhow!(e))?;
    if session
        .controller
        .update_priority(requirement_id, priority)
        .await?
    {
        println!(
            "{} {} is now {}",
            "✓".green(),
            requirement_id.bold(),
            priority
        );
        Ok(())
    } else {
        bail!("No requirement {} in the current document", requirement_id)
    }
}

pub async fn reset(session: &Session) -> Result<()> {
    session.controller.reset().await?;
    println!("{} Document cleared", "✓".green());
    Ok(())
}

pub async fn export(
    session: &Session,
    format: &str,
    out: Option<PathBuf>,
    with_comments: bool,
    include_toc: bool,
) -> Result<()> {
    let document = session
        .controller
        .document()
        .await
        .ok_or_else(|| anyhow!("No document to export"))?;
    let comments = session.controller.comments().await;

    let options = ExportOptions {
        format: format.parse::<ExportFormat>()?,
        include_toc,
        include_comments: with_comments,
        ..Default::default()
    };
    let result = ExportService::new().export(&document, &comments, options)?;

    let path = out.unwrap_or_else(|| PathBuf::from(&result.file_name));
    tokio::fs::write(&path, &result.content).await?;
    println!(
        "{} Exported {} ({} bytes) to {}",
        "✓".green(),
        result.mime_type,
        result.size_bytes,
        path.display()
    );
    Ok(())
}
