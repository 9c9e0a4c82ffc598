use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use blueprint_cli::{init_tracing, Config, Session};
use cli::document::{CommentCommands, DocumentArgs};
use cli::media::MediaCommands;
use cli::templates::TemplateCommands;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Blueprint - AI product requirements documents from the command line")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new document from product inputs
    Generate(DocumentArgs),
    /// Show the current document
    Show {
        /// Only list requirements matching this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Add or list comments
    #[command(subcommand)]
    Comment(CommentCommands),
    /// Change a requirement's priority
    Priority {
        /// Requirement ID, e.g. FR-1
        requirement_id: String,
        /// high, medium or low
        priority: String,
    },
    /// Discard the current document
    Reset,
    /// Manage saved input templates
    #[command(subcommand)]
    Template(TemplateCommands),
    /// Export the current document
    Export {
        /// markdown or json
        #[arg(short, long, default_value = "markdown")]
        format: String,
        /// Output file; defaults to a name derived from the product
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,
        /// Append comments grouped by section (markdown only)
        #[arg(long)]
        with_comments: bool,
        /// Skip the table of contents (markdown only)
        #[arg(long)]
        no_toc: bool,
    },
    #[command(flatten)]
    Media(MediaCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let session = Session::open(config).await?;

    match command {
        Commands::Generate(args) => cli::document::generate(&session, args).await,
        Commands::Show { query } => cli::document::show(&session, query.as_deref()).await,
        Commands::Comment(command) => cli::document::handle_comment_command(&session, command).await,
        Commands::Priority {
            requirement_id,
            priority,
        } => cli::document::set_priority(&session, &requirement_id, &priority).await,
        Commands::Reset => cli::document::reset(&session).await,
        Commands::Template(command) => {
            cli::templates::handle_template_command(&session, command).await
        }
        Commands::Export {
            format,
            out,
            with_comments,
            no_toc,
        } => cli::document::export(&session, &format, out, with_comments, !no_toc).await,
        Commands::Media(command) => cli::media::handle_media_command(&session, command).await,
    }
}
