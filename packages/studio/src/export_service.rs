// ABOUTME: Export service for generated documents
// ABOUTME: Renders a document and its comments as pretty JSON or sectioned Markdown

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use blueprint_core::{Comment, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StudioError};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(StudioError::InvalidInput(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

/// Export result with content and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub content: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

/// Export options for customizing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_toc: bool, // Markdown only
    pub include_metadata: bool, // Markdown only
    pub include_comments: bool, // Markdown only
    pub title: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Markdown,
            include_toc: true,
            include_metadata: true,
            include_comments: false,
            title: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Export a document in the requested format
    pub fn export(
        &self,
        document: &Document,
        comments: &[Comment],
        options: ExportOptions,
    ) -> Result<ExportResult> {
        info!("Exporting document {} as {}", document.id, options.format);

        let content = match options.format {
            ExportFormat::Json => serde_json::to_string_pretty(document)?,
            ExportFormat::Markdown => self.export_markdown(document, comments, &options),
        };

        let file_name = self.generate_filename(document, &options);
        let mime_type = match options.format {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
        }
        .to_string();
        let size_bytes = content.len();

        Ok(ExportResult {
            format: options.format,
            content,
            file_name,
            mime_type,
            size_bytes,
        })
    }

    fn export_markdown(
        &self,
        document: &Document,
        comments: &[Comment],
        options: &ExportOptions,
    ) -> String {
        let mut markdown = format_document_markdown(document);

        if options.include_comments && !comments.is_empty() {
            markdown.push_str(&format_comments_markdown(comments));
        }

        if options.include_toc {
            markdown = self.add_markdown_toc(&markdown);
        }

        if options.include_metadata {
            let title = options
                .title
                .clone()
                .unwrap_or_else(|| document.product_name.clone());
            let meta = self.generate_metadata_header(&title, document);
            markdown = format!("{}\n\n{}", meta, markdown);
        }

        markdown
    }

    /// Add table of contents to markdown
    fn add_markdown_toc(&self, markdown: &str) -> String {
        let mut toc = String::from("## Table of Contents\n\n");

        for line in markdown.lines() {
            if let Some(title) = line.strip_prefix("## ") {
                let title = title.trim();
                let anchor = title
                    .to_lowercase()
                    .replace(' ', "-")
                    .replace(|c: char| !c.is_alphanumeric() && c != '-', "");
                let _ = writeln!(toc, "- [{}](#{})", title, anchor);
            }
        }

        toc.push_str("\n---\n\n");
        toc.push_str(markdown);
        toc
    }

    fn generate_metadata_header(&self, title: &str, document: &Document) -> String {
        let now = Utc::now();
        format!(
            "---\ntitle: {}\ndocument_id: {}\ndate: {}\ngenerated_by: Blueprint\n---",
            yaml_quote(title),
            yaml_quote(&document.id),
            now.format("%Y-%m-%d")
        )
    }

    fn generate_filename(&self, document: &Document, options: &ExportOptions) -> String {
        let base = options
            .title
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(slugify(&document.product_name)).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "prd".to_string());

        let extension = match options.format {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        };

        format!("{}-prd.{}", base, extension)
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "## {}\n", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    out.push('\n');
}

/// Render the document body as Markdown
pub fn format_document_markdown(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", document.product_name);

    let _ = writeln!(out, "## Vision\n\n{}\n", document.vision);
    let _ = writeln!(out, "## Problem Statement\n\n{}\n", document.problem_statement);
    let _ = writeln!(out, "## Market Context\n\n{}\n", document.market_context);
    push_list(&mut out, "Target Audience", &document.target_audience);
    push_list(&mut out, "Goals", &document.goals);

    let _ = writeln!(out, "## User Stories\n");
    for story in &document.user_stories {
        let _ = writeln!(
            out,
            "- As a {}, I want {}, so that {}.",
            story.role, story.action, story.benefit
        );
    }
    out.push('\n');

    let _ = writeln!(out, "## Functional Requirements\n");
    for req in &document.functional_requirements {
        let _ = writeln!(out, "### {}: {}\n", req.id, req.title);
        let _ = writeln!(out, "**Priority:** {}\n", req.priority);
        let _ = writeln!(out, "{}\n", req.description);
        for task in &req.sub_tasks {
            let _ = writeln!(out, "#### {}\n\n{}\n", task.title, task.description);
            for criterion in &task.acceptance_criteria {
                let _ = writeln!(out, "- [ ] {}", criterion);
            }
            out.push('\n');
        }
    }

    push_list(
        &mut out,
        "Non-Functional Requirements",
        &document.non_functional_requirements,
    );
    push_list(&mut out, "Success Metrics", &document.success_metrics);

    let _ = writeln!(out, "## Risks\n");
    for risk in &document.risks {
        let _ = writeln!(
            out,
            "- **{}** (Impact: {}): {}",
            risk.title, risk.impact, risk.mitigation
        );
    }
    out.push('\n');

    push_list(&mut out, "Technical Constraints", &document.technical_constraints);

    let _ = writeln!(out, "## Roadmap\n");
    for phase in &document.roadmap {
        let _ = writeln!(out, "### {} ({})\n", phase.phase, phase.duration);
        for milestone in &phase.milestones {
            let _ = writeln!(out, "- {}", milestone);
        }
        out.push('\n');
    }

    out
}

fn format_comments_markdown(comments: &[Comment]) -> String {
    let mut by_section: BTreeMap<&str, Vec<&Comment>> = BTreeMap::new();
    for comment in comments {
        by_section
            .entry(comment.section_id.as_str())
            .or_default()
            .push(comment);
    }

    let mut out = String::from("## Discussion\n\n");
    for (section, entries) in by_section {
        let _ = writeln!(out, "### {}\n", section);
        for comment in entries {
            let when = i64::try_from(comment.timestamp)
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| comment.timestamp.to_string());
            let _ = writeln!(out, "- **{}** ({}): {}", comment.author, when, comment.text);
        }
        out.push('\n');
    }
    out
}

/// Slugify text for filenames
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .take(50)
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Double-quoted YAML scalar; JSON string escaping is valid YAML
fn yaml_quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
