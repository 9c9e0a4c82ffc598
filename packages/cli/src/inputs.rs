// ABOUTME: Builds generation form inputs from command-line arguments
// ABOUTME: Parses roadmap phase hints and reads attached context files

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use blueprint_core::{read_context_file, FormInputs, RoadmapPhaseHint};

/// Form fields as given on the command line; unset fields fall back to a template
#[derive(Debug, Clone, Default)]
pub struct FormArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub goals: Option<String>,
    pub features: Option<String>,
    pub phases: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Parse `name:goals` into a phase hint. The goals part may be empty.
pub fn parse_phase(raw: &str) -> Result<RoadmapPhaseHint> {
    let (name, goals) = raw.split_once(':').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() {
        bail!("Roadmap phase '{}' needs a name (expected name:goals)", raw);
    }
    Ok(RoadmapPhaseHint {
        name: name.to_string(),
        key_goals: goals.trim().to_string(),
    })
}

/// Overlay the arguments on a base (usually a template's inputs) and attach files
pub async fn build_form_inputs(args: FormArgs, base: Option<FormInputs>) -> Result<FormInputs> {
    let mut inputs = base.unwrap_or_default();

    if let Some(name) = args.name {
        inputs.name = name;
    }
    if let Some(description) = args.description {
        inputs.description = description;
    }
    if let Some(audience) = args.audience {
        inputs.target_audience = audience;
    }
    if let Some(goals) = args.goals {
        inputs.primary_goals = goals;
    }
    if let Some(features) = args.features {
        inputs.key_features = features;
    }

    if !args.phases.is_empty() {
        inputs.roadmap_phases = args
            .phases
            .iter()
            .map(|raw| parse_phase(raw))
            .collect::<Result<Vec<_>>>()?;
    }

    for path in &args.files {
        let file = read_context_file(path)
            .await
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        inputs.context_files.push(file);
    }

    if inputs.name.trim().is_empty() {
        bail!("A product name is required (use --name or --template)");
    }
    if inputs.description.trim().is_empty() {
        bail!("A product description is required (use --description or --template)");
    }

    Ok(inputs)
}
