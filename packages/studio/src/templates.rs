// ABOUTME: Saved form-input templates
// ABOUTME: List, save, delete, fetch and search templates kept in the local store

use blueprint_core::{generate_timestamp_id, FormInputs, Template};
use blueprint_storage::StateStore;
use tracing::info;

use crate::error::{Result, StudioError};

/// Manager for reusable snapshots of form inputs
pub struct TemplateManager {
    store: StateStore,
}

impl TemplateManager {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// All templates in the order they were saved
    pub async fn list(&self) -> Result<Vec<Template>> {
        Ok(self.store.load_templates().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Template>> {
        Ok(self.list().await?.into_iter().find(|t| t.id == id))
    }

    pub async fn save(&self, name: &str, inputs: &FormInputs) -> Result<Template> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::InvalidInput(
                "Template name is required".to_string(),
            ));
        }

        let template = Template {
            id: generate_timestamp_id(),
            name: name.to_string(),
            data: inputs.clone(),
        };

        let mut templates = self.list().await?;
        templates.push(template.clone());
        self.store.save_templates(&templates).await?;

        info!("Saved template '{}' ({})", template.name, template.id);
        Ok(template)
    }

    /// Remove a template; returns whether anything was deleted
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut templates = self.list().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);

        if templates.len() == before {
            return Ok(false);
        }

        self.store.save_templates(&templates).await?;
        info!("Deleted template {}", id);
        Ok(true)
    }

    /// Case-insensitive match on the template name or the saved product name
    pub async fn search(&self, query: &str) -> Result<Vec<Template>> {
        let templates = self.list().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(templates);
        }

        Ok(templates
            .into_iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.data.name.to_lowercase().contains(&needle)
            })
            .collect())
    }
}
