use crate::{
    api::{ApiError, Backend, CreatedProject, Project},
    render,
};
use serde::Serialize;
use tracing::{info, warn};

pub const NO_PDF: &str = "No PDF uploaded";

/// One row of the project list, derived from a backend `Project`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub created_at: String,
    pub podcast_count: u32,
}

impl From<&Project> for ProjectCard {
    fn from(p: &Project) -> Self {
        Self {
            id: p.project_id.clone(),
            name: p.name.clone(),
            file_name: p.pdf_filename.clone().unwrap_or_else(|| NO_PDF.to_string()),
            created_at: render::format_day(&p.created_at),
            podcast_count: p.podcast_count,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Project name is required")]
    EmptyName,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct Dashboard<'b, B: Backend> {
    backend: &'b B,
    cards: Vec<ProjectCard>,
    loading: bool,
    error: Option<String>,
}

impl<'b, B: Backend> Dashboard<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self {
            backend,
            cards: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn cards(&self) -> &[ProjectCard] {
        &self.cards
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the card list with the backend's projects, in the order
    /// received. A failure keeps the previous cards and records the message.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        match self.backend.list_projects().await {
            Ok(projects) => {
                info!(count = projects.len(), "projects loaded");
                self.cards = projects.iter().map(ProjectCard::from).collect();
            }
            Err(e) => {
                warn!(error = %e, "failed to load projects");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// One create request, then a full reload. Nothing is sent for a blank
    /// name.
    pub async fn create(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<CreatedProject, DashboardError> {
        if name.trim().is_empty() {
            return Err(DashboardError::EmptyName);
        }
        let created = self.backend.create_project(name, description).await?;
        info!(project_id = %created.project_id, "project created");
        self.load().await;
        Ok(created)
    }

    /// The card disappears only once the backend confirms the delete.
    pub async fn delete(&mut self, id: &str) -> Result<(), DashboardError> {
        self.backend.delete_project(id).await?;
        self.cards.retain(|c| c.id != id);
        info!(project_id = id, "project deleted");
        Ok(())
    }
}
