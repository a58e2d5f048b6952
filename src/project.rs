use crate::api::{Backend, ProjectDetail, UploadReceipt};
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_NAME: &str = "My PDF Project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Chat,
    Podcast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ProjectView {
    Loading,
    NeedsUpload,
    Ready { tab: Tab },
}

/// Per-project page: the upload prompt until a PDF is attached, then the
/// chat and podcast tabs.
pub struct ProjectPage<'b, B: Backend> {
    backend: &'b B,
    project_id: String,
    name: String,
    detail: Option<ProjectDetail>,
    view: ProjectView,
    error: Option<String>,
}

impl<'b, B: Backend> ProjectPage<'b, B> {
    pub fn new(backend: &'b B, project_id: impl Into<String>) -> Self {
        Self {
            backend,
            project_id: project_id.into(),
            name: DEFAULT_NAME.to_string(),
            detail: None,
            view: ProjectView::Loading,
            error: None,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> ProjectView {
        self.view
    }

    pub fn detail(&self) -> Option<&ProjectDetail> {
        self.detail.as_ref()
    }

    /// Message of the last failed `open`, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the project detail. A failed fetch falls back to the upload
    /// prompt under the default name.
    pub async fn open(&mut self) {
        self.error = None;
        match self.backend.get_project(&self.project_id).await {
            Ok(detail) => {
                self.name = detail.project.name.clone();
                self.view = if detail.project.pdf_filename.is_some() {
                    ProjectView::Ready { tab: Tab::Chat }
                } else {
                    ProjectView::NeedsUpload
                };
                self.detail = Some(detail);
            }
            Err(e) => {
                warn!(project_id = %self.project_id, error = %e, "failed to load project");
                self.view = ProjectView::NeedsUpload;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn attach(&mut self, receipt: &UploadReceipt) {
        if let Some(detail) = self.detail.as_mut() {
            detail.project.pdf_filename = Some(receipt.filename.clone());
        }
        if !matches!(self.view, ProjectView::Ready { .. }) {
            self.view = ProjectView::Ready { tab: Tab::Chat };
        }
    }

    /// No effect until a PDF is attached.
    pub fn select_tab(&mut self, tab: Tab) {
        if let ProjectView::Ready { .. } = self.view {
            self.view = ProjectView::Ready { tab };
        }
    }
}
