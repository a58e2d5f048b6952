pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{
    AssetKind, BackendStatus, ChatAnswer, CreatedProject, DurationBucket, GeneratedPodcast,
    Podcast, Project, ProjectDetail, Reference, TextChunk, UploadReceipt,
};

/// Everything the client asks of the backend. Panels and pages only ever talk
/// to the backend through this trait.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn status(&self) -> Result<BackendStatus, ApiError>;
    async fn create_project(&self, name: &str, description: &str)
        -> Result<CreatedProject, ApiError>;
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    async fn get_project(&self, project_id: &str) -> Result<ProjectDetail, ApiError>;
    async fn delete_project(&self, project_id: &str) -> Result<(), ApiError>;
    async fn upload_pdf(
        &self,
        project_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError>;
    async fn chat(&self, project_id: &str, query: &str, top_k: u32)
        -> Result<ChatAnswer, ApiError>;
    async fn generate_podcast(
        &self,
        project_id: &str,
        topic: Option<&str>,
        duration: DurationBucket,
    ) -> Result<GeneratedPodcast, ApiError>;
    async fn list_podcasts(&self, project_id: &str) -> Result<Vec<Podcast>, ApiError>;
}

/// A failed backend call. `Display` is always the one message shown to the
/// user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response from backend: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
