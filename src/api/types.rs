use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    #[serde(default)]
    pub mongodb_connected: Option<bool>,
    #[serde(default)]
    pub project_count: Option<u64>,
    #[serde(default)]
    pub cartesia_configured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub pdf_filename: Option<String>,
    #[serde(default)]
    pub podcast_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default)]
    pub pdf_text: Option<String>,
    #[serde(default)]
    pub chunks: Vec<TextChunk>,
    #[serde(default)]
    pub faiss_index_path: Option<String>,
    #[serde(default)]
    pub podcasts: Vec<Podcast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    pub podcast_id: String,
    pub created_at: String,
    #[serde(default)]
    pub topic: Option<String>,
    /// Kept as the backend's raw string so records with an unexpected
    /// bucket still list.
    pub duration: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub audio_path: String,
    pub audio_filename: String,
    #[serde(default)]
    pub segments_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub page: u32,
    pub text_preview: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProject {
    pub status: String,
    pub project_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub status: String,
    pub filename: String,
    pub total_chunks: u32,
    pub total_pages: u32,
    pub word_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPodcast {
    pub status: String,
    pub podcast_id: String,
    pub podcast_url: String,
    pub script: String,
    pub segments_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub project_id: &'a str,
    pub query: &'a str,
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodcastRequest<'a> {
    pub project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a str>,
    pub duration: DurationBucket,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectList {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PodcastList {
    #[serde(default)]
    pub podcasts: Vec<Podcast>,
}

/// Target podcast length. The minute ranges are display hints only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Short,
    #[default]
    Medium,
    Long,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 3] = [Self::Short, Self::Medium, Self::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "3-5 min",
            Self::Medium => "5-8 min",
            Self::Long => "10-15 min",
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!(
                "unknown duration {other:?} (expected short, medium or long)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Audio,
    Pdf,
}

impl AssetKind {
    pub(crate) fn path_prefix(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Pdf => "pdf",
        }
    }

    pub(crate) fn not_found(self) -> &'static str {
        match self {
            Self::Audio => "Audio not found",
            Self::Pdf => "PDF not found",
        }
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown asset kind {other:?} (expected audio or pdf)")),
        }
    }
}
