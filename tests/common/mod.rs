#![allow(dead_code)]

use pdfcast::api::{
    ApiError, Backend, BackendStatus, ChatAnswer, CreatedProject, DurationBucket,
    GeneratedPodcast, Podcast, Project, ProjectDetail, Reference, UploadReceipt,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    CreateProject { name: String, description: String },
    ListProjects,
    GetProject(String),
    DeleteProject(String),
    UploadPdf { project_id: String, filename: String, size: usize },
    Chat { project_id: String, query: String, top_k: u32 },
    GeneratePodcast { project_id: String, topic: Option<String>, duration: DurationBucket },
    ListPodcasts(String),
}

/// In-memory stand-in for the backend. Records every call, keeps podcasts
/// oldest first like the real service, and fails any operation registered
/// with `fail_with`.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    projects: Mutex<Vec<Project>>,
    podcasts: Mutex<Vec<Podcast>>,
    failures: Mutex<HashMap<&'static str, Option<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeBackend {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let fake = Self::default();
        *fake.projects.lock().unwrap() = projects;
        fake
    }

    pub fn with_podcasts(podcasts: Vec<Podcast>) -> Self {
        let fake = Self::default();
        *fake.podcasts.lock().unwrap() = podcasts;
        fake
    }

    /// `message: None` mimics a backend error without a detail string.
    pub fn fail_with(&self, op: &'static str, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, message.map(str::to_string));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &'static str, fallback: &str) -> Result<(), ApiError> {
        match self.failures.lock().unwrap().get(op) {
            Some(message) => Err(ApiError::Api {
                status: 500,
                message: message.clone().unwrap_or_else(|| fallback.to_string()),
            }),
            None => Ok(()),
        }
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn new_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Backend for FakeBackend {
    async fn status(&self) -> Result<BackendStatus, ApiError> {
        self.record(Call::Status);
        self.check("status", "Backend is not responding")?;
        Ok(BackendStatus {
            status: "online".into(),
            mongodb_connected: Some(true),
            project_count: Some(self.projects.lock().unwrap().len() as u64),
            cartesia_configured: Some(false),
        })
    }

    async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedProject, ApiError> {
        self.record(Call::CreateProject {
            name: name.into(),
            description: description.into(),
        });
        self.enter().await;
        self.leave();
        self.check("create_project", "Failed to create project")?;
        let id = self.new_id("proj_");
        self.projects
            .lock()
            .unwrap()
            .push(project(&id, name, "2025-01-02T03:04:05"));
        Ok(CreatedProject {
            status: "success".into(),
            project_id: id,
            name: name.into(),
        })
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.record(Call::ListProjects);
        self.check("list_projects", "Failed to fetch projects")?;
        Ok(self.projects())
    }

    async fn get_project(&self, project_id: &str) -> Result<ProjectDetail, ApiError> {
        self.record(Call::GetProject(project_id.into()));
        self.check("get_project", "Failed to fetch project")?;
        let project = self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.project_id == project_id)
            .cloned()
            .ok_or_else(|| ApiError::Api {
                status: 404,
                message: "Project not found".into(),
            })?;
        Ok(ProjectDetail {
            project,
            pdf_path: None,
            pdf_text: None,
            chunks: Vec::new(),
            faiss_index_path: None,
            podcasts: self.podcasts.lock().unwrap().clone(),
        })
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        self.record(Call::DeleteProject(project_id.into()));
        self.check("delete_project", "Failed to delete project")?;
        self.projects
            .lock()
            .unwrap()
            .retain(|p| p.project_id != project_id);
        Ok(())
    }

    async fn upload_pdf(
        &self,
        project_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError> {
        self.record(Call::UploadPdf {
            project_id: project_id.into(),
            filename: filename.into(),
            size: bytes.len(),
        });
        self.check("upload_pdf", "Failed to upload PDF")?;
        Ok(UploadReceipt {
            status: "success".into(),
            filename: filename.into(),
            total_chunks: 4,
            total_pages: 2,
            word_count: 812,
        })
    }

    async fn chat(
        &self,
        project_id: &str,
        query: &str,
        top_k: u32,
    ) -> Result<ChatAnswer, ApiError> {
        self.record(Call::Chat {
            project_id: project_id.into(),
            query: query.into(),
            top_k,
        });
        self.enter().await;
        self.leave();
        self.check("chat", "Failed to get response")?;
        Ok(ChatAnswer {
            answer: format!("About {query}"),
            references: vec![Reference {
                page: 3,
                text_preview: "Methods section...".into(),
                relevance: 0.82,
            }],
        })
    }

    async fn generate_podcast(
        &self,
        project_id: &str,
        topic: Option<&str>,
        duration: DurationBucket,
    ) -> Result<GeneratedPodcast, ApiError> {
        self.record(Call::GeneratePodcast {
            project_id: project_id.into(),
            topic: topic.map(str::to_string),
            duration,
        });
        self.check("generate_podcast", "Failed to generate podcast")?;
        let id = self.new_id("pod_");
        let mut pod = podcast(&id, topic, duration.as_str());
        pod.script = "HOST: Welcome.\nGUEST: Thanks.".into();
        pod.segments_count = 2;
        self.podcasts.lock().unwrap().push(pod.clone());
        Ok(GeneratedPodcast {
            status: "success".into(),
            podcast_id: id,
            podcast_url: format!("/audio/{}", pod.audio_filename),
            script: pod.script,
            segments_count: pod.segments_count,
        })
    }

    async fn list_podcasts(&self, project_id: &str) -> Result<Vec<Podcast>, ApiError> {
        self.record(Call::ListPodcasts(project_id.into()));
        self.check("list_podcasts", "Failed to fetch podcasts")?;
        Ok(self.podcasts.lock().unwrap().clone())
    }
}

pub fn project(id: &str, name: &str, created_at: &str) -> Project {
    Project {
        project_id: id.into(),
        name: name.into(),
        description: String::new(),
        created_at: created_at.into(),
        pdf_filename: None,
        podcast_count: 0,
    }
}

pub fn podcast(id: &str, topic: Option<&str>, duration: &str) -> Podcast {
    Podcast {
        podcast_id: id.into(),
        created_at: "2025-03-01T10:00:00".into(),
        topic: topic.map(str::to_string),
        duration: duration.into(),
        script: String::new(),
        audio_path: format!("audio/{id}.mp3"),
        audio_filename: format!("{id}.mp3"),
        segments_count: 0,
    }
}
