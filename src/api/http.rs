use super::{
    ApiError, Backend,
    types::{
        AssetKind, BackendStatus, ChatAnswer, ChatRequest, CreateProjectRequest, CreatedProject,
        DurationBucket, GeneratedPodcast, Podcast, PodcastList, PodcastRequest, Project,
        ProjectDetail, ProjectList, UploadReceipt,
    },
};
use reqwest::{Client, Method, RequestBuilder, Response, Url, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// reqwest-backed client for the PDF-to-podcast REST API. Each call is a
/// single round trip: no retry, no timeout, no caching.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| ApiError::Url(format!("{trimmed}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{trimmed}: not a base URL")));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn audio_url(&self, filename: &str) -> Result<Url, ApiError> {
        self.asset_url(AssetKind::Audio, filename)
    }

    pub fn pdf_url(&self, filename: &str) -> Result<Url, ApiError> {
        self.asset_url(AssetKind::Pdf, filename)
    }

    pub fn asset_url(&self, kind: AssetKind, filename: &str) -> Result<Url, ApiError> {
        self.endpoint(&[kind.path_prefix(), filename])
    }

    /// Downloads a static asset (podcast audio or the uploaded PDF).
    pub async fn fetch_asset(&self, kind: AssetKind, filename: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.asset_url(kind, filename)?;
        let resp = self.send(self.client.get(url.clone()), &url).await?;
        let resp = check(resp, kind.not_found()).await?;
        let bytes = resp.bytes().await?;
        debug!(bytes = bytes.len(), %url, "asset downloaded");
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{}: not a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<(RequestBuilder, Url), ApiError> {
        let url = self.endpoint(segments)?;
        Ok((self.client.request(method, url.clone()), url))
    }

    async fn send(&self, req: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        debug!(path = url.path(), "backend request");
        req.send().await.map_err(|e| {
            warn!(path = url.path(), error = %e, "backend unreachable");
            ApiError::Transport(e)
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        url: &Url,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let resp = self.send(req, url).await?;
        let resp = check(resp, fallback).await?;
        decode(resp).await
    }
}

/// Turns a non-2xx response into `ApiError::Api`, preferring the backend's
/// `detail` string over `fallback`.
async fn check(resp: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let path = resp.url().path().to_string();
    let body = resp.bytes().await.unwrap_or_default();
    let message = detail_message(&body).unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), path = %path, %message, "backend returned an error");
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

pub(crate) fn detail_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl Backend for HttpBackend {
    async fn status(&self) -> Result<BackendStatus, ApiError> {
        let (req, url) = self.request(Method::GET, &["status"])?;
        self.call(req, &url, "Backend is not responding").await
    }

    async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedProject, ApiError> {
        let (req, url) = self.request(Method::POST, &["projects"])?;
        let req = req.json(&CreateProjectRequest { name, description });
        self.call(req, &url, "Failed to create project").await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let (req, url) = self.request(Method::GET, &["projects"])?;
        let list: ProjectList = self.call(req, &url, "Failed to fetch projects").await?;
        Ok(list.projects)
    }

    async fn get_project(&self, project_id: &str) -> Result<ProjectDetail, ApiError> {
        let (req, url) = self.request(Method::GET, &["projects", project_id])?;
        self.call(req, &url, "Failed to fetch project").await
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        let (req, url) = self.request(Method::DELETE, &["projects", project_id])?;
        let resp = self.send(req, &url).await?;
        check(resp, "Failed to delete project").await?;
        Ok(())
    }

    async fn upload_pdf(
        &self,
        project_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError> {
        let (req, url) = self.request(Method::POST, &["projects", project_id, "upload_pdf"])?;
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);
        self.call(req.multipart(form), &url, "Failed to upload PDF").await
    }

    async fn chat(
        &self,
        project_id: &str,
        query: &str,
        top_k: u32,
    ) -> Result<ChatAnswer, ApiError> {
        let (req, url) = self.request(Method::POST, &["chat"])?;
        let req = req.json(&ChatRequest {
            project_id,
            query,
            top_k,
        });
        self.call(req, &url, "Failed to get response").await
    }

    async fn generate_podcast(
        &self,
        project_id: &str,
        topic: Option<&str>,
        duration: DurationBucket,
    ) -> Result<GeneratedPodcast, ApiError> {
        let (req, url) = self.request(Method::POST, &["generate_podcast"])?;
        let req = req.json(&PodcastRequest {
            project_id,
            topic,
            duration,
        });
        self.call(req, &url, "Failed to generate podcast").await
    }

    async fn list_podcasts(&self, project_id: &str) -> Result<Vec<Podcast>, ApiError> {
        let (req, url) = self.request(Method::GET, &["projects", project_id, "podcasts"])?;
        let list: PodcastList = self.call(req, &url, "Failed to fetch podcasts").await?;
        Ok(list.podcasts)
    }
}
