use crate::api::{ApiError, Backend, DurationBucket, GeneratedPodcast, Podcast};
use tracing::{info, warn};

/// Podcast generation form plus the project's podcast history, newest first.
pub struct PodcastPanel<'b, B: Backend> {
    backend: &'b B,
    project_id: String,
    podcasts: Vec<Podcast>,
    selected: usize,
    duration: DurationBucket,
    topic: String,
    /// Mirrors the disabled generate button while a request is pending.
    generating: bool,
    loading: bool,
    error: Option<String>,
}

impl<'b, B: Backend> PodcastPanel<'b, B> {
    pub fn new(backend: &'b B, project_id: impl Into<String>, duration: DurationBucket) -> Self {
        Self {
            backend,
            project_id: project_id.into(),
            podcasts: Vec::new(),
            selected: 0,
            duration,
            topic: String::new(),
            generating: false,
            loading: true,
            error: None,
        }
    }

    pub fn podcasts(&self) -> &[Podcast] {
        &self.podcasts
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Podcast> {
        self.podcasts.get(self.selected)
    }

    pub fn duration(&self) -> DurationBucket {
        self.duration
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_duration(&mut self, duration: DurationBucket) {
        self.duration = duration;
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    /// Returns false when `index` is out of range; the selection is kept.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.podcasts.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn generate_label(&self) -> &'static str {
        if self.podcasts.is_empty() {
            "Generate Podcast"
        } else {
            "Generate New Podcast"
        }
    }

    /// Reloads the full history. The backend lists oldest first, so the
    /// order is reversed and the newest entry selected.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let result = self.backend.list_podcasts(&self.project_id).await;
        self.loading = false;
        match result {
            Ok(mut podcasts) => {
                podcasts.reverse();
                info!(project_id = %self.project_id, count = podcasts.len(), "podcasts loaded");
                self.podcasts = podcasts;
                self.selected = 0;
                Ok(())
            }
            Err(e) => {
                warn!(project_id = %self.project_id, error = %e, "failed to load podcasts");
                Err(e)
            }
        }
    }

    /// One generation request with the current form values, followed by a
    /// full reload on success. A blank topic is sent as absent.
    pub async fn generate(&mut self) -> Option<GeneratedPodcast> {
        self.generating = true;
        self.error = None;

        let topic = Some(self.topic.trim()).filter(|t| !t.is_empty());
        let result = self
            .backend
            .generate_podcast(&self.project_id, topic, self.duration)
            .await;

        let generated = match result {
            Ok(generated) => {
                info!(
                    podcast_id = %generated.podcast_id,
                    segments = generated.segments_count,
                    "podcast generated"
                );
                // The new entry is already stored server side; a failed
                // reload only leaves a stale list.
                let _ = self.load().await;
                self.topic.clear();
                Some(generated)
            }
            Err(e) => {
                warn!(project_id = %self.project_id, error = %e, "podcast generation failed");
                self.error = Some(e.to_string());
                None
            }
        };

        self.generating = false;
        generated
    }
}
