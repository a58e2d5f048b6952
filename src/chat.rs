use crate::api::{Backend, Reference};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Local display order only; never sent to the backend.
    pub seq: u64,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(Rejection),
    Answered,
    /// The request failed; an error turn was appended in place of an answer.
    Failed(String),
}

pub fn error_turn(message: &str) -> String {
    format!("Error: {message}. Please make sure the PDF is uploaded and processed.")
}

/// Session transcript for one project. Lives only as long as the session.
pub struct ChatSession<'b, B: Backend> {
    backend: &'b B,
    project_id: String,
    top_k: u32,
    messages: Vec<ChatMessage>,
    next_seq: u64,
    /// Mirrors the disabled send control. `submit` takes `&mut self`, so a
    /// second submission cannot start while one is pending.
    busy: bool,
}

impl<'b, B: Backend> ChatSession<'b, B> {
    pub fn new(backend: &'b B, project_id: impl Into<String>, top_k: u32, greeting: &str) -> Self {
        let mut session = Self {
            backend,
            project_id: project_id.into(),
            top_k,
            messages: Vec::new(),
            next_seq: 1,
            busy: false,
        };
        session.push(Role::Assistant, greeting.to_string(), Vec::new());
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Appends the user's turn, asks the backend once, and appends exactly
    /// one assistant turn (answer or error).
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Rejected(Rejection::Empty);
        }

        self.push(Role::User, input.to_string(), Vec::new());
        self.busy = true;
        debug!(project_id = %self.project_id, top_k = self.top_k, "chat request");

        let outcome = match self.backend.chat(&self.project_id, input, self.top_k).await {
            Ok(answer) => {
                self.push(Role::Assistant, answer.answer, answer.references);
                SubmitOutcome::Answered
            }
            Err(e) => {
                let message = e.to_string();
                warn!(project_id = %self.project_id, error = %message, "chat request failed");
                self.push(Role::Assistant, error_turn(&message), Vec::new());
                SubmitOutcome::Failed(message)
            }
        };

        self.busy = false;
        outcome
    }

    fn push(&mut self, role: Role, content: String, references: Vec<Reference>) {
        self.messages.push(ChatMessage {
            seq: self.next_seq,
            role,
            content,
            references,
        });
        self.next_seq += 1;
    }
}
