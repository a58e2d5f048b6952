use crate::api::{ApiError, Backend, UploadReceipt};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStage {
    Idle,
    /// The request is in flight; the backend extracts and indexes the PDF
    /// before answering.
    Processing { file_name: String },
    Ready { receipt: UploadReceipt },
    Failed { message: String },
}

impl UploadStage {
    pub fn progress_text(&self) -> &'static str {
        match self {
            UploadStage::Idle => "",
            UploadStage::Processing { .. } => "Processing PDF...",
            UploadStage::Ready { .. } => "Ready to Go!",
            UploadStage::Failed { .. } => "Upload failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload a PDF file")]
    NotPdf,
    #[error("File is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// True when `name` carries a `.pdf` extension, in any letter case.
pub fn is_pdf_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.len() > ".pdf".len() && lower.ends_with(".pdf")
}

/// Upload prompt for a project that has no PDF yet.
pub struct UploadPanel<'b, B: Backend> {
    backend: &'b B,
    project_id: String,
    max_file_bytes: u64,
    stage: UploadStage,
}

impl<'b, B: Backend> UploadPanel<'b, B> {
    pub fn new(backend: &'b B, project_id: impl Into<String>, max_file_bytes: u64) -> Self {
        Self {
            backend,
            project_id: project_id.into(),
            max_file_bytes,
            stage: UploadStage::Idle,
        }
    }

    pub fn stage(&self) -> &UploadStage {
        &self.stage
    }

    /// Mirrors the disabled drop zone. The upload methods take `&mut self`,
    /// so a second upload cannot start while one is pending.
    pub fn is_busy(&self) -> bool {
        matches!(self.stage, UploadStage::Processing { .. })
    }

    /// Validates the file name before touching the filesystem and the size
    /// from metadata before reading, then issues one upload request.
    pub async fn upload(&mut self, path: &Path) -> Result<UploadReceipt, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if !is_pdf_name(&file_name) {
            return Err(UploadError::NotPdf);
        }

        let read_err = |source: std::io::Error| UploadError::Read {
            path: path.display().to_string(),
            source,
        };
        let size = tokio::fs::metadata(path).await.map_err(read_err)?.len();
        self.check_size(size)?;

        let bytes = tokio::fs::read(path).await.map_err(read_err)?;
        self.upload_bytes(&file_name, bytes).await
    }

    pub async fn upload_bytes(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, UploadError> {
        if !is_pdf_name(file_name) {
            return Err(UploadError::NotPdf);
        }
        self.check_size(bytes.len() as u64)?;

        self.enter(UploadStage::Processing {
            file_name: file_name.to_string(),
        });

        match self
            .backend
            .upload_pdf(&self.project_id, file_name, bytes)
            .await
        {
            Ok(receipt) => {
                info!(
                    filename = %receipt.filename,
                    pages = receipt.total_pages,
                    chunks = receipt.total_chunks,
                    words = receipt.word_count,
                    "pdf indexed"
                );
                self.enter(UploadStage::Ready {
                    receipt: receipt.clone(),
                });
                Ok(receipt)
            }
            Err(e) => {
                self.enter(UploadStage::Failed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if self.max_file_bytes > 0 && size > self.max_file_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(())
    }

    fn enter(&mut self, stage: UploadStage) {
        info!(project_id = %self.project_id, stage = stage.progress_text(), "upload stage");
        self.stage = stage;
    }
}
