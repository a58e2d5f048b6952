mod common;

use common::{Call, FakeBackend};
use pdfcast::upload::{UploadError, UploadPanel, UploadStage, is_pdf_name};
use std::io::Write;

fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

#[test]
fn pdf_names() {
    assert!(is_pdf_name("paper.pdf"));
    assert!(is_pdf_name("SCAN.PDF"));
    assert!(!is_pdf_name("notes.txt"));
    assert!(!is_pdf_name("paper.pdf.zip"));
    assert!(!is_pdf_name(".pdf"));
}

#[tokio::test]
async fn non_pdf_is_rejected_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "notes.txt", b"just text");
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 0);

    let err = panel.upload(&path).await.unwrap_err();

    assert!(matches!(err, UploadError::NotPdf));
    assert_eq!(err.to_string(), "Please upload a PDF file");
    assert!(backend.calls().is_empty());
    assert_eq!(panel.stage(), &UploadStage::Idle);
}

#[tokio::test]
async fn missing_non_pdf_is_rejected_without_reading() {
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 0);

    let err = panel
        .upload(std::path::Path::new("/definitely/not/here/notes.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::NotPdf));
}

#[tokio::test]
async fn pdf_upload_reaches_ready() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "paper.pdf", b"%PDF-1.4 fake");
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 1024);

    let receipt = panel.upload(&path).await.unwrap();

    assert_eq!(receipt.filename, "paper.pdf");
    assert_eq!(receipt.total_pages, 2);
    assert_eq!(
        backend.calls(),
        vec![Call::UploadPdf {
            project_id: "p1".into(),
            filename: "paper.pdf".into(),
            size: 13
        }]
    );
    assert!(matches!(panel.stage(), UploadStage::Ready { .. }));
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 4);

    let err = panel
        .upload_bytes("big.pdf", vec![0u8; 5])
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::TooLarge { size: 5, limit: 4 }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn oversized_file_is_rejected_from_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.pdf");
    // Sparse: the size is set without writing any data.
    std::fs::File::create(&path)
        .unwrap()
        .set_len(512 * 1024 * 1024)
        .unwrap();
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 1024);

    let err = panel.upload(&path).await.unwrap_err();

    assert!(matches!(
        err,
        UploadError::TooLarge {
            size: 536_870_912,
            limit: 1024
        }
    ));
    assert!(backend.calls().is_empty());
    assert_eq!(panel.stage(), &UploadStage::Idle);
}

#[tokio::test]
async fn missing_pdf_is_a_read_error() {
    let backend = FakeBackend::default();
    let mut panel = UploadPanel::new(&backend, "p1", 1024);

    let err = panel
        .upload(std::path::Path::new("/definitely/not/here/paper.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Read { .. }));
    assert!(backend.calls().is_empty());
}

#[test]
fn stage_progress_text() {
    let processing = UploadStage::Processing {
        file_name: "paper.pdf".into(),
    };
    assert_eq!(processing.progress_text(), "Processing PDF...");
    assert_eq!(UploadStage::Idle.progress_text(), "");
}

#[tokio::test]
async fn backend_failure_is_reported() {
    let backend = FakeBackend::default();
    backend.fail_with("upload_pdf", Some("Project not found"));
    let mut panel = UploadPanel::new(&backend, "missing", 0);

    let err = panel
        .upload_bytes("paper.pdf", b"%PDF".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Project not found");
    assert_eq!(
        panel.stage(),
        &UploadStage::Failed {
            message: "Project not found".into()
        }
    );
    assert!(!panel.is_busy());
}
