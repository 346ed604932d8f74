use memoriam::{
    config::StorageConfig,
    storage::{self, StorageStatus},
};
use uuid::Uuid;

fn temp_root() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("memoriam-test-{}", Uuid::new_v4()))
}

#[tokio::test]
async fn init_reports_ready_when_the_root_is_writable() {
    let root = temp_root();
    let config = StorageConfig {
        provider: "local-disk".to_string(),
        asset_root: root.to_string_lossy().into_owned(),
        fallback_provider: "cloudinary".to_string(),
    };

    let status = storage::init(&config).await;
    assert!(status.is_ready());
    match status {
        StorageStatus::Ready { provider, root: ready_root } => {
            assert_eq!(provider, "local-disk");
            assert_eq!(ready_root, root);
        }
        StorageStatus::Degraded { .. } => unreachable!(),
    }

    tokio::fs::remove_dir_all(&root).await.ok();
}

#[tokio::test]
async fn init_degrades_to_the_named_fallback_without_failing() {
    // A regular file where the directory should go makes the probe fail
    let blocker = temp_root();
    tokio::fs::write(&blocker, b"not a directory").await.unwrap();

    let config = StorageConfig {
        provider: "local-disk".to_string(),
        asset_root: blocker.join("programs").to_string_lossy().into_owned(),
        fallback_provider: "cloudinary".to_string(),
    };

    let status = storage::init(&config).await;
    assert!(!status.is_ready());
    match status {
        StorageStatus::Degraded { fallback, reason } => {
            assert_eq!(fallback, "cloudinary");
            assert!(!reason.is_empty());
        }
        StorageStatus::Ready { .. } => unreachable!(),
    }

    tokio::fs::remove_file(&blocker).await.ok();
}

#[tokio::test]
async fn program_uploads_accept_only_pdfs() {
    let root = temp_root();
    let root_str = root.to_string_lossy().into_owned();

    let err = storage::save_program_pdf(&root_str, "program.docx", b"payload")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("PDF"));

    let url = storage::save_program_pdf(&root_str, "program.pdf", b"%PDF-1.7")
        .await
        .unwrap();
    assert!(url.starts_with("programs/"));
    assert!(url.ends_with(".pdf"));

    let on_disk = root.join(url.trim_start_matches("programs/"));
    assert!(on_disk.exists());

    tokio::fs::remove_dir_all(&root).await.ok();
}
