use std::path::PathBuf;

use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, Result},
};

/// Maximum program PDF size (20 MB)
const MAX_PDF_SIZE: usize = 20 * 1024 * 1024;

/// Outcome of the one-shot storage probe run at startup. Held in app state
/// and reported by /health; never fatal.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StorageStatus {
    Ready {
        provider: String,
        root: PathBuf,
    },
    Degraded {
        fallback: String,
        reason: String,
    },
}

impl StorageStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, StorageStatus::Ready { .. })
    }
}

/// Probes the configured asset root: create the directory, then write and
/// remove a marker file. On any failure the service keeps running and the
/// configured fallback provider is named in the degraded status.
pub async fn init(config: &StorageConfig) -> StorageStatus {
    match probe(config).await {
        Ok(root) => {
            tracing::info!(provider = %config.provider, root = %root.display(), "Program PDF storage ready");
            StorageStatus::Ready {
                provider: config.provider.clone(),
                root,
            }
        }
        Err(reason) => {
            tracing::warn!(
                fallback = %config.fallback_provider,
                "Program PDF storage unavailable ({}); serving degraded, uploads go to the fallback provider",
                reason
            );
            StorageStatus::Degraded {
                fallback: config.fallback_provider.clone(),
                reason,
            }
        }
    }
}

async fn probe(config: &StorageConfig) -> std::result::Result<PathBuf, String> {
    let root = PathBuf::from(&config.asset_root);

    fs::create_dir_all(&root)
        .await
        .map_err(|e| format!("cannot create {}: {}", root.display(), e))?;

    let marker = root.join(".storage-probe");
    fs::write(&marker, b"ok")
        .await
        .map_err(|e| format!("cannot write to {}: {}", root.display(), e))?;
    fs::remove_file(&marker)
        .await
        .map_err(|e| format!("cannot remove probe file in {}: {}", root.display(), e))?;

    Ok(root)
}

/// Save an uploaded funeral program PDF under the asset root.
/// Returns the relative URL path for storing on the funeral row
/// (e.g., "programs/abc123.pdf").
pub async fn save_program_pdf(asset_root: &str, filename: &str, data: &[u8]) -> Result<String> {
    if data.len() > MAX_PDF_SIZE {
        return Err(AppError::BadRequest("File too large (max 20 MB)".to_string()));
    }

    let extension = filename
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .ok_or_else(|| AppError::BadRequest("Invalid filename".to_string()))?;

    if extension != "pdf" {
        return Err(AppError::BadRequest(
            "Invalid file type. Only PDF programs are accepted".to_string(),
        ));
    }

    let root = PathBuf::from(asset_root);
    fs::create_dir_all(&root).await.map_err(|e| {
        AppError::Internal(format!("Failed to create asset directory: {}", e))
    })?;

    let new_filename = format!("{}.pdf", Uuid::new_v4());
    let file_path = root.join(&new_filename);

    let mut file = fs::File::create(&file_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create file: {}", e))
    })?;

    file.write_all(data).await.map_err(|e| {
        AppError::Internal(format!("Failed to write file: {}", e))
    })?;

    Ok(format!("programs/{}", new_filename))
}
