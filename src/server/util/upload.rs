use std::path::Path;

use chrono::Utc;

use crate::{model::price::UploadedFile, server::error::Error};

/// Directory below the static root holding proof images
pub const UPLOAD_SUBDIR: &str = "uploads";

/// Extension of the uploaded file, `png` when missing or not alphanumeric
fn file_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("png")
        .to_string()
}

/// `{timestamp}_{provider}.{ext}` with spaces and path separators replaced
pub fn proof_file_name(provider_name: &str, file_name: Option<&str>) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let stem: String = format!("{}_{}", timestamp, provider_name)
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();

    format!("{}.{}", stem.replace("..", "_"), file_extension(file_name))
}

/// Writes a proof image below `static_dir/uploads`, returning its public `static/...` path
pub async fn save_proof_image(
    static_dir: &Path,
    provider_name: &str,
    file: &UploadedFile,
) -> Result<String, Error> {
    let upload_dir = static_dir.join(UPLOAD_SUBDIR);
    tokio::fs::create_dir_all(&upload_dir).await?;

    let file_name = proof_file_name(provider_name, file.file_name.as_deref());
    tokio::fs::write(upload_dir.join(&file_name), &file.bytes).await?;

    tracing::debug!("Stored proof image {} for {}", file_name, provider_name);

    Ok(format!("static/{}/{}", UPLOAD_SUBDIR, file_name))
}
