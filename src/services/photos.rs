//! Photo store collaborator
//!
//! Images (bookmaker logos, profile pictures) live in Cloudinary. The rest of
//! the crate only sees the [`PhotoService`] capability.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::{PhotoConfig, SignatureAlgorithm};
use crate::errors::{Result, TrakerError};

/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadResult {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait PhotoService: Send + Sync {
    /// `Ok(None)` for empty content; remote errors are raised
    async fn upload(&self, file: PhotoUpload) -> Result<Option<PhotoUploadResult>>;

    /// Returns a status message; remote errors are raised
    async fn delete(&self, public_id: &str) -> Result<String>;
}

/// Cloudinary REST client
///
/// Calls are blocking `ureq` requests run on the blocking thread pool.
#[derive(Clone)]
pub struct CloudinaryPhotoService {
    agent: Agent,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    algorithm: SignatureAlgorithm,
}

impl CloudinaryPhotoService {
    pub fn new(config: &PhotoConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
            algorithm: config.signature_algorithm,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.cloud_name, action
        )
    }

    /// Send a signed form to Cloudinary and return the JSON body
    fn post_signed(&self, action: &str, mut params: Vec<(&'static str, String)>) -> Result<serde_json::Value> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        params.push(("timestamp", timestamp));

        let signature = sign_params(&params, &self.api_secret, self.algorithm);
        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        if self.algorithm != SignatureAlgorithm::Sha1 {
            params.push(("signature_algorithm", self.algorithm.to_string()));
        }

        let url = self.endpoint(action);
        let resp = self
            .agent
            .post(&url)
            .send_form(params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| TrakerError::photo_service(format!("Request to {} failed: {}", url, e)))?;

        let json: serde_json::Value = resp
            .into_body()
            .read_json()
            .map_err(|e| TrakerError::photo_service(format!("Invalid response from {}: {}", url, e)))?;

        if let Some(message) = json["error"]["message"].as_str() {
            return Err(TrakerError::photo_service(message));
        }

        Ok(json)
    }

    fn upload_sync(&self, file: PhotoUpload) -> Result<PhotoUploadResult> {
        let data_uri = to_data_uri(&file);
        let params = vec![("file", data_uri), ("folder", self.folder.clone())];

        let json = self.post_signed("upload", params)?;

        let url = json["secure_url"]
            .as_str()
            .ok_or_else(|| TrakerError::photo_service("Upload response has no secure_url"))?;
        let public_id = json["public_id"]
            .as_str()
            .ok_or_else(|| TrakerError::photo_service("Upload response has no public_id"))?;

        info!("Uploaded photo {} as {}", file.filename, public_id);
        Ok(PhotoUploadResult {
            url: url.to_string(),
            public_id: public_id.to_string(),
        })
    }

    fn delete_sync(&self, public_id: String) -> Result<String> {
        let json = self.post_signed("destroy", vec![("public_id", public_id.clone())])?;

        if json["result"].as_str() == Some("ok") {
            debug!("Deleted photo {}", public_id);
            Ok("Photo deleted successfully".to_string())
        } else {
            warn!("Photo {} was not deleted: {}", public_id, json["result"]);
            Ok("Photo deletion failed".to_string())
        }
    }
}

#[async_trait]
impl PhotoService for CloudinaryPhotoService {
    async fn upload(&self, file: PhotoUpload) -> Result<Option<PhotoUploadResult>> {
        if file.bytes.is_empty() {
            return Ok(None);
        }

        let this = self.clone();
        tokio::task::spawn_blocking(move || this.upload_sync(file))
            .await
            .map_err(|e| TrakerError::internal(format!("Photo upload task failed: {}", e)))?
            .map(Some)
    }

    async fn delete(&self, public_id: &str) -> Result<String> {
        let this = self.clone();
        let public_id = public_id.to_string();
        tokio::task::spawn_blocking(move || this.delete_sync(public_id))
            .await
            .map_err(|e| TrakerError::internal(format!("Photo delete task failed: {}", e)))?
    }
}

/// Used when no Cloudinary credentials are configured
pub struct DisabledPhotoService;

#[async_trait]
impl PhotoService for DisabledPhotoService {
    async fn upload(&self, file: PhotoUpload) -> Result<Option<PhotoUploadResult>> {
        if file.bytes.is_empty() {
            return Ok(None);
        }
        Err(TrakerError::photo_service("Photo storage is not configured"))
    }

    async fn delete(&self, _public_id: &str) -> Result<String> {
        Err(TrakerError::photo_service("Photo storage is not configured"))
    }
}

/// Cloudinary request signature
///
/// Parameters sorted by name and joined as `k=v&k=v` with the secret appended,
/// then hex digested with the account's algorithm. `file` and `api_key` are
/// never part of the signed string.
fn sign_params(
    params: &[(&'static str, String)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(k, _)| {
            !matches!(
                *k,
                "file" | "api_key" | "resource_type" | "cloud_name" | "signature_algorithm"
            )
        })
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let joined = signed
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let payload = format!("{}{}", joined, api_secret);
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

fn to_data_uri(file: &PhotoUpload) -> String {
    let extension = file
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };

    format!("data:{};base64,{}", mime, STANDARD.encode(&file.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", "1315060510".to_string()),
            ("file", "data:...".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ]
    }

    #[test]
    fn test_signature_defaults_to_sha1() {
        // Cloudinary 文档中的签名示例
        assert_eq!(
            sign_params(&sample_params(), "abcd", SignatureAlgorithm::default()),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_signature_sha256_ignores_file_and_sorts_params() {
        let mut params = sample_params();
        params.push(("signature_algorithm", "sha256".to_string()));
        assert_eq!(
            sign_params(&params, "abcd", SignatureAlgorithm::Sha256),
            "cc927e1290f9e3ae4c1a741eda21a4630b4ce80f9ce0bc0296337d25cf40f91e"
        );
    }

    #[test]
    fn test_data_uri_mime() {
        let file = PhotoUpload {
            bytes: vec![1, 2, 3],
            filename: "logo.PNG".to_string(),
        };
        assert_eq!(to_data_uri(&file), "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn test_empty_upload_returns_none() {
        let service = CloudinaryPhotoService::new(&PhotoConfig::default());
        let result = service
            .upload(PhotoUpload {
                bytes: Vec::new(),
                filename: "empty.png".to_string(),
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_disabled_service_raises() {
        let result = DisabledPhotoService
            .upload(PhotoUpload {
                bytes: vec![1],
                filename: "a.png".to_string(),
            })
            .await;
        assert!(matches!(result, Err(TrakerError::PhotoService(_))));
    }
}
