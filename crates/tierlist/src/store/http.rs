//! Object store client for a running tierlist server.

use reqwest::blocking::{multipart, Client, Response};
use serde::Deserialize;

use crate::error::{Result, TierlistError};
use crate::tier::ImageId;

use super::{image_id, ObjectStore, Upload};

#[derive(Deserialize)]
struct DatasetResponse {
    dataset: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    files: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(default)]
    file: Option<String>,
}

/// Blocking HTTP client for the `/api` routes of the image server.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    /// Create a client for a server such as `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TierlistError::Config(format!(
                "Server URL must start with http:// or https://: '{}'",
                base_url
            )));
        }
        let client = Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an image identifier, for opening in a viewer.
    pub fn image_url(&self, image: &str) -> String {
        format!("{}{}", self.base_url, image)
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Turn a non-success response into an error, keeping upload rejections
    /// distinguishable.
    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) if body.error == "upload_rejected" => Err(TierlistError::UploadRejected {
                file: body.file.unwrap_or_default(),
                reason: body.message,
            }),
            Ok(body) => Err(TierlistError::StoreUnavailable(format!(
                "{} ({}): {}",
                status, body.error, body.message
            ))),
            Err(_) => Err(TierlistError::StoreUnavailable(format!("{}: {}", status, text))),
        }
    }
}

impl ObjectStore for HttpStore {
    fn dataset(&self) -> Result<String> {
        let response = Self::check(self.client.get(self.api("dataset")).send()?)?;
        Ok(response.json::<DatasetResponse>()?.dataset)
    }

    fn list(&self) -> Result<Vec<ImageId>> {
        let response = Self::check(self.client.get(self.api("list-images")).send()?)?;
        Ok(response.json()?)
    }

    fn store(&self, upload: &Upload) -> Result<ImageId> {
        self.store_all(std::slice::from_ref(upload))?
            .into_iter()
            .next()
            .ok_or_else(|| TierlistError::StoreUnavailable("server stored no file".to_string()))
    }

    fn store_all(&self, uploads: &[Upload]) -> Result<Vec<ImageId>> {
        let mut form = multipart::Form::new();
        for upload in uploads {
            let part = multipart::Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(&upload.content_type)?;
            form = form.part("images", part);
        }

        let response = Self::check(self.client.post(self.api("upload")).multipart(form).send()?)?;
        let body: UploadResponse = response.json()?;
        Ok(body.files.iter().map(|name| image_id(name)).collect())
    }

    fn delete_all(&self) -> Result<()> {
        Self::check(self.client.delete(self.api("delete-all-images")).send()?)?;
        Ok(())
    }
}
