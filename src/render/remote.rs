//! HTML-to-PDF conversion through a remote job-based conversion service.
//!
//! A job is created with three tasks (upload import, convert, URL export),
//! the sheet markup is uploaded to the import task's form, and the job is
//! polled until it finishes, fails, times out or is cancelled. Every HTTP
//! request carries its own timeout and the whole wait is bounded by the
//! configured job timeout.

use super::{BackendError, RenderBackend};
use crate::config::RemoteConfig;
use crate::markup::PrintSheet;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use standee_types::{ListingRecord, RenderArtifact};
use std::future::Future;
use tokio_util::sync::CancellationToken;

const IMPORT_TASK: &str = "import-html";
const EXPORT_TASK: &str = "export-pdf";
const UPLOAD_FILE_NAME: &str = "standee.html";

#[derive(Debug, Deserialize)]
struct JobEnvelope {
    data: Job,
}

#[derive(Debug, Deserialize)]
struct Job {
    id: String,
    status: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct Task {
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<TaskResult>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(default)]
    form: Option<UploadForm>,
    #[serde(default)]
    files: Vec<ExportedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadForm {
    url: String,
    #[serde(default)]
    parameters: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ExportedFile {
    url: String,
}

impl Job {
    fn task(&self, name: &str) -> Result<&Task, BackendError> {
        self.tasks
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BackendError::Job(format!("job {} has no '{}' task", self.id, name)))
    }

    fn failure_summary(&self) -> String {
        let failed: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.status.as_deref() == Some("error"))
            .map(|t| format!("{}: {}", t.name, t.message.as_deref().unwrap_or("no message")))
            .collect();
        if failed.is_empty() {
            format!("job {} reported status 'error'", self.id)
        } else {
            failed.join("; ")
        }
    }
}

/// Converts the sheet on the remote service. Requires an API key.
#[derive(Debug, Clone)]
pub struct RemoteConversionBackend {
    config: RemoteConfig,
    cancel: CancellationToken,
}

impl RemoteConversionBackend {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort submission and polling when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn job_request(listing: &ListingRecord) -> Value {
        json!({
            "tasks": {
                "import-html": {
                    "operation": "import/upload"
                },
                "convert-to-pdf": {
                    "operation": "convert",
                    "input": "import-html",
                    "input_format": "html",
                    "output_format": "pdf",
                    "engine": "chrome",
                    "page_width": 210,
                    "page_height": 297,
                    "margin_top": 8,
                    "margin_right": 9,
                    "margin_bottom": 8,
                    "margin_left": 9,
                    "print_background": true,
                    "display_header_footer": false
                },
                "export-pdf": {
                    "operation": "export/url",
                    "input": "convert-to-pdf"
                }
            },
            "tag": format!("standee-{}", listing.short_id())
        })
    }

    async fn cancellable<T>(
        &self,
        work: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(BackendError::Cancelled),
            result = work => result,
        }
    }

    async fn create_job(&self, client: &Client, api_key: &str, listing: &ListingRecord) -> Result<Job, BackendError> {
        let response = client
            .post(self.endpoint("jobs"))
            .bearer_auth(api_key)
            .timeout(self.config.request_timeout())
            .json(&Self::job_request(listing))
            .send()
            .await
            .map_err(|e| BackendError::Http(format!("job creation: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http(format!("job creation returned {}: {}", status, body)));
        }

        let envelope: JobEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::Job(format!("unreadable job response: {}", e)))?;
        Ok(envelope.data)
    }

    async fn upload(&self, client: &Client, job: &Job, markup: &str) -> Result<(), BackendError> {
        let form = job
            .task(IMPORT_TASK)?
            .result
            .as_ref()
            .and_then(|r| r.form.as_ref())
            .ok_or_else(|| BackendError::Job(format!("job {} has no upload form", job.id)))?;

        let mut multipart = Form::new();
        for (key, value) in &form.parameters {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            multipart = multipart.text(key.clone(), value);
        }
        let file = Part::bytes(markup.as_bytes().to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("text/html")
            .map_err(|e| BackendError::Http(format!("upload part: {}", e)))?;
        multipart = multipart.part("file", file);

        let response = client
            .post(&form.url)
            .timeout(self.config.request_timeout())
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| BackendError::Http(format!("upload: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http(format!("upload returned {}: {}", status, body)));
        }
        Ok(())
    }

    async fn fetch_job(&self, client: &Client, api_key: &str, job_id: &str) -> Result<Job, BackendError> {
        let response = client
            .get(self.endpoint(&format!("jobs/{}", job_id)))
            .bearer_auth(api_key)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(|e| BackendError::Http(format!("job status: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http(format!("job status returned {}: {}", status, body)));
        }

        let envelope: JobEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::Job(format!("unreadable job status: {}", e)))?;
        Ok(envelope.data)
    }

    /// Polls until the job reaches a terminal state and returns the export URL.
    async fn wait_for_export(&self, client: &Client, api_key: &str, job_id: &str) -> Result<String, BackendError> {
        let mut checks = 0u32;
        loop {
            checks += 1;
            let job = self.fetch_job(client, api_key, job_id).await?;
            log::debug!("Conversion job {} status '{}' (check {})", job_id, job.status, checks);

            match job.status.as_str() {
                "finished" => {
                    let export = job.task(EXPORT_TASK)?;
                    return export
                        .result
                        .as_ref()
                        .and_then(|r| r.files.first())
                        .map(|f| f.url.clone())
                        .ok_or_else(|| BackendError::Job(format!("job {} exported no files", job_id)));
                }
                "error" => return Err(BackendError::Job(job.failure_summary())),
                _ => tokio::time::sleep(self.config.poll_interval()).await,
            }
        }
    }

    async fn download(&self, client: &Client, url: &str) -> Result<Vec<u8>, BackendError> {
        let response = client
            .get(url)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(|e| BackendError::Http(format!("download: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::Http(format!("download returned {}", response.status())));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Http(format!("download body: {}", e)))?;

        if !bytes.starts_with(b"%PDF") {
            return Err(BackendError::Job("exported file is not a PDF".to_string()));
        }
        Ok(bytes.to_vec())
    }

    async fn convert(&self, client: &Client, api_key: &str, sheet: &PrintSheet, listing: &ListingRecord) -> Result<Vec<u8>, BackendError> {
        let job = self.cancellable(self.create_job(client, api_key, listing)).await?;
        log::info!("Created conversion job {} for listing {}", job.id, listing.id);

        self.cancellable(self.upload(client, &job, sheet.as_str())).await?;

        let timeout = self.config.job_timeout();
        let url = self
            .cancellable(async {
                tokio::time::timeout(timeout, self.wait_for_export(client, api_key, &job.id))
                    .await
                    .map_err(|_| BackendError::Timeout(timeout))?
            })
            .await?;

        self.cancellable(self.download(client, &url)).await
    }
}

#[async_trait]
impl RenderBackend for RemoteConversionBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn render(
        &self,
        sheet: &PrintSheet,
        listing: &ListingRecord,
    ) -> Result<RenderArtifact, BackendError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| BackendError::NotConfigured("remote.api_key is not set".to_string()))?;

        if self.cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }

        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Http(format!("client setup: {}", e)))?;

        let bytes = self.convert(&client, api_key, sheet, listing).await?;
        Ok(RenderArtifact::pdf(bytes, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{RenderedUnit, compose_grid};

    fn sheet() -> PrintSheet {
        compose_grid(&RenderedUnit {
            markup: "<div class=\"page\">x</div>".into(),
            style_block: String::new(),
        })
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let backend = RemoteConversionBackend::new(RemoteConfig::default());
        let err = backend.render(&sheet(), &ListingRecord::new("id")).await.unwrap_err();
        assert!(matches!(err, BackendError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_any_request() {
        let token = CancellationToken::new();
        token.cancel();
        let backend = RemoteConversionBackend::new(RemoteConfig {
            api_key: Some("key".into()),
            base_url: "http://127.0.0.1:9".into(),
            ..RemoteConfig::default()
        })
        .with_cancellation(token);

        let err = backend.render(&sheet(), &ListingRecord::new("id")).await.unwrap_err();
        assert_eq!(err, BackendError::Cancelled);
    }

    #[test]
    fn job_request_describes_a4_conversion() {
        let request = RemoteConversionBackend::job_request(&ListingRecord::new("abc12345-zz"));
        let convert = &request["tasks"]["convert-to-pdf"];
        assert_eq!(convert["page_width"], 210);
        assert_eq!(convert["page_height"], 297);
        assert_eq!(convert["margin_left"], 9);
        assert_eq!(convert["print_background"], true);
        assert_eq!(request["tasks"][IMPORT_TASK]["operation"], "import/upload");
        assert_eq!(request["tasks"][EXPORT_TASK]["input"], "convert-to-pdf");
        assert_eq!(request["tag"], "standee-abc12345");
    }

    #[test]
    fn failure_summary_names_failed_tasks() {
        let job: Job = serde_json::from_value(json!({
            "id": "job-1",
            "status": "error",
            "tasks": [
                {"name": "import-html", "status": "finished"},
                {"name": "convert-to-pdf", "status": "error", "message": "engine crashed"}
            ]
        }))
        .unwrap();
        assert_eq!(job.failure_summary(), "convert-to-pdf: engine crashed");
    }
}
