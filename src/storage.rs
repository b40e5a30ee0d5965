//! Object-store client for uploaded event assets.
//!
//! Talks to an S3-style HTTP endpoint: a PUT under the bucket base writes the
//! object, and the public base resolves it for download. Both bases come from
//! the environment at startup.

use axum::body::Bytes;

#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    public_base_url: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            public_base_url: trim_trailing_slash(public_base_url.into()),
        }
    }

    /// Upload an object and return its public download URL.
    pub async fn upload(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, key);

        self.http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?
            .error_for_status()?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
