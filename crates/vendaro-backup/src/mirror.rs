// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-store mirroring client for backup artifacts.
//!
//! A thin HTTP PUT client: artifacts land under a date-partitioned key in a
//! single bucket. Callers treat every failure here as best-effort; the
//! local artifact remains authoritative.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use vendaro_core::VendaroError;

/// HTTP client for the object storage endpoint.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
}

impl MirrorClient {
    /// Create a mirror client for `endpoint`/`bucket`, with an optional
    /// bearer token.
    pub fn new(
        endpoint: &str,
        bucket: &str,
        token: Option<&str>,
    ) -> Result<Self, VendaroError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| VendaroError::Config(format!("invalid mirror token: {e}")))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VendaroError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Upload artifact bytes under `bucket/date/filename`. Returns the
    /// object key on success.
    pub async fn upload(
        &self,
        date: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, VendaroError> {
        let key = format!("{}/{date}/{filename}", self.bucket);
        let url = format!("{}/{key}", self.endpoint);

        let response = self
            .http
            .put(&url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| VendaroError::Internal(format!("mirror upload failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(key)
        } else {
            Err(VendaroError::Internal(format!(
                "mirror upload returned {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn upload_puts_under_date_partitioned_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/backups/2026-08-06/accounts-backup-x.csv"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = MirrorClient::new(&server.uri(), "backups", Some("tok-1")).unwrap();
        let key = client
            .upload("2026-08-06", "accounts-backup-x.csv", b"id\n1\n".to_vec())
            .await
            .unwrap();
        assert_eq!(key, "backups/2026-08-06/accounts-backup-x.csv");
    }

    #[tokio::test]
    async fn upload_failure_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = MirrorClient::new(&server.uri(), "backups", None).unwrap();
        let err = client
            .upload("2026-08-06", "accounts-backup-x.csv", vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
