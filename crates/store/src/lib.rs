use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

#[derive(Debug)]
pub enum StoreError {
    Http(reqwest::Error),
    BadStatus {
        table: String,
        status: reqwest::StatusCode,
        body: String,
    },
    Encode(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Http(err) => write!(f, "store HTTP error: {}", err),
            StoreError::BadStatus {
                table,
                status,
                body,
            } => {
                write!(f, "store upsert into {} returned status {}", table, status)?;
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }
                Ok(())
            }
            StoreError::Encode(err) => write!(f, "store payload encode error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Http(err) => Some(err),
            StoreError::Encode(err) => Some(err),
            StoreError::BadStatus { .. } => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        StoreError::Http(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Encode(value)
    }
}

pub trait UpsertStore {
    fn upsert<T>(
        &self,
        table: &str,
        rows: &[T],
        on_conflict: &[&str],
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        T: Serialize + Sync;
}

#[derive(Clone)]
pub struct PostgrestStore {
    base_url: String,
    service_key: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for PostgrestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestStore")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl PostgrestStore {
    pub fn new(
        base_url: String,
        service_key: String,
        timeout: Option<Duration>,
    ) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(StoreError::Http)?;

        Ok(Self {
            base_url,
            service_key,
            http,
        })
    }

    fn table_url(&self, table: &str, on_conflict: &[&str]) -> String {
        let base = format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            table
        );
        if on_conflict.is_empty() {
            base
        } else {
            format!("{}?on_conflict={}", base, on_conflict.join(","))
        }
    }
}

impl UpsertStore for PostgrestStore {
    async fn upsert<T>(
        &self,
        table: &str,
        rows: &[T],
        on_conflict: &[&str],
    ) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let body = serde_json::to_vec(rows)?;
        let url = self.table_url(table, on_conflict);

        tracing::debug!(table, rows = rows.len(), "posting upsert batch");

        let resp = self
            .http
            .post(url)
            .header("apikey", self.service_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::BadStatus {
                table: table.to_string(),
                status,
                body: body.trim().to_string(),
            });
        }

        Ok(())
    }
}
