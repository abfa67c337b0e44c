use std::time::Duration;

#[derive(Debug)]
pub enum FetchError {
    Http {
        url: String,
        source: reqwest::Error,
    },
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http { url, source } => {
                write!(f, "fetch failed for {}: {}", url, source)
            }
            FetchError::BadStatus { url, status } => {
                write!(f, "fetch failed {}: {}", status.as_u16(), url)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http { source, .. } => Some(source),
            FetchError::BadStatus { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetFetcher {
    http: reqwest::Client,
}

impl SheetFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub async fn fetch_csv(&self, url: &str) -> Result<String, FetchError> {
        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.http.get(url).send().await.map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        let text = resp.text().await.map_err(http_err)?;
        tracing::debug!(url, bytes = text.len(), "fetched sheet");
        Ok(text)
    }
}
