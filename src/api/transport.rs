use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::api::errors::{Error, Result};

/// Issues GET requests and hands back the raw body text.
///
/// Implementations report any status outside the 2xx and 3xx classes as
/// [`Error::TransportFailure`] carrying that status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed transport used by default.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpTransport { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        HttpTransport { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", redact_api_key(url));
        let response = self.http.get(url).send().await?;
        let status = response.status();
        debug!("Received HTTP {} for {}", status.as_u16(), redact_api_key(url));

        if status.is_success() || status.is_redirection() {
            Ok(response.text().await?)
        } else {
            Err(Error::TransportFailure(status.as_u16()))
        }
    }
}

// Keeps keys out of debug logs
fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find("api_key=").map(|i| i + "api_key=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}***{}", &url[..start], &url[end..])
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    pub(crate) enum StubReply {
        Body(String),
        Status(u16),
    }

    /// Replays canned replies in order and records every requested URL.
    #[derive(Default)]
    pub(crate) struct StubTransport {
        replies: Mutex<VecDeque<StubReply>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub(crate) fn replying(replies: impl IntoIterator<Item = StubReply>) -> Self {
            StubTransport {
                replies: Mutex::new(replies.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn body(value: serde_json::Value) -> StubReply {
            StubReply::Body(value.to_string())
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(StubReply::Body(body)) => Ok(body),
                Some(StubReply::Status(status)) => Err(Error::TransportFailure(status)),
                None => panic!("unexpected request to {url}"),
            }
        }
    }
}
