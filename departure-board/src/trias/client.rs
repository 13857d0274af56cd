//! TRIAS stop-event HTTP client.
//!
//! Builds the `StopEventRequest` XML body, POSTs it to the configured
//! endpoint and parses the response into a [`FeedDocument`]. A semaphore
//! bounds concurrent requests, since the aggregator fires one request per
//! stop point per cycle.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tokio::sync::Semaphore;

use super::error::TriasError;
use super::parse::{FeedDocument, parse_document};

/// Default User-Agent; some endpoints reject requests without a browser-ish one.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Default number of departures requested per stop point.
const DEFAULT_NUM_RESULTS: u8 = 8;

/// Default maximum concurrent feed requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Anything that can produce a feed document for a stop point.
///
/// The injected-fetch seam: the aggregator and scheduler are written against
/// this trait, implemented by [`TriasClient`] and by the mock feed.
pub trait StopEventSource {
    /// Fetch the current departures for one stop point.
    fn stop_events(
        &self,
        stop_point_ref: &str,
    ) -> impl Future<Output = Result<FeedDocument, TriasError>> + Send;
}

/// Configuration for the TRIAS client.
#[derive(Debug, Clone)]
pub struct TriasConfig {
    /// Feed endpoint URL.
    pub url: String,
    /// Opaque requester credential passed through in every request.
    pub requestor_ref: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Departures requested per stop point.
    pub num_results: u8,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
}

impl TriasConfig {
    /// Create a config with the given endpoint and requestor reference.
    pub fn new(url: impl Into<String>, requestor_ref: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            requestor_ref: requestor_ref.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
            timeout_secs: 30,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of results requested per stop point.
    pub fn with_num_results(mut self, n: u8) -> Self {
        self.num_results = n;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the maximum number of concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// TRIAS feed client.
#[derive(Debug, Clone)]
pub struct TriasClient {
    http: reqwest::Client,
    config: TriasConfig,
    semaphore: Arc<Semaphore>,
}

impl TriasClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TriasConfig) -> Result<Self, TriasError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            http,
            config,
            semaphore,
        })
    }

    async fn fetch(&self, stop_point_ref: &str) -> Result<FeedDocument, TriasError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TriasError::Api {
                status: 0,
                message: "semaphore closed".to_string(),
            })?;

        let body = stop_event_request(
            Utc::now(),
            &self.config.requestor_ref,
            stop_point_ref,
            self.config.num_results,
        );

        let response = self
            .http
            .post(&self.config.url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header(USER_AGENT, &self.config.user_agent)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TriasError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_document(&body)
    }
}

impl StopEventSource for TriasClient {
    fn stop_events(
        &self,
        stop_point_ref: &str,
    ) -> impl Future<Output = Result<FeedDocument, TriasError>> + Send {
        self.fetch(stop_point_ref)
    }
}

/// Build the TRIAS 1.1 `StopEventRequest` body for one stop point.
///
/// Departures only, with real-time data included.
fn stop_event_request(
    timestamp: DateTime<Utc>,
    requestor_ref: &str,
    stop_point_ref: &str,
    num_results: u8,
) -> String {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Trias version="1.1" xmlns="http://www.vdv.de/trias" xmlns:siri="http://www.siri.org.uk/siri">
    <ServiceRequest>
        <siri:RequestTimeStamp>{timestamp}</siri:RequestTimeStamp>
        <siri:RequestorRef>{requestor_ref}</siri:RequestorRef>
        <RequestPayload>
            <StopEventRequest>
                <Location>
                    <LocationRef>
                        <StopPointRef>{stop_point_ref}</StopPointRef>
                    </LocationRef>
                </Location>
                <Params>
                    <NumberOfResults>{num_results}</NumberOfResults>
                    <StopEventType>departure</StopEventType>
                    <IncludeRealtimeData>true</IncludeRealtimeData>
                </Params>
            </StopEventRequest>
        </RequestPayload>
    </ServiceRequest>
</Trias>
"#
    )
}
