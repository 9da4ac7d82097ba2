use anyhow::{anyhow, Result};
use std::time::Duration;
use uuid::Uuid;

use crate::auction::protocol::{
    BidRequest, BidResponse, ResponseStatus, ResultResponse, ENDPOINT_BID, ENDPOINT_RESULT,
};

/// Timeout on connection establishment; RPC execution itself is unbounded.
const DIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for the auction API with one-shot failover.
///
/// Targets `endpoint` (initially the primary); `alternate` holds the backup
/// endpoint and is consumed by the single permitted switch. Once switched,
/// every subsequent call keeps targeting the backup.
pub struct FailoverClient {
    http: reqwest::Client,
    endpoint: String,
    alternate: Option<String>,
}

impl FailoverClient {
    pub fn new(primary_url: impl Into<String>, backup_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(DIAL_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: normalize(primary_url.into()),
            alternate: Some(normalize(backup_url.into())),
        })
    }

    /// The endpoint the next call will target.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Places a bid. The returned response may be a rejection; that is a
    /// successfully delivered answer, not an error.
    pub async fn bid(&mut self, user_id: &str, amount: i64) -> Result<BidResponse> {
        let request = BidRequest {
            request_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
        };

        match delivered(self.send_bid(&request).await) {
            Ok(response) => Ok(response),
            Err(cause) => {
                self.switch_endpoint(&cause)?;
                delivered(self.send_bid(&request).await)
                    .map_err(|e| anyhow!("backup server failed: {}", e))
            }
        }
    }

    /// Queries the current or concluded round.
    pub async fn result(&mut self) -> Result<ResultResponse> {
        match delivered(self.send_result().await) {
            Ok(response) => Ok(response),
            Err(cause) => {
                self.switch_endpoint(&cause)?;
                delivered(self.send_result().await)
                    .map_err(|e| anyhow!("backup server failed: {}", e))
            }
        }
    }

    async fn send_bid(&self, request: &BidRequest) -> Result<BidResponse> {
        let url = format!("{}{}", self.endpoint, ENDPOINT_BID);
        let response = self.http.post(&url).json(request).send().await?;
        Ok(response.json::<BidResponse>().await?)
    }

    async fn send_result(&self) -> Result<ResultResponse> {
        let url = format!("{}{}", self.endpoint, ENDPOINT_RESULT);
        let response = self.http.get(&url).send().await?;
        Ok(response.json::<ResultResponse>().await?)
    }

    fn switch_endpoint(&mut self, cause: &anyhow::Error) -> Result<()> {
        match self.alternate.take() {
            Some(alternate) => {
                tracing::warn!(
                    "Request to {} failed ({}), switching to backup server at {}",
                    self.endpoint,
                    cause,
                    alternate
                );
                self.endpoint = alternate;
                Ok(())
            }
            None => Err(anyhow!("both servers unreachable: {}", cause)),
        }
    }
}

/// Maps an explicit fault status onto the error path so it shares the
/// failover handling of a transport failure.
fn delivered<R: HasStatus>(result: Result<R>) -> Result<R> {
    match result {
        Ok(response) if response.status() == ResponseStatus::Fault => {
            Err(anyhow!("server returned a fault: {}", response.message()))
        }
        other => other,
    }
}

trait HasStatus {
    fn status(&self) -> ResponseStatus;
    fn message(&self) -> &str;
}

impl HasStatus for BidResponse {
    fn status(&self) -> ResponseStatus {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl HasStatus for ResultResponse {
    fn status(&self) -> ResponseStatus {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
