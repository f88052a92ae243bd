//! Device sensor source
//!
//! Talks to a device capability bridge over HTTP:
//! - `POST {base}/permissions` -> `{"granted": bool}`
//! - `GET {base}/steps/today` -> `{"steps": n}`
//! - `GET {base}/steps/history?days=N` -> `[{"date": "YYYY-MM-DD", "steps": n}]`
//!
//! Every failure comes back as [`TrackerError::CollaboratorFailure`];
//! the tracker decides what to fall back to.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use wellness_shared::activity::DailyRecord;
use wellness_shared::errors::TrackerError;

use super::StepSource;

#[derive(Debug, Deserialize)]
struct PermissionBody {
    granted: bool,
}

#[derive(Debug, Deserialize)]
struct StepsBody {
    steps: u32,
}

#[derive(Debug, Deserialize)]
struct DayBody {
    date: NaiveDate,
    steps: u32,
}

pub struct DeviceSensorSource {
    client: Client,
    base_url: String,
}

impl DeviceSensorSource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TrackerError> {
        let response = request
            .send()
            .await
            .map_err(|e| {
                TrackerError::CollaboratorFailure(format!("device bridge unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::CollaboratorFailure(format!(
                "device bridge returned {}",
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| {
                TrackerError::CollaboratorFailure(format!("malformed device response: {}", e))
            })
    }
}

#[async_trait]
impl StepSource for DeviceSensorSource {
    fn name(&self) -> &'static str {
        "device"
    }

    async fn request_permission(&self) -> Result<bool, TrackerError> {
        let body: PermissionBody = self
            .fetch_json(self.client.post(self.url("/permissions")))
            .await?;
        debug!(granted = body.granted, "Device permission answered");
        Ok(body.granted)
    }

    async fn read_current_steps(&self) -> Result<u32, TrackerError> {
        let body: StepsBody = self
            .fetch_json(self.client.get(self.url("/steps/today")))
            .await?;
        Ok(body.steps)
    }

    async fn read_history(
        &self,
        today: NaiveDate,
        days: usize,
    ) -> Result<Vec<DailyRecord>, TrackerError> {
        let body: Vec<DayBody> = self
            .fetch_json(
                self.client
                    .get(self.url("/steps/history"))
                    .query(&[("days", days)]),
            )
            .await?;

        let mut records: Vec<DailyRecord> = body
            .into_iter()
            .filter(|day| day.date <= today)
            .map(|day| DailyRecord::new(day.date, day.steps))
            .collect();
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Ok(records)
    }
}
