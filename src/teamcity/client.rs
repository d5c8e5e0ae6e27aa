use crate::model::{Error, Result};
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Builds looked at per query, newest first.
const BUILD_WINDOW: u32 = 1000;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum BuildStatus {
    Success,
    Failure,
    Error,
}

impl BuildStatus {
    pub fn locator(&self) -> &'static str {
        match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::Error => "ERROR",
        }
    }
}

pub trait BuildCountQuery {
    /// Number of builds of `build_id` that finished with `status`.
    async fn count(&self, build_id: &str, status: BuildStatus) -> Result<u64>;
}

pub struct TeamCityClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl TeamCityClient {
    pub fn new(
        base_url: impl ToString,
        user: impl ToString,
        password: impl ToString,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    pub fn count_url(&self, build_id: &str, status: BuildStatus) -> String {
        format!(
            "{}/app/rest/buildTypes/id:{}/builds?locator=count:{},status:{},branch:default:any",
            self.base_url,
            build_id,
            BUILD_WINDOW,
            status.locator()
        )
    }

    async fn fetch_count(&self, url: &str) -> Result<u64> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;
        let json: Value = response.json().await?;
        json["count"].as_u64().ok_or_else(|| Error::NonNumericCount {
            url: url.to_string(),
        })
    }
}

impl BuildCountQuery for TeamCityClient {
    async fn count(&self, build_id: &str, status: BuildStatus) -> Result<u64> {
        let url = self.count_url(build_id, status);
        match self.fetch_count(&url).await {
            Ok(count) => {
                debug!(%url, count, "fetched build count");
                Ok(count)
            }
            Err(e) => {
                error!(%url, error = %e, "build count query failed");
                Err(e)
            }
        }
    }
}
