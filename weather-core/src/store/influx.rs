//! InfluxDB v2 HTTP API client.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::Deserialize;
use serde_json::json;

use crate::{Config, provider::truncate_body};

use super::{Point, TimeSeriesStore};

#[derive(Debug, Clone)]
pub struct InfluxStore {
    base_url: String,
    token: String,
    org: String,
    bucket: String,
    http: Client,
}

impl InfluxStore {
    pub fn new(base_url: String, token: String, org: String, bucket: String) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build InfluxDB HTTP client")?;
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            token,
            org,
            bucket,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.influx_url.clone(),
            config.influx_token.clone(),
            config.influx_org.clone(),
            config.influx_bucket.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(header::AUTHORIZATION, format!("Token {}", self.token))
    }

    /// Send `req`, returning the body of a 2xx response.
    async fn send(&self, req: RequestBuilder, what: &str) -> Result<String> {
        let res = self
            .authorized(req)
            .send()
            .await
            .with_context(|| format!("Failed to send InfluxDB {what} request"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read InfluxDB {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "InfluxDB {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }

    async fn org_id(&self) -> Result<String> {
        let req = self
            .http
            .get(self.url("/api/v2/orgs"))
            .query(&[("org", self.org.as_str())]);
        let body = self.send(req, "organization lookup").await?;

        let parsed: OrgsResponse =
            serde_json::from_str(&body).context("Failed to parse InfluxDB organizations JSON")?;

        parsed
            .orgs
            .into_iter()
            .find(|o| o.name == self.org)
            .map(|o| o.id)
            .ok_or_else(|| anyhow!("InfluxDB organization '{}' not found", self.org))
    }
}

#[derive(Debug, Deserialize)]
struct BucketEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BucketsResponse {
    #[serde(default)]
    buckets: Vec<BucketEntry>,
}

#[derive(Debug, Deserialize)]
struct OrgEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OrgsResponse {
    #[serde(default)]
    orgs: Vec<OrgEntry>,
}

#[async_trait]
impl TimeSeriesStore for InfluxStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        let req = self
            .http
            .get(self.url("/api/v2/buckets"))
            .query(&[
                ("name", self.bucket.as_str()),
                ("org", self.org.as_str()),
            ]);
        let body = self.send(req, "bucket lookup").await?;

        let parsed: BucketsResponse =
            serde_json::from_str(&body).context("Failed to parse InfluxDB buckets JSON")?;

        Ok(parsed.buckets.iter().any(|b| b.name == self.bucket))
    }

    async fn create_bucket(&self) -> Result<()> {
        let org_id = self.org_id().await?;
        let req = self.http.post(self.url("/api/v2/buckets")).json(&json!({
            "orgID": org_id,
            "name": self.bucket,
            "retentionRules": [],
        }));

        self.send(req, "bucket creation").await?;
        Ok(())
    }

    async fn write_point(&self, point: &Point) -> Result<()> {
        let line = point.to_line_protocol()?;
        let req = self
            .http
            .post(self.url("/api/v2/write"))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line);

        self.send(req, "write").await?;
        Ok(())
    }
}
