use crate::errors::FetchError;
use crate::models::{HeatPayload, HeatSample};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait HeatSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<HeatSample>, FetchError>> + Send;
}

#[derive(Clone)]
pub struct HttpHeatSource {
    client: Client,
    url: String,
}

impl HttpHeatSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HeatSource for HttpHeatSource {
    async fn fetch(&self) -> Result<Vec<HeatSample>, FetchError> {
        let payload: HeatPayload = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(payload.into_samples())
    }
}
