// src/integrations/jellyfin/client.rs
//
// HTTP client for the server's public identity endpoint
//
// ARCHITECTURE:
// - Infrastructure only: fetches and decodes, never scores
// - One request per call, no retries
// - Returns domain value objects (PublicSystemInfo)

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

use crate::config::ConnectionConfig;
use crate::domain::PublicSystemInfo;
use crate::error::AppResult;

/// Path of the unauthenticated identity document, relative to the base URL
pub const SYSTEM_INFO_PATH: &str = "System/Info/Public";

/// Source of server identity documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemInfoFetcher: Send + Sync {
    async fn public_system_info(&self, address: &str) -> AppResult<PublicSystemInfo>;
}

pub struct JellyfinClient {
    http_client: Client,
}

impl JellyfinClient {
    pub fn new(config: &ConnectionConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.probe_timeout())
            .user_agent(config.client_name.as_str())
            .build()?;

        Ok(Self { http_client })
    }

    /// Resolve the identity endpoint below `address`, keeping any base path
    pub fn system_info_url(address: &str) -> AppResult<Url> {
        let base = Url::parse(&format!("{}/", address.trim_end_matches('/')))?;
        Ok(base.join(SYSTEM_INFO_PATH)?)
    }
}

#[async_trait]
impl SystemInfoFetcher for JellyfinClient {
    async fn public_system_info(&self, address: &str) -> AppResult<PublicSystemInfo> {
        let url = Self::system_info_url(address)?;
        log::debug!("Fetching {}", url);

        let info = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<PublicSystemInfo>()
            .await?;

        Ok(info)
    }
}
