//! HTTP client for the Hichannel catalog API
//!
//! Every call issues exactly one GET: there is no caching and no retry.
//!
//! # Example
//!
//! ```no_run
//! use hiradio::HiRadioClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HiRadioClient::new()?;
//!
//!     for ranked in client.ranked_channels().await? {
//!         println!("{} {}", ranked.channel.id, ranked.channel.title);
//!     }
//!
//!     let playlist = client.playlist(232).await?;
//!     println!("Stream: {}", playlist.url);
//!     Ok(())
//! }
//! ```

use crate::catalog::{self, PageSource};
use crate::error::{Error, Result};
use crate::models::{
    CatalogPage, Channel, ChannelInfo, ChannelListPage, Playlist, RankedChannel, Ranking,
    RankingList,
};
use crate::ranking;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Hichannel API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://hichannel.hinet.net/radio/";

/// Default timeout for HTTP requests (60 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("hiradio/", env!("CARGO_PKG_VERSION"));

/// Hichannel HTTP client
///
/// Built once at startup and then only read. Cloning is cheap (the
/// underlying `reqwest::Client` is reference counted), which is how the
/// client is handed to concurrent page fetches.
#[derive(Debug, Clone)]
pub struct HiRadioClient {
    client: Client,
    endpoint: Url,
}

impl HiRadioClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Base URL all endpoints are resolved against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.endpoint.join(path)?)
    }

    /// GET `url` and decode the JSON body into `T`
    pub async fn fetch_object<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            // Body read failures still leave us with a useful error
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                method: "GET".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ========================================================================
    // Channel list
    // ========================================================================

    /// Fetch one page (1-based) of the channel list
    pub async fn fetch_channel_page(&self, page: u32) -> Result<CatalogPage> {
        let mut url = self.endpoint_url("channelList.do")?;
        url.query_pairs_mut().append_pair("pN", &page.to_string());

        let page: ChannelListPage = self.fetch_object(url).await?;
        Ok(page.into())
    }

    /// List all channels across every page of the catalog
    ///
    /// Pages after the first are fetched concurrently; see
    /// [`catalog::aggregate_channels`] for ordering and failure semantics.
    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        catalog::aggregate_channels(self).await
    }

    // ========================================================================
    // Rankings
    // ========================================================================

    /// List the popularity ranking of channels
    pub async fn list_rankings(&self) -> Result<Vec<Ranking>> {
        let url = self.endpoint_url("getRanking.do")?;
        let rankings: RankingList = self.fetch_object(url).await?;
        Ok(rankings.list)
    }

    /// Channels joined with their rank, sorted by type, rank then id
    ///
    /// Rankings and channels are fetched concurrently and both must succeed.
    /// When both fail, the channel error is reported.
    pub async fn ranked_channels(&self) -> Result<Vec<RankedChannel>> {
        let (channels, rankings) = tokio::join!(self.list_channels(), self.list_rankings());
        let channels = channels?;
        let rankings = rankings?;

        let mut ranked = ranking::merge_rankings(channels, &rankings);
        ranking::sort_ranked(&mut ranked);
        Ok(ranked)
    }

    // ========================================================================
    // Playback & details
    // ========================================================================

    /// Resolve the current playlist URL of a channel
    ///
    /// The returned URL expires; call this again for every playback.
    pub async fn playlist(&self, channel_id: u32) -> Result<Playlist> {
        let mut url = self.endpoint_url("play.do")?;
        url.query_pairs_mut()
            .append_pair("id", &channel_id.to_string());

        let playlist: Playlist = self.fetch_object(url).await?;
        if playlist.url.is_empty() {
            return Err(Error::PlaylistNotFound(channel_id));
        }
        Ok(playlist)
    }

    /// Fetch channel details and program schedule
    pub async fn channel_info(&self, channel_id: u32) -> Result<ChannelInfo> {
        let mut url = self.endpoint_url("getProgramList.do")?;
        url.query_pairs_mut()
            .append_pair("channelId", &channel_id.to_string());

        let info: ChannelInfo = self.fetch_object(url).await?;
        if info.title.is_empty() {
            return Err(Error::ChannelNotFound(channel_id));
        }
        Ok(info)
    }
}

#[async_trait]
impl PageSource for HiRadioClient {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage> {
        self.fetch_channel_page(page).await
    }
}

/// Builder for configuring a HiRadioClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client (user agent and timeout are then up to it)
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the API endpoint
    ///
    /// Endpoint paths are joined onto it, so a missing trailing `/` is added.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the overall request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HiRadioClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        let mut endpoint = self.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Ok(HiRadioClient {
            client,
            endpoint: Url::parse(&endpoint)?,
        })
    }
}
