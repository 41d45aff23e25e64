//! Hichannel client library
//!
//! This crate provides a Rust client for the Hichannel radio catalog
//! (`hichannel.hinet.net`), which only exposes paginated, loosely typed JSON
//! endpoints.
//!
//! # Features
//!
//! - **Channel listing**: every page of the catalog fetched concurrently and
//!   concatenated
//! - **Rankings**: popularity ranks merged into the channel list, sorted by
//!   type, rank and id
//! - **Channel details**: description, area and program schedule
//! - **Playlists**: the current (short-lived) m3u8 URL of a channel
//! - **Redirect proxy** (feature `server`): a local HTTP server mapping a
//!   stable `/stream/{id}.m3u8` URL to a freshly resolved playlist
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
//!     let info = client.channel_info(232).await?;
//!     println!("{} ({})", info.title, info.type_label);
//!     if let Some(program) = info.now_playing() {
//!         println!("Now: {}", program.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod error;
pub mod models;
pub mod ranking;

#[cfg(feature = "server")]
pub mod proxy;

// Re-exports
pub use catalog::{aggregate_channels, PageSource};
pub use client::{ClientBuilder, HiRadioClient};
pub use error::{Error, Result};
pub use models::{
    CatalogPage, Channel, ChannelEntry, ChannelInfo, ChannelListPage, Playlist, Program,
    RadioType, RankedChannel, Ranking,
};
pub use ranking::{compare_ranked, merge_rankings, sort_ranked};

#[cfg(feature = "server")]
pub use proxy::{stream_router, stream_url, PlaylistResolver, StreamProxy};
