//! Data models for Hichannel API responses
//!
//! The catalog encodes most numeric fields as JSON strings (`"radio_type": "4"`)
//! but not consistently, so every numeric field goes through
//! [`number_or_string`] before a domain entity is built.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Wire helpers
// ============================================================================

/// Decode a number that may arrive either as a JSON number or as a string.
///
/// `null`, a missing field (with `#[serde(default)]`) and `""` decode to
/// `T::default()`. Any other non-numeric string is an error.
pub(crate) fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default + Deserialize<'de>,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(T::default())
            } else {
                s.parse().map_err(de::Error::custom)
            }
        }
    }
}

// ============================================================================
// Channel list
// ============================================================================

/// Category of a Hichannel channel
///
/// Codes as published by the catalog:
///
/// | code | label |
/// |------|-------|
/// | 1 | 音樂 (music) |
/// | 2 | 生活資訊 (lifestyle/info) |
/// | 3 | 新聞 (news) |
/// | 4 | 綜合 (general) |
/// | 5 | 外語 (foreign language) |
/// | 6 | 多元文化 (multicultural) |
/// | 7 | 交通 (transportation) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i32")]
pub enum RadioType {
    Music,
    Lifestyle,
    News,
    General,
    ForeignLanguage,
    Multicultural,
    Transportation,
    /// Any code outside 1..=7, kept so sorting stays by numeric code
    Unknown(i32),
}

impl RadioType {
    /// Numeric code used by the catalog
    pub fn code(self) -> i32 {
        match self {
            Self::Music => 1,
            Self::Lifestyle => 2,
            Self::News => 3,
            Self::General => 4,
            Self::ForeignLanguage => 5,
            Self::Multicultural => 6,
            Self::Transportation => 7,
            Self::Unknown(code) => code,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Music => "音樂",
            Self::Lifestyle => "生活資訊",
            Self::News => "新聞",
            Self::General => "綜合",
            Self::ForeignLanguage => "外語",
            Self::Multicultural => "多元文化",
            Self::Transportation => "交通",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<i32> for RadioType {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Music,
            2 => Self::Lifestyle,
            3 => Self::News,
            4 => Self::General,
            5 => Self::ForeignLanguage,
            6 => Self::Multicultural,
            7 => Self::Transportation,
            other => Self::Unknown(other),
        }
    }
}

impl From<RadioType> for i32 {
    fn from(radio_type: RadioType) -> Self {
        radio_type.code()
    }
}

impl fmt::Display for RadioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A Hichannel channel
///
/// Source: `channelList.do?pN=<page>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: u32,
    pub title: String,
    /// Artwork reference, opaque
    pub image: String,
    pub radio_type: RadioType,
    /// Program currently on air
    pub program_name: String,
}

/// One page of `channelList.do` as it comes off the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListPage {
    #[serde(default, deserialize_with = "number_or_string")]
    pub page_no: u32,
    /// Total number of pages, identical on every page of one listing
    #[serde(default, deserialize_with = "number_or_string")]
    pub page_size: u32,
    #[serde(default)]
    pub list: Vec<ChannelEntry>,
}

/// A raw `channelList.do` entry; section headers and ads have `isChannel: false`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ChannelEntry {
    #[serde(rename = "isChannel", default)]
    pub is_channel: bool,
    #[serde(default, deserialize_with = "number_or_string")]
    pub channel_id: u32,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub channel_image: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub radio_type: i32,
    #[serde(default)]
    pub program_name: String,
}

impl ChannelEntry {
    /// Convert to a [`Channel`], or `None` for non-channel entries
    pub fn into_channel(self) -> Option<Channel> {
        self.is_channel.then(|| Channel {
            id: self.channel_id,
            title: self.channel_title,
            image: self.channel_image,
            radio_type: RadioType::from(self.radio_type),
            program_name: self.program_name,
        })
    }
}

/// A fetched catalog page with non-channel entries removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub page_no: u32,
    pub page_size: u32,
    pub channels: Vec<Channel>,
}

impl From<ChannelListPage> for CatalogPage {
    fn from(page: ChannelListPage) -> Self {
        Self {
            page_no: page.page_no,
            page_size: page.page_size,
            channels: page
                .list
                .into_iter()
                .filter_map(ChannelEntry::into_channel)
                .collect(),
        }
    }
}

// ============================================================================
// Rankings
// ============================================================================

/// Popularity rank of a channel (1 = most popular)
///
/// Source: `getRanking.do`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ranking {
    #[serde(deserialize_with = "number_or_string")]
    pub channel_id: u32,
    #[serde(rename = "channel_rank", deserialize_with = "number_or_string")]
    pub rank: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankingList {
    #[serde(default)]
    pub list: Vec<Ranking>,
}

/// A channel with its rank attached, built only for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedChannel {
    #[serde(flatten)]
    pub channel: Channel,
    /// 0 when the channel has no ranking entry
    pub rank: u32,
}

impl RankedChannel {
    pub fn is_ranked(&self) -> bool {
        self.rank != 0
    }
}

// ============================================================================
// Playback & details
// ============================================================================

/// URL of the m3u8 playlist for a channel
///
/// The URL embeds short-lived signed tokens: resolve it again for every
/// playback attempt and never keep it around.
///
/// Source: `play.do?id=<id>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Playlist {
    #[serde(rename = "playRadio", default)]
    pub url: String,
}

/// Channel details and program schedule
///
/// Source: `getProgramList.do?channelId=<id>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelInfo {
    #[serde(rename = "channel_area", default)]
    pub area: String,
    #[serde(rename = "channel_desc", default)]
    pub description: String,
    #[serde(rename = "channel_image", default)]
    pub image: String,
    #[serde(rename = "channel_title", default)]
    pub title: String,
    #[serde(rename = "channel_type", default)]
    pub type_label: String,
    #[serde(rename = "list", default)]
    pub programs: Vec<Program>,
}

impl ChannelInfo {
    /// First program flagged on air
    pub fn now_playing(&self) -> Option<&Program> {
        self.programs.iter().find(|p| p.on_air)
    }
}

/// One entry of a channel's schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Program {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(rename = "on", default)]
    pub on_air: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_entry_string_fields() {
        let entry: ChannelEntry = serde_json::from_value(json!({
            "channel_id": "1471",
            "channel_image": "14a7b76cf9c00000340a.jpg",
            "channel_title": "NER教育電臺 臺北總臺AM",
            "isChannel": true,
            "program_name": "校園健康筆記",
            "radio_type": "4"
        }))
        .unwrap();

        assert_eq!(entry.channel_id, 1471);
        assert_eq!(entry.radio_type, 4);

        let channel = entry.into_channel().unwrap();
        assert_eq!(channel.radio_type, RadioType::General);
        assert_eq!(channel.title, "NER教育電臺 臺北總臺AM");
    }

    #[test]
    fn test_channel_entry_numeric_fields() {
        let entry: ChannelEntry = serde_json::from_value(json!({
            "channel_id": 232,
            "isChannel": true,
            "radio_type": 1
        }))
        .unwrap();
        assert_eq!(entry.channel_id, 232);
        assert_eq!(entry.radio_type, 1);
        assert_eq!(entry.channel_title, "");
    }

    #[test]
    fn test_number_or_string_defaults() {
        let entry: ChannelEntry = serde_json::from_value(json!({
            "isChannel": false,
            "channel_id": null,
            "radio_type": " "
        }))
        .unwrap();
        assert_eq!(entry.channel_id, 0);
        assert_eq!(entry.radio_type, 0);
        assert!(entry.into_channel().is_none());
    }

    #[test]
    fn test_number_or_string_rejects_garbage() {
        let result = serde_json::from_value::<ChannelEntry>(json!({
            "isChannel": true,
            "channel_id": "abc"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_page_filters_non_channels() {
        let page: ChannelListPage = serde_json::from_value(json!({
            "pageNo": 2,
            "pageSize": "4",
            "list": [
                {"isChannel": true, "channel_id": "109", "channel_title": "大千電台",
                 "channel_image": "14a7b212625000003d2d.jpg", "radio_type": "2",
                 "program_name": "Super Live Show"},
                {"isChannel": false},
                {"isChannel": true, "channel_id": "300", "channel_title": "大漢之音",
                 "channel_image": "14ab932e39800000b250.jpg", "radio_type": "6",
                 "program_name": "客家恁靚！-主持人Rita、Vera"}
            ]
        }))
        .unwrap();

        let page = CatalogPage::from(page);
        assert_eq!(page.page_no, 2);
        assert_eq!(page.page_size, 4);
        assert_eq!(
            page.channels,
            vec![
                Channel {
                    id: 109,
                    title: "大千電台".to_string(),
                    image: "14a7b212625000003d2d.jpg".to_string(),
                    radio_type: RadioType::Lifestyle,
                    program_name: "Super Live Show".to_string(),
                },
                Channel {
                    id: 300,
                    title: "大漢之音".to_string(),
                    image: "14ab932e39800000b250.jpg".to_string(),
                    radio_type: RadioType::Multicultural,
                    program_name: "客家恁靚！-主持人Rita、Vera".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_radio_type_labels() {
        assert_eq!(RadioType::from(1).to_string(), "音樂");
        assert_eq!(RadioType::from(7).label(), "交通");
        assert_eq!(RadioType::from(42), RadioType::Unknown(42));
        assert_eq!(RadioType::from(42).to_string(), "Unknown");
        assert_eq!(RadioType::from(42).code(), 42);
        assert_eq!(RadioType::Multicultural.code(), 6);
    }

    #[test]
    fn test_ranking_decoding() {
        let list: RankingList = serde_json::from_value(json!({
            "list": [
                {"channel_id": "222", "channel_rank": "1"},
                {"channel_id": 156, "channel_rank": 2}
            ]
        }))
        .unwrap();
        assert_eq!(
            list.list,
            vec![
                Ranking { channel_id: 222, rank: 1 },
                Ranking { channel_id: 156, rank: 2 },
            ]
        );
    }

    #[test]
    fn test_now_playing_takes_first_on_air() {
        let info: ChannelInfo = serde_json::from_value(json!({
            "channel_title": "Hit FM",
            "list": [
                {"name": "早安", "start_time": "06:00", "end_time": "09:00", "on": false},
                {"name": "午間", "start_time": "09:00", "end_time": "12:00", "on": true},
                {"name": "重播", "start_time": "12:00", "end_time": "13:00", "on": true}
            ]
        }))
        .unwrap();
        assert_eq!(info.now_playing().map(|p| p.name.as_str()), Some("午間"));

        let idle = ChannelInfo::default();
        assert!(idle.now_playing().is_none());
    }
}
