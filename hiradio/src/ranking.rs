//! Joining channels with rankings, and the display order of the result

use crate::models::{Channel, RankedChannel, Ranking};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Attach a rank to every channel; channels without a ranking get 0
///
/// Channel order is preserved. If the ranking list names a channel more than
/// once, the last entry wins.
pub fn merge_rankings(channels: Vec<Channel>, rankings: &[Ranking]) -> Vec<RankedChannel> {
    let ranks: HashMap<u32, u32> = rankings.iter().map(|r| (r.channel_id, r.rank)).collect();

    channels
        .into_iter()
        .map(|channel| {
            let rank = ranks.get(&channel.id).copied().unwrap_or(0);
            RankedChannel { channel, rank }
        })
        .collect()
}

/// Display order: type code, then rank (unranked last), then channel id
pub fn compare_ranked(a: &RankedChannel, b: &RankedChannel) -> Ordering {
    a.channel
        .radio_type
        .code()
        .cmp(&b.channel.radio_type.code())
        .then_with(|| compare_rank(a.rank, b.rank))
        .then_with(|| a.channel.id.cmp(&b.channel.id))
}

/// 0 means unranked and sorts after every real rank
fn compare_rank(a: u32, b: u32) -> Ordering {
    match (a, b) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Greater,
        (_, 0) => Ordering::Less,
        (a, b) => a.cmp(&b),
    }
}

/// Sort in place using [`compare_ranked`]
pub fn sort_ranked(channels: &mut [RankedChannel]) {
    channels.sort_by(compare_ranked);
}
