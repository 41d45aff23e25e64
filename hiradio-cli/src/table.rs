//! Plain-text rendering for terminals
//!
//! Column alignment counts East Asian wide characters as two cells, so
//! Chinese titles line up with ASCII ones.

use std::io::{self, Write};

use hiradio::RankedChannel;
use unicode_width::UnicodeWidthStr;

const TYPE_WIDTH: usize = 8;
const TITLE_WIDTH: usize = 30;

/// Terminal cells taken by `s`
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// `s` right-padded with spaces to `width` cells; never truncates
pub fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// Channel table as printed by `hiradio list`
pub fn write_channels<W: Write>(out: &mut W, channels: &[RankedChannel]) -> io::Result<()> {
    writeln!(
        out,
        "編號  {}  排行  {}  現在播放節目",
        pad("類型", TYPE_WIDTH),
        pad("頻道", TITLE_WIDTH)
    )?;

    for ranked in channels {
        let channel = &ranked.channel;
        let rank = if ranked.is_ranked() {
            ranked.rank.to_string()
        } else {
            String::new()
        };
        writeln!(
            out,
            "{:>4}  {}  {:>4}  {}  {}",
            channel.id,
            pad(channel.radio_type.label(), TYPE_WIDTH),
            rank,
            pad(&channel.title, TITLE_WIDTH),
            channel.program_name
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiradio::{Channel, RadioType};

    fn ranked(id: u32, title: &str, radio_type: RadioType, rank: u32) -> RankedChannel {
        RankedChannel {
            channel: Channel {
                id,
                title: title.to_string(),
                image: String::new(),
                radio_type,
                program_name: "午安".to_string(),
            },
            rank,
        }
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("ICRT"), 4);
        assert_eq!(display_width("飛碟電台"), 8);
        assert_eq!(display_width("Hit FM 聯播網"), 13);
        // Fullwidth forms
        assert_eq!(display_width("ＦＭ"), 4);
        // Wide outside the CJK blocks
        assert_eq!(display_width("🚀"), 2);
        assert_eq!(display_width("\u{2329}"), 2);
        assert_eq!(display_width("Kiss 🚀 Radio"), 13);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("音樂", 8), "音樂    ");
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_write_channels() {
        let channels = vec![
            ranked(232, "飛碟電台", RadioType::Music, 1),
            ranked(7, "ICRT", RadioType::Music, 0),
        ];

        let mut out = Vec::new();
        write_channels(&mut out, &channels).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("編號  類型      排行  頻道"));
        assert_eq!(
            lines[1],
            format!(" 232  音樂{}1  飛碟電台{}  午安", " ".repeat(9), " ".repeat(22))
        );
        assert_eq!(
            lines[2],
            format!("   7  音樂{}ICRT{}  午安", " ".repeat(12), " ".repeat(26))
        );
    }

    #[test]
    fn test_columns_line_up() {
        let channels = vec![
            ranked(1, "飛碟電台", RadioType::Music, 3),
            ranked(2, "Kiss Radio", RadioType::ForeignLanguage, 12),
        ];

        let mut out = Vec::new();
        write_channels(&mut out, &channels).unwrap();
        let text = String::from_utf8(out).unwrap();

        let program_column: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|line| display_width(&line[..line.rfind("午安").unwrap()]))
            .collect();
        assert_eq!(program_column, vec![54, 54]);
    }
}
