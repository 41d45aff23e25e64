use std::io::{self, Write};

use anyhow::{Context, Result};
use hiradio::{ChannelInfo, HiRadioClient};

use super::{load_settings, resolve_channel_id, save_settings};

const SETTINGS_FILE: &str = "info.json";

/// `hiradio info [CHANNEL_ID]`
pub async fn run(client: &HiRadioClient, channel_id: Option<u32>) -> Result<()> {
    let settings = load_settings(SETTINGS_FILE);
    let channel_id = resolve_channel_id(channel_id, &settings, "info")?;

    let info = client
        .channel_info(channel_id)
        .await
        .with_context(|| format!("Failed to get channel {channel_id}"))?;

    let mut out = io::stdout().lock();
    write_channel_info(&mut out, channel_id, &info)?;
    out.flush()?;

    settings.set_channel_id(channel_id);
    save_settings(&settings);
    Ok(())
}

/// Channel details followed by the schedule, `>>` marking the program on air
fn write_channel_info<W: Write>(out: &mut W, channel_id: u32, info: &ChannelInfo) -> io::Result<()> {
    writeln!(out, "編號: {channel_id}")?;
    writeln!(out, "頻道: {}", info.title)?;
    writeln!(out, "類型: {}", info.type_label)?;
    writeln!(out, "地點: {}", info.area)?;
    writeln!(out, "簡介: {}", info.description)?;
    writeln!(out, "節目表:")?;

    let on_air = info.programs.iter().position(|p| p.on_air);
    for (i, program) in info.programs.iter().enumerate() {
        let cursor = if Some(i) == on_air { ">>" } else { "  " };
        writeln!(
            out,
            "{cursor} {} ~ {}  {}",
            program.start_time, program.end_time, program.name
        )?;
    }
    Ok(())
}
