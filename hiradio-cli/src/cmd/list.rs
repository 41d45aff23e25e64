use std::io::{self, Write};

use anyhow::{Context, Result};
use hiradio::HiRadioClient;

use crate::table;

/// `hiradio list`
pub async fn run(client: &HiRadioClient) -> Result<()> {
    let channels = client
        .ranked_channels()
        .await
        .context("Failed to list channels")?;

    let mut out = io::stdout().lock();
    table::write_channels(&mut out, &channels)?;
    out.flush()?;
    Ok(())
}
