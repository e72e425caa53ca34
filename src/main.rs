//! Headless block-blast server (default binary).
//!
//! Hosts one session and serves it over the JSON-lines adapter. Configuration
//! comes from `BLOCK_BLAST_*` environment variables.

use anyhow::Result;

use block_blast::adapter::{Adapter, GameConfig, GameHost};

fn main() -> Result<()> {
    let config = GameConfig::from_env()?;
    let mut host = GameHost::new(config)?;

    let session = config.session;
    println!(
        "[block-blast] {} rules, {}x{} board, tray {}, seed {}",
        session.rules.as_str(),
        session.board_size,
        session.board_size,
        session.tray_capacity,
        session.seed
    );

    let Some(mut adapter) = Adapter::start_from_env()? else {
        println!("[block-blast] adapter disabled, nothing to serve");
        return Ok(());
    };
    println!("[block-blast] serving on {}", adapter.local_addr());

    while let Some(inbound) = adapter.recv_blocking() {
        for msg in host.handle(inbound) {
            adapter.send(msg);
        }
    }

    println!("[block-blast] adapter shut down");
    Ok(())
}
