//! Serves the HUD over stdin/stdout until the host hangs up.

use anyhow::Result;
use hud_core::config::Config;
use hud_ui::HudRuntime;
use tokio::io::BufReader;

pub async fn run(config: Config) -> Result<()> {
    let mut runtime = HudRuntime::new(config);

    let shutdown = runtime.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted");
            shutdown.cancel();
        }
    });

    runtime
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
