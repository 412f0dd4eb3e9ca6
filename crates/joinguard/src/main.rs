use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use joinguard_core::{config::Config, poller::JoinRequestPoller};
use joinguard_telegram::TelegramJoinRequestApi;

#[tokio::main]
async fn main() -> Result<(), joinguard_core::Error> {
    joinguard_core::logging::init("joinguard")?;

    let cfg = Config::load()?;

    let api = Arc::new(TelegramJoinRequestApi::from_token(
        &cfg.telegram_bot_token,
        cfg.long_poll_timeout,
    ));

    // Startup banner (best-effort).
    match api.bot_username().await {
        Ok(name) => println!("joinguard started: @{name}"),
        Err(e) => eprintln!("could not fetch bot identity: {e}"),
    }
    println!("Guarding channel: {}", cfg.channel_id);
    println!(
        "Listening for join requests (poll every {}ms)",
        cfg.poll_interval.as_millis()
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("shutdown requested");
            shutdown.cancel();
        }
    });

    JoinRequestPoller::new(api, cfg.poll_interval)
        .run(cancel)
        .await;

    Ok(())
}
