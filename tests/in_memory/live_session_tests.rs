//! In-memory integration tests for live session tracking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quantbridge::config::Settings;
use quantbridge::live_session::{
    LiveSessionError, LiveSessionRegistry, LiveTradeHandle, StartLiveSessionRequest,
};
use mockable::DefaultClock;
use rstest::rstest;

#[derive(Default)]
struct FlagRunner {
    stopped: AtomicBool,
}

#[async_trait]
impl LiveTradeHandle for FlagRunner {
    async fn stop(&self) -> Result<(), String> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_registry_tracks_and_stops_sessions() -> Result<(), eyre::Report> {
    let settings = Settings::from_toml_str("[live_trading]\nenabled = true\n")?;
    let registry = LiveSessionRegistry::new(&settings.live_trading, Arc::new(DefaultClock));
    let runner = Arc::new(FlagRunner::default());

    let session = registry.register(
        StartLiveSessionRequest::new("binance", "BTCUSDT", "grid.js"),
        Arc::clone(&runner) as Arc<dyn LiveTradeHandle>,
    )?;
    eyre::ensure!(registry.list()?.len() == 1, "session is listed");

    registry.stop(session.id()).await?;
    eyre::ensure!(runner.stopped.load(Ordering::SeqCst), "runner was stopped");
    eyre::ensure!(registry.list()?.is_empty(), "session is forgotten");
    Ok(())
}

#[rstest]
fn default_settings_keep_live_trading_off() -> Result<(), eyre::Report> {
    let settings = Settings::from_toml_str("")?;
    let registry = LiveSessionRegistry::new(&settings.live_trading, Arc::new(DefaultClock));

    let result = registry.register(
        StartLiveSessionRequest::new("binance", "BTCUSDT", "grid.js"),
        Arc::new(FlagRunner::default()),
    );

    eyre::ensure!(
        matches!(result, Err(LiveSessionError::Disabled)),
        "registration must be refused"
    );
    Ok(())
}
