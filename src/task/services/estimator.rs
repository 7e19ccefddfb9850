//! Heuristic progress estimation for operations without a progress hook.
//!
//! The wrapped framework calls expose no progress callback, so a ticker
//! synthesises a percentage from elapsed wall-clock time against an
//! estimate derived from the data span. The curve
//! `95 * (1 - e^(-2 * elapsed / estimate))` climbs quickly and flattens
//! out, and the reported value is held in `[5, 95]`: only a real
//! completion reports 100.

use crate::task::{
    domain::{TaskId, TaskKind, TimeRange},
    ports::TaskRegistry,
    services::TaskManager,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lower bound on the estimated total duration.
pub const MIN_ESTIMATED_DURATION: Duration = Duration::from_secs(5);
/// Shortest interval between ticks.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Longest interval between ticks.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(10);
/// Lowest percentage the estimator reports.
pub const FLOOR_PERCENT: u8 = 5;
/// Highest percentage the estimator reports.
pub const CEILING_PERCENT: u8 = 95;

/// Share of the estimated duration between two ticks.
const TICK_FRACTION: f64 = 0.02;
/// Calibration used for kinds missing from the table.
const DEFAULT_SECONDS_PER_DAY: f64 = 1.0;

/// Hand-tuned seconds of processing per day of data, keyed by task kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Per-kind calibration values.
    pub seconds_per_day: HashMap<String, f64>,
    /// Calibration for kinds missing from `seconds_per_day`.
    pub fallback_seconds_per_day: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        let seconds_per_day = HashMap::from([
            // local compute
            (TaskKind::BACKTEST.to_owned(), 0.5),
            (TaskKind::BACKTEST_MANAGED.to_owned(), 0.5),
            // network bound
            (TaskKind::DOWNLOAD.to_owned(), 2.0),
        ]);
        Self {
            seconds_per_day,
            fallback_seconds_per_day: DEFAULT_SECONDS_PER_DAY,
        }
    }
}

impl EstimatorSettings {
    /// Returns the calibration value for a kind.
    #[must_use]
    pub fn seconds_per_day(&self, kind: &TaskKind) -> f64 {
        self.seconds_per_day
            .get(kind.as_str())
            .copied()
            .unwrap_or(self.fallback_seconds_per_day)
    }

    /// Returns the estimated total run time for a kind over a data range,
    /// never less than [`MIN_ESTIMATED_DURATION`].
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the estimate is a heuristic product of two floats"
    )]
    pub fn estimated_duration(&self, kind: &TaskKind, range: &TimeRange) -> Duration {
        let seconds = range.span_days() * self.seconds_per_day(kind);
        Duration::try_from_secs_f64(seconds)
            .unwrap_or(Duration::ZERO)
            .max(MIN_ESTIMATED_DURATION)
    }
}

/// Returns the tick interval for an estimate: 2% of it, clamped to
/// [`MIN_TICK_INTERVAL`]..=[`MAX_TICK_INTERVAL`].
#[must_use]
pub fn tick_interval(estimated: Duration) -> Duration {
    estimated
        .mul_f64(TICK_FRACTION)
        .clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
}

/// Maps elapsed time against the estimate onto a bounded percentage.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the curve output is clamped to [5, 95] before truncation"
)]
pub fn estimate_percent(elapsed: Duration, estimated: Duration) -> u8 {
    let total = estimated.as_secs_f64();
    if total <= 0.0 {
        return CEILING_PERCENT;
    }
    let ratio = elapsed.as_secs_f64() / total;
    let percent = (1.0 - (-2.0 * ratio).exp()) * f64::from(CEILING_PERCENT);
    percent.clamp(f64::from(FLOOR_PERCENT), f64::from(CEILING_PERCENT)) as u8
}

/// Formats a duration truncated to whole seconds, e.g. `1h2m3s`.
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "splitting whole seconds into clock units"
)]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Builds the status line written on every tick.
#[must_use]
pub fn progress_text(span_days: f64, elapsed: Duration) -> String {
    format!(
        "processing... {span_days:.0} days range, elapsed {}",
        format_elapsed(elapsed)
    )
}

/// Spawns progress tickers against a task manager.
pub struct ProgressEstimator<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    manager: TaskManager<R, C>,
    settings: Arc<EstimatorSettings>,
}

impl<R, C> Clone for ProgressEstimator<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<R, C> ProgressEstimator<R, C>
where
    R: TaskRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an estimator writing through the given manager.
    #[must_use]
    pub const fn new(manager: TaskManager<R, C>, settings: Arc<EstimatorSettings>) -> Self {
        Self { manager, settings }
    }

    /// Returns the calibration in use.
    #[must_use]
    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    /// Starts ticking progress for a task until the returned ticker is
    /// stopped.
    ///
    /// The first update lands one tick interval after the call. Must be
    /// called from within a Tokio runtime.
    #[must_use]
    pub fn start(&self, task_id: TaskId, kind: &TaskKind, range: &TimeRange) -> ProgressTicker {
        let estimated = self.settings.estimated_duration(kind, range);
        let interval = tick_interval(estimated);
        let span_days = range.span_days();
        let manager = self.manager.clone();
        let token = CancellationToken::new();
        let cancelled = token.clone();

        debug!(
            task_id = %task_id,
            kind = %kind,
            ?estimated,
            ?interval,
            "progress estimator started"
        );

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval_at(started + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let elapsed = started.elapsed();
                        let percent = estimate_percent(elapsed, estimated);
                        let text = progress_text(span_days, elapsed);
                        if let Err(err) = manager.update_progress(&task_id, text, percent).await {
                            warn!(task_id = %task_id, error = %err, "progress update failed");
                        }
                    }
                }
            }
            debug!(task_id = %task_id, "progress estimator stopped");
        });

        ProgressTicker {
            token,
            handle: Some(handle),
        }
    }
}

/// Running progress ticker. Dropping it cancels further ticks.
#[derive(Debug)]
pub struct ProgressTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Cancels the ticker and waits for it to wind down, so no tick can
    /// land after the caller's terminal transition. Performs no final
    /// write.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(err) = handle.await
        {
            warn!(error = %err, "progress estimator ended abnormally");
        }
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
