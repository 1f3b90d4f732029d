//! Timer that runs the overdue scan on a fixed interval.
//!
//! One background task owns the timer. A run lock keeps scans from
//! overlapping: timer ticks skip while a scan is in progress and
//! [`CheckInScheduler::run_once`] waits for it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use super::{CheckInMonitor, ScanReport};
use crate::domain::{Error, TraceId};

struct RunningTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owned scheduler with an explicit start/stop lifecycle.
pub struct CheckInScheduler {
    monitor: Arc<CheckInMonitor>,
    period: Duration,
    run_lock: Arc<Mutex<()>>,
    task: Option<RunningTask>,
}

impl CheckInScheduler {
    /// Build a stopped scheduler. A zero `period` is raised to one second.
    pub fn new(monitor: CheckInMonitor, period: Duration) -> Self {
        Self {
            monitor: Arc::new(monitor),
            period: period.max(Duration::from_secs(1)),
            run_lock: Arc::new(Mutex::new(())),
            task: None,
        }
    }

    /// Interval between scans.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the timer task is running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.handle.is_finished())
    }

    /// Start the timer. The first scan happens one period from now.
    ///
    /// Returns `false` if the scheduler was already running. Must be called
    /// within a Tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let (shutdown, mut signal) = watch::channel(false);
        let monitor = Arc::clone(&self.monitor);
        let run_lock = Arc::clone(&self.run_lock);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let Ok(_guard) = run_lock.try_lock() else {
                            debug!("previous check-in scan still running; skipping tick");
                            continue;
                        };
                        run_scan(&monitor).await;
                    }
                }
            }
            debug!("check-in scheduler loop exited");
        });

        self.task = Some(RunningTask { shutdown, handle });
        info!(period_secs = period.as_secs(), "check-in scheduler started");
        true
    }

    /// Run one scan now, waiting for any scan already in progress.
    pub async fn run_once(&self) -> Result<ScanReport, Error> {
        let _guard = self.run_lock.lock().await;
        TraceId::scope(TraceId::generate(), self.monitor.scan()).await
    }

    /// Signal the timer task to stop and wait for it. A scan in progress
    /// finishes first.
    pub async fn stop(&mut self) {
        let Some(RunningTask { shutdown, handle }) = self.task.take() else {
            return;
        };
        if shutdown.send(true).is_err() {
            debug!("check-in scheduler task already gone before shutdown");
        }
        if let Err(err) = handle.await {
            error!(error = %err, "check-in scheduler task failed");
        }
        info!("check-in scheduler stopped");
    }
}

async fn run_scan(monitor: &CheckInMonitor) {
    let trace_id = TraceId::generate();
    if let Err(err) = TraceId::scope(trace_id, monitor.scan()).await {
        error!(%trace_id, error = %err, "check-in scan failed");
    }
}
