//! Periodic self-ping that keeps the hosted process from idling out.
//!
//! The job is owned by `main`: it starts with the server and is stopped
//! through its handle during shutdown. Ping failures are logged and never
//! stop the loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running keep-alive job.
pub struct KeepAlive {
    stop: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl KeepAlive {
    /// Spawn the job. The first ping happens one full `interval` after start.
    pub fn spawn(client: reqwest::Client, url: String, interval: Duration) -> Self {
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut pings = 0u64;

            // Only `true` is ever sent, and a dropped sender also means stop,
            // so any change on the channel ends the job.
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // An in-flight ping is abandoned when the stop arrives.
                        tokio::select! {
                            _ = ping(&client, &url) => pings += 1,
                            _ = stopped.changed() => break,
                        }
                    }
                    _ = stopped.changed() => break,
                }
            }

            tracing::debug!(pings, "Keep-alive job stopped");
            pings
        });

        Self { stop, task }
    }

    /// Stop the job and wait for it to finish. Returns the number of pings sent.
    pub async fn shutdown(self) -> u64 {
        let _ = self.stop.send(true);
        match self.task.await {
            Ok(pings) => pings,
            Err(e) => {
                tracing::warn!("Keep-alive task ended abnormally: {}", e);
                0
            }
        }
    }
}

async fn ping(client: &reqwest::Client, url: &str) {
    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::debug!(status = %resp.status(), "Keep-alive ping ok");
        }
        Ok(resp) => {
            tracing::warn!(status = %resp.status(), "Keep-alive ping returned an error status");
        }
        Err(e) => {
            tracing::warn!("Keep-alive ping failed: {}", e);
        }
    }
}
