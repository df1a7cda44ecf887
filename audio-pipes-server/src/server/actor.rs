use crate::error::{Result, ServerError};
use audio_pipes_core::{HubCommand, HubConfig, HubEvent, HubLoop};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Cloneable sender into the hub task
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Queue a command for the hub; waits only if the command channel is full
    pub async fn submit(&self, command: HubCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServerError::HubUnavailable)
    }
}

/// Spawn the task that owns the hub
///
/// The task stops once every `HubHandle` is dropped.
pub fn spawn_hub(
    config: HubConfig,
    command_capacity: usize,
    deadline_check: Option<Duration>,
) -> (HubHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(command_capacity);
    let hub_loop = HubLoop::new(&config);
    let task = tokio::spawn(run_hub(hub_loop, rx, config.batch_size, deadline_check));
    (HubHandle { commands: tx }, task)
}

async fn run_hub(
    mut hub_loop: HubLoop,
    mut commands: mpsc::Receiver<HubCommand>,
    batch_size: usize,
    deadline_check: Option<Duration>,
) {
    let check_deadlines = deadline_check.is_some();
    let mut ticker = tokio::time::interval(deadline_check.unwrap_or(Duration::from_secs(3600)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(check_deadlines, "Hub task started");

    loop {
        tokio::select! {
            received = commands.recv() => match received {
                Some(command) => {
                    enqueue(&mut hub_loop, command);
                    // Pick up whatever else is ready, up to one batch
                    while hub_loop.pending() < batch_size {
                        match commands.try_recv() {
                            Ok(command) => enqueue(&mut hub_loop, command),
                            Err(_) => break,
                        }
                    }
                }
                None => break,
            },
            _ = ticker.tick(), if check_deadlines => {
                enqueue(&mut hub_loop, HubCommand::CheckDeadlines { now: Instant::now() });
            }
        }

        while hub_loop.poll() > 0 {
            for event in hub_loop.drain_events() {
                log_event(&event);
            }
        }
    }

    info!("All hub handles dropped, hub task stopping");
}

fn enqueue(hub_loop: &mut HubLoop, command: HubCommand) {
    let name = command.name();
    if let Err(e) = hub_loop.submit(command) {
        warn!(command = name, error = %e, "Dropping command");
    }
}

fn log_event(event: &HubEvent) {
    match event {
        HubEvent::CommandFailed { command, reason } => {
            warn!(%command, %reason, "Command failed");
        }
        HubEvent::DeadlinesChecked { .. } => {}
        other => debug!(event = ?other, "Hub event"),
    }
}
