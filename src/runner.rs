//! Session driver: one task, one timer
//!
//! A spawned task owns the [`Game`] and is the only thing that touches
//! it. Input and ticks arrive through the same loop, so a tick can never
//! land in the middle of a command. The task keeps a single optional
//! deadline; re-arming it replaces the old one, so at most one tick is
//! ever pending.

use crate::game::{Action, Game};
use crate::snapshot::Snapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

/// Messages from handles to the session task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// A decoded player command
    Action(Action),
    /// Reset everything and start ticking right away
    Restart,
    /// Cancel the pending tick
    Stop,
}

/// Handle to a running session
///
/// Dropping the last handle closes the command channel and ends the task.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Spawn the session task on the current tokio runtime
    ///
    /// Panics when called outside a runtime, like `tokio::spawn`.
    pub fn spawn(game: Game) -> Self {
        Self::spawn_on(&tokio::runtime::Handle::current(), game)
    }

    /// Spawn the session task using the provided runtime handle
    pub fn spawn_on(handle: &tokio::runtime::Handle, game: Game) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());

        let task = handle.spawn(run_session(game, cmd_rx, snapshot_tx));

        Self {
            commands: cmd_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    /// Queue a player command. Returns false if the session has ended.
    pub fn send(&self, action: Action) -> bool {
        self.command(Command::Action(action))
    }

    /// Start a fresh game; same as [`SessionHandle::restart`]
    pub fn start(&self) -> bool {
        self.restart()
    }

    pub fn restart(&self) -> bool {
        self.command(Command::Restart)
    }

    pub fn stop(&self) -> bool {
        self.command(Command::Stop)
    }

    fn command(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Latest published state
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every state change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Close the session and wait for its task to finish
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(err) = task.await {
            warn!(error = %err, "session task ended abnormally");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn run_session(
    mut game: Game,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
) {
    let mut deadline: Option<Instant> = None;
    debug!("session task started");

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Command::Action(action) => {
                        game.process_action(action);
                    }
                    Command::Restart => {
                        game.restart();
                        deadline = Some(Instant::now());
                    }
                    Command::Stop => {
                        game.stop();
                        deadline = None;
                    }
                }
            }
            () = wait_until(deadline) => {
                deadline = game.tick().map(|delay| Instant::now() + delay);
                if deadline.is_none() && game.is_lost() {
                    info!(cleared_rows = game.cleared_rows(), "session lost, timer cancelled");
                }
            }
        }

        snapshots.send_if_modified(|current| {
            let next = game.snapshot();
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    debug!("session task finished");
}
