//! Leaderboard Request Tracker
//!
//! Bridges the synchronous game loop and the async leaderboard client.
//! Requests run as tokio tasks and report back over an mpsc channel; the
//! loop applies replies on a later frame through [`LeaderboardTracker::poll`].
//!
//! Each request kind carries a generation number. Starting a new request
//! supersedes the one in flight, and replies from older generations are
//! dropped when they arrive. Nothing is cancelled.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::leaderboard::LeaderboardClient;
use crate::game::score::{rank_entries, Ranking, ScoreEntry};

/// State of the ranked list shown on the leaderboard screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LeaderboardStatus {
    /// Never requested.
    #[default]
    Idle,
    /// Request in flight.
    Updating,
    /// Latest list.
    Ready(Ranking),
    /// Last request failed.
    Failed,
}

/// State of the score submission from the epilogue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Nothing submitted.
    #[default]
    Idle,
    /// Request in flight.
    Submitting,
    /// Server stored the entry.
    Accepted(ScoreEntry),
    /// Last submission failed.
    Failed,
}

/// Something the game loop must act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerUpdate {
    /// New ranked list available.
    Ranked,
    /// Submission accepted; record it on the session.
    Accepted(ScoreEntry),
    /// Submission failed.
    SubmitFailed,
    /// Connectivity probe finished.
    Connectivity(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    RankedList,
    Submit,
    Ping,
}

#[derive(Debug)]
pub(crate) enum Outcome {
    RankedList(Option<Vec<ScoreEntry>>),
    Submitted(Option<ScoreEntry>),
    Ping(bool),
}

impl Outcome {
    fn kind(&self) -> RequestKind {
        match self {
            Outcome::RankedList(_) => RequestKind::RankedList,
            Outcome::Submitted(_) => RequestKind::Submit,
            Outcome::Ping(_) => RequestKind::Ping,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Reply {
    generation: u64,
    outcome: Outcome,
}

/// Tracks in-flight leaderboard requests.
#[derive(Debug)]
pub struct LeaderboardTracker {
    client: Option<LeaderboardClient>,
    generations: [u64; 3],
    tx: mpsc::UnboundedSender<Reply>,
    rx: mpsc::UnboundedReceiver<Reply>,
    player: Option<ScoreEntry>,
    leaderboard: LeaderboardStatus,
    submit: SubmitStatus,
    ping_in_flight: bool,
}

impl LeaderboardTracker {
    /// Tracker for `client`. With `None` every request fails at once.
    pub fn new(client: Option<LeaderboardClient>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            generations: [0; 3],
            tx,
            rx,
            player: None,
            leaderboard: LeaderboardStatus::Idle,
            submit: SubmitStatus::Idle,
            ping_in_flight: false,
        }
    }

    /// A client is configured.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Ranked list state.
    pub fn leaderboard(&self) -> &LeaderboardStatus {
        &self.leaderboard
    }

    /// Submission state.
    pub fn submit_status(&self) -> &SubmitStatus {
        &self.submit
    }

    /// A connectivity probe is in flight.
    pub fn is_pinging(&self) -> bool {
        self.ping_in_flight
    }

    fn slot(kind: RequestKind) -> usize {
        match kind {
            RequestKind::RankedList => 0,
            RequestKind::Submit => 1,
            RequestKind::Ping => 2,
        }
    }

    /// Start a new generation of `kind`, superseding older ones.
    fn begin(&mut self, kind: RequestKind) -> u64 {
        let slot = &mut self.generations[Self::slot(kind)];
        *slot += 1;
        *slot
    }

    /// Client and runtime to run a request on, or `None` to fail it.
    fn runner(&self) -> Option<(LeaderboardClient, Handle)> {
        let client = self.client.clone()?;
        match Handle::try_current() {
            Ok(handle) => Some((client, handle)),
            Err(_) => {
                warn!("No async runtime; leaderboard request dropped");
                None
            }
        }
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    /// Fetch the ranked list. `player` is highlighted in the result.
    pub fn request_update(&mut self, player: Option<ScoreEntry>) {
        let generation = self.begin(RequestKind::RankedList);
        self.player = player;

        let Some((client, handle)) = self.runner() else {
            self.leaderboard = LeaderboardStatus::Failed;
            return;
        };
        self.leaderboard = LeaderboardStatus::Updating;

        let tx = self.tx.clone();
        handle.spawn(async move {
            let entries = match client.fetch_ranked_list().await {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!(error = %e, "Ranked list request failed");
                    None
                }
            };
            tx.send(Reply { generation, outcome: Outcome::RankedList(entries) }).ok();
        });
    }

    /// Submit `entry`.
    pub fn submit(&mut self, entry: ScoreEntry) {
        let generation = self.begin(RequestKind::Submit);

        let Some((client, handle)) = self.runner() else {
            self.submit = SubmitStatus::Failed;
            return;
        };
        self.submit = SubmitStatus::Submitting;

        let tx = self.tx.clone();
        handle.spawn(async move {
            let accepted = match client.submit_score(&entry).await {
                Ok(()) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Score submission failed");
                    None
                }
            };
            tx.send(Reply { generation, outcome: Outcome::Submitted(accepted) }).ok();
        });
    }

    /// Probe connectivity. Returns false if no probe could be started.
    pub fn ping(&mut self) -> bool {
        let generation = self.begin(RequestKind::Ping);
        let Some((client, handle)) = self.runner() else {
            self.ping_in_flight = false;
            return false;
        };
        self.ping_in_flight = true;

        let tx = self.tx.clone();
        handle.spawn(async move {
            let reachable = client.ping().await;
            tx.send(Reply { generation, outcome: Outcome::Ping(reachable) }).ok();
        });
        true
    }

    /// Forget any finished submission so the epilogue starts clean.
    pub fn clear_submit(&mut self) {
        self.begin(RequestKind::Submit);
        self.submit = SubmitStatus::Idle;
    }

    // =========================================================================
    // REPLIES
    // =========================================================================

    #[cfg(test)]
    pub(crate) fn deliver(&self, generation: u64, outcome: Outcome) {
        self.tx.send(Reply { generation, outcome }).ok();
    }

    /// Apply every reply that arrived since the last call.
    pub fn poll(&mut self) -> Vec<TrackerUpdate> {
        let mut updates = Vec::new();

        while let Ok(reply) = self.rx.try_recv() {
            let kind = reply.outcome.kind();
            let current = self.generations[Self::slot(kind)];
            if reply.generation != current {
                debug!(?kind, generation = reply.generation, current, "Dropping stale reply");
                continue;
            }

            match reply.outcome {
                Outcome::RankedList(Some(entries)) => {
                    let ranking = rank_entries(entries, self.player.as_ref());
                    self.leaderboard = LeaderboardStatus::Ready(ranking);
                    updates.push(TrackerUpdate::Ranked);
                }
                Outcome::RankedList(None) => {
                    self.leaderboard = LeaderboardStatus::Failed;
                }
                Outcome::Submitted(Some(entry)) => {
                    self.submit = SubmitStatus::Accepted(entry.clone());
                    updates.push(TrackerUpdate::Accepted(entry));
                }
                Outcome::Submitted(None) => {
                    self.submit = SubmitStatus::Failed;
                    updates.push(TrackerUpdate::SubmitFailed);
                }
                Outcome::Ping(reachable) => {
                    self.ping_in_flight = false;
                    updates.push(TrackerUpdate::Connectivity(reachable));
                }
            }
        }

        updates
    }
}

// =============================================================================
// TESTS
// =============================================================================
