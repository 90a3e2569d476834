//! Leaderboard gateway: the only remote store the game talks to.
//!
//! The simulation never calls a [`Leaderboard`] directly.  A
//! [`LeaderboardClient`] owns one on a worker thread and answers requests
//! over a channel, so a slow or dead backend can never stall a frame.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::INITIALS_LEN;
use crate::error::LeaderboardError;

// ── Initials ──────────────────────────────────────────────────────────────────

/// Exactly three uppercase ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Initials(String);

impl Initials {
    pub fn parse(raw: &str) -> Result<Self, LeaderboardError> {
        let valid = raw.len() == INITIALS_LEN && raw.bytes().all(|b| b.is_ascii_uppercase());
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(LeaderboardError::InvalidInitials(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Initials {
    type Error = LeaderboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Initials::parse(&value)
    }
}

impl From<Initials> for String {
    fn from(value: Initials) -> Self {
        value.0
    }
}

impl fmt::Display for Initials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub initials: Initials,
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

// ── Gateway trait ─────────────────────────────────────────────────────────────

pub trait Leaderboard: Send {
    fn submit_score(&mut self, initials: &Initials, score: u32) -> Result<(), LeaderboardError>;

    /// Best `n` entries, highest score first.
    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// True when fewer than `n` entries exist or `score` beats the current
    /// Nth best.  A tie with the Nth best does not qualify.
    fn is_qualifying_score(&self, score: u32, n: usize) -> Result<bool, LeaderboardError> {
        let top = self.fetch_top(n)?;
        Ok(qualifies(&top, score, n))
    }
}

/// Qualification rule shared by every gateway.
pub fn qualifies(top: &[LeaderboardEntry], score: u32, n: usize) -> bool {
    if n == 0 {
        return false;
    }
    if top.len() < n {
        return true;
    }
    top.get(n - 1).map(|nth| score > nth.score).unwrap_or(true)
}

/// Sort descending by score; older entries win ties so a new equal score
/// does not displace an existing one.
fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
}

// ── In-memory gateway ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        rank(&mut entries);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit_score(&mut self, initials: &Initials, score: u32) -> Result<(), LeaderboardError> {
        self.entries.push(LeaderboardEntry {
            initials: initials.clone(),
            score,
            timestamp: Utc::now(),
        });
        rank(&mut self.entries);
        Ok(())
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

// ── JSON file gateway ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
struct BoardFile {
    entries: Vec<LeaderboardEntry>,
}

/// Leaderboard persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
    /// Entries kept on disk; older ones beyond this are dropped.
    capacity: usize,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }

    /// `<data_dir>/downtime-dash/leaderboard.json`
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("downtime-dash")
            .join("leaderboard.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BoardFile, LeaderboardError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BoardFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, board: &BoardFile) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(board)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Leaderboard for JsonFileLeaderboard {
    fn submit_score(&mut self, initials: &Initials, score: u32) -> Result<(), LeaderboardError> {
        let mut board = self.load()?;
        board.entries.push(LeaderboardEntry {
            initials: initials.clone(),
            score,
            timestamp: Utc::now(),
        });
        rank(&mut board.entries);
        board.entries.truncate(self.capacity);
        self.store(&board)
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut board = self.load()?;
        rank(&mut board.entries);
        board.entries.truncate(n);
        Ok(board.entries)
    }
}

// ── Unavailable gateway ───────────────────────────────────────────────────────

/// Every call fails, like a backend that is down.
#[derive(Debug, Default)]
pub struct OfflineLeaderboard;

impl Leaderboard for OfflineLeaderboard {
    fn submit_score(&mut self, _initials: &Initials, _score: u32) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unavailable("offline".to_string()))
    }

    fn fetch_top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Err(LeaderboardError::Unavailable("offline".to_string()))
    }
}

// ── Worker client ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// Top-N plus qualification for a finished round.
    Standing { round: u32, score: u32 },
    Submit { round: u32, initials: Initials, score: u32 },
    /// Best persisted score, for the HUD.
    Best,
}

/// Failures are already folded into "no data" by the worker.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Standing {
        round: u32,
        top: Vec<LeaderboardEntry>,
        /// `None` when the gateway could not answer.
        qualifies: Option<bool>,
    },
    /// `top` is the refreshed list after a successful submit.
    Submitted {
        round: u32,
        ok: bool,
        top: Vec<LeaderboardEntry>,
    },
    Best(Option<u32>),
}

/// Non-blocking front end to a gateway running on its own thread.
pub struct LeaderboardClient {
    tx: Sender<Request>,
    rx: Receiver<Response>,
}

impl LeaderboardClient {
    pub fn spawn<L: Leaderboard + 'static>(mut board: L, top_n: usize) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();

        thread::spawn(move || {
            for request in req_rx {
                let response = serve(&mut board, top_n, request);
                if resp_tx.send(response).is_err() {
                    break; // client dropped → game exiting
                }
            }
            debug!("leaderboard worker stopped");
        });

        Self {
            tx: req_tx,
            rx: resp_rx,
        }
    }

    /// Fire and forget; a dead worker is logged and otherwise ignored.
    pub fn send(&self, request: Request) {
        if self.tx.send(request).is_err() {
            warn!(error = %LeaderboardError::WorkerGone, "leaderboard request dropped");
        }
    }

    /// Next finished response, if any.  Never blocks.
    pub fn try_recv(&self) -> Option<Response> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Blocking variant for headless drivers and tests.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.rx.recv_timeout(timeout).ok()
    }
}

fn serve<L: Leaderboard>(board: &mut L, top_n: usize, request: Request) -> Response {
    match request {
        Request::Standing { round, score } => match board.fetch_top(top_n) {
            Ok(top) => {
                let qualifies = qualifies(&top, score, top_n);
                debug!(round, score, qualifies, "leaderboard standing");
                Response::Standing {
                    round,
                    top,
                    qualifies: Some(qualifies),
                }
            }
            Err(e) => {
                warn!(error = %e, round, "leaderboard fetch failed");
                Response::Standing {
                    round,
                    top: Vec::new(),
                    qualifies: None,
                }
            }
        },
        Request::Submit {
            round,
            initials,
            score,
        } => match board.submit_score(&initials, score) {
            Ok(()) => {
                debug!(round, %initials, score, "score submitted");
                let top = board.fetch_top(top_n).unwrap_or_else(|e| {
                    warn!(error = %e, round, "leaderboard refresh failed");
                    Vec::new()
                });
                Response::Submitted {
                    round,
                    ok: true,
                    top,
                }
            }
            Err(e) => {
                warn!(error = %e, round, "score submission failed");
                Response::Submitted {
                    round,
                    ok: false,
                    top: Vec::new(),
                }
            }
        },
        Request::Best => match board.fetch_top(1) {
            Ok(top) => Response::Best(top.first().map(|e| e.score)),
            Err(e) => {
                warn!(error = %e, "best score lookup failed");
                Response::Best(None)
            }
        },
    }
}
