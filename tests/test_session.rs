use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use downtime_dash::audio::{Audio, Cue, Silent};
use downtime_dash::compute::round;
use downtime_dash::constants::ENTITY_H;
use downtime_dash::entities::*;
use downtime_dash::error::{AudioError, LeaderboardError};
use downtime_dash::input::{Command, Edge, InputFrame, InputRouter, Intent};
use downtime_dash::leaderboard::*;
use downtime_dash::session::{Flow, Session};

const DT: f32 = 1.0 / 60.0;
const WAIT: Duration = Duration::from_secs(5);

fn field() -> Playfield {
    Playfield::new(800.0, 480.0)
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn enter() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

/// Memory board that counts submissions.
struct CountingBoard {
    inner: MemoryLeaderboard,
    submits: Arc<AtomicUsize>,
}

impl Leaderboard for CountingBoard {
    fn submit_score(&mut self, initials: &Initials, score: u32) -> Result<(), LeaderboardError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.inner.submit_score(initials, score)
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.inner.fetch_top(n)
    }
}

/// Board whose reads wait for the test to open the gate.
struct GatedBoard {
    gate: Receiver<()>,
}

impl Leaderboard for GatedBoard {
    fn submit_score(&mut self, _initials: &Initials, _score: u32) -> Result<(), LeaderboardError> {
        Ok(())
    }

    fn fetch_top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.gate
            .recv_timeout(WAIT)
            .map_err(|_| LeaderboardError::Unavailable("gate closed".to_string()))?;
        Ok(Vec::new())
    }
}

struct BrokenSpeaker {
    attempts: Arc<AtomicUsize>,
}

impl Audio for BrokenSpeaker {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AudioError::Unavailable)
    }
}

fn session_with<L: Leaderboard + 'static, A: Audio>(board: L, audio: A) -> Session<A> {
    let client = LeaderboardClient::spawn(board, 10);
    let mut session = Session::new(field(), StdRng::seed_from_u64(42), audio, client);
    // Best-score lookup sent on startup.
    assert!(session.await_leaderboard(WAIT));
    session
}

/// Put the session one hazard away from game over with `score` points.
fn stage_last_hit(session: &mut Session<impl Audio>, score: u32) {
    let state = session.state_mut();
    round::reset_round(state);
    state.phase = Phase::Playing;
    state.score = score;
    state.lives = 1;
    let hazard = Entity {
        kind: EntityKind::HazardGround,
        x: state.player.x,
        y: state.field.ground_y() - ENTITY_H,
        width: 16.0,
        height: 16.0,
        speed: 0.0,
        motion: Motion::Drift,
    };
    state.entities.push(hazard);
}

fn await_standing(session: &mut Session<impl Audio>) -> Standing {
    for _ in 0..10 {
        let standing = session.state().game_over().map(|o| o.standing);
        if standing != Some(Standing::Pending) {
            break;
        }
        session.await_leaderboard(WAIT);
    }
    session
        .state()
        .game_over()
        .map(|o| o.standing)
        .unwrap_or(Standing::Pending)
}

// ── Scenario D: qualifying score is submitted once ────────────────────────────

#[test]
fn qualifying_score_submits_exactly_once() {
    let submits = Arc::new(AtomicUsize::new(0));
    let board = CountingBoard {
        inner: MemoryLeaderboard::new(),
        submits: Arc::clone(&submits),
    };
    let mut session = session_with(board, Silent);
    stage_last_hit(&mut session, 120);

    session.step(&InputFrame::idle(), DT);
    assert!(session.state().game_over().is_some());
    assert_eq!(await_standing(&mut session), Standing::Qualifies);

    for c in ['a', 'b', 'c'] {
        assert_eq!(session.key_event(key(c)), Flow::Continue);
    }
    session.key_event(enter());
    session.key_event(enter());
    assert_eq!(
        session.state().game_over().map(|o| o.standing),
        Some(Standing::Submitted)
    );

    assert!(session.await_leaderboard(WAIT));
    assert!(!session.await_leaderboard(Duration::from_millis(200)));
    assert_eq!(submits.load(Ordering::SeqCst), 1);

    let over = session.state().game_over().cloned().unwrap_or_default();
    assert_eq!(over.standing, Standing::Submitted);
    assert_eq!(over.top.len(), 1);
    assert_eq!(over.top[0].initials.as_str(), "ABC");
    assert_eq!(over.top[0].score, 120);
    assert_eq!(session.state().best_score, 120);
}

#[test]
fn incomplete_name_is_not_submitted() {
    let submits = Arc::new(AtomicUsize::new(0));
    let board = CountingBoard {
        inner: MemoryLeaderboard::new(),
        submits: Arc::clone(&submits),
    };
    let mut session = session_with(board, Silent);
    stage_last_hit(&mut session, 50);
    session.step(&InputFrame::idle(), DT);
    assert_eq!(await_standing(&mut session), Standing::Qualifies);

    session.key_event(key('z'));
    session.key_event(enter());
    assert!(!session.await_leaderboard(Duration::from_millis(200)));
    assert_eq!(submits.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.state().game_over().map(|o| o.name.clone()),
        Some("Z".to_string())
    );
}

#[test]
fn non_qualifying_score_offers_no_name_entry() {
    let full: Vec<LeaderboardEntry> = (0..10)
        .map(|i| LeaderboardEntry {
            initials: Initials::parse("TOP").unwrap(),
            score: 1000 + i,
            timestamp: chrono::Utc::now(),
        })
        .collect();
    let board = MemoryLeaderboard::with_entries(full);
    let mut session = session_with(board, Silent);
    assert_eq!(session.state().best_score, 1009);

    stage_last_hit(&mut session, 120);
    session.step(&InputFrame::idle(), DT);
    assert_eq!(await_standing(&mut session), Standing::NotQualifying);

    // Letters are back to being game keys; 'r' replays.
    session.key_event(key('r'));
    assert_eq!(session.state().phase, Phase::Ready { ticks: 0 });
}

#[test]
fn offline_board_does_not_affect_the_round() {
    let mut session = session_with(OfflineLeaderboard, Silent);
    stage_last_hit(&mut session, 300);
    session.step(&InputFrame::idle(), DT);

    assert_eq!(await_standing(&mut session), Standing::Unavailable);
    assert_eq!(session.state().score, 300);
    assert_eq!(session.hud().score, 300);
    assert_eq!(session.hud().lives, 0);
}

#[test]
fn late_answer_for_old_round_is_dropped() {
    let (gate, rx): (Sender<()>, Receiver<()>) = mpsc::channel();
    let client = LeaderboardClient::spawn(GatedBoard { gate: rx }, 10);
    let mut session = Session::new(field(), StdRng::seed_from_u64(42), Silent, client);
    gate.send(()).unwrap();
    assert!(session.await_leaderboard(WAIT));

    stage_last_hit(&mut session, 120);
    session.step(&InputFrame::idle(), DT);
    assert_eq!(
        session.state().game_over().map(|o| o.standing),
        Some(Standing::Pending)
    );

    assert_eq!(session.command(Command::Replay), Flow::Continue);
    gate.send(()).unwrap();
    assert!(session.await_leaderboard(WAIT));

    assert_eq!(session.state().phase, Phase::Ready { ticks: 0 });
    assert!(session.state().game_over().is_none());
}

// ── Commands & flow ───────────────────────────────────────────────────────────

#[test]
fn any_intent_starts_from_idle() {
    let mut session = session_with(MemoryLeaderboard::new(), Silent);
    let jump = InputFrame {
        held: [Intent::Jump].into_iter().collect(),
        edges: vec![Edge::Pressed(Intent::Jump)],
    };
    session.step(&jump, DT);
    assert!(matches!(session.state().phase, Phase::Ready { .. }));
    assert_eq!(session.hud().phase, "ready");
}

#[test]
fn custom_router_controls_how_long_keys_stay_held() {
    let client = LeaderboardClient::spawn(MemoryLeaderboard::new(), 10);
    let mut session = Session::new(field(), StdRng::seed_from_u64(42), Silent, client)
        .with_router(InputRouter::with_hold_window(2));
    assert!(session.await_leaderboard(WAIT));
    let state = session.state_mut();
    round::reset_round(state);
    state.phase = Phase::Playing;
    let start_x = state.player.x;

    assert_eq!(session.key_event(key('a')), Flow::Continue);
    session.frame(DT);
    session.frame(DT);
    let moved_x = session.state().player.x;
    assert!(moved_x < start_x);

    for _ in 0..4 {
        session.frame(DT);
    }
    assert_eq!(session.state().player.x, moved_x);
}

#[test]
fn escape_quits_from_idle_and_leaves_game_over() {
    let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    let mut session = session_with(OfflineLeaderboard, Silent);
    stage_last_hit(&mut session, 10);
    session.step(&InputFrame::idle(), DT);
    await_standing(&mut session);

    assert_eq!(session.key_event(esc), Flow::Continue);
    assert_eq!(session.state().phase, Phase::Idle);
    assert_eq!(session.key_event(esc), Flow::Quit);
}

#[test]
fn ctrl_c_always_quits() {
    let mut session = session_with(MemoryLeaderboard::new(), Silent);
    session.command(Command::Start);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(session.key_event(ctrl_c), Flow::Quit);
}

#[test]
fn broken_audio_never_stops_play() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let speaker = BrokenSpeaker {
        attempts: Arc::clone(&attempts),
    };
    let mut session = session_with(MemoryLeaderboard::new(), speaker);
    stage_last_hit(&mut session, 0);
    session.step(&InputFrame::idle(), DT);

    assert!(session.state().game_over().is_some());
    assert!(attempts.load(Ordering::SeqCst) >= 2);
}

#[test]
fn resize_reaches_the_simulation() {
    let mut session = session_with(MemoryLeaderboard::new(), Silent);
    session.resize(Playfield::new(320.0, 240.0));
    assert_eq!(session.state().field, Playfield::new(320.0, 240.0));
    assert_eq!(session.state().player.y, session.state().field.player_floor());
}
