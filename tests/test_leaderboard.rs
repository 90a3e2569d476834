use std::time::Duration;

use chrono::{TimeZone, Utc};

use downtime_dash::error::LeaderboardError;
use downtime_dash::leaderboard::*;

fn entry(initials: &str, score: u32, secs: i64) -> LeaderboardEntry {
    LeaderboardEntry {
        initials: Initials::parse(initials).expect("valid initials"),
        score,
        timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
    }
}

fn initials(raw: &str) -> Initials {
    Initials::parse(raw).expect("valid initials")
}

// ── Initials ──────────────────────────────────────────────────────────────────

#[test]
fn initials_must_be_three_uppercase_letters() {
    assert!(Initials::parse("ABC").is_ok());
    assert!(matches!(
        Initials::parse("AB"),
        Err(LeaderboardError::InvalidInitials(_))
    ));
    assert!(Initials::parse("ABCD").is_err());
    assert!(Initials::parse("abc").is_err());
    assert!(Initials::parse("A1C").is_err());
    assert_eq!(initials("XYZ").to_string(), "XYZ");
}

#[test]
fn initials_deserialize_validates() {
    let ok: Result<Initials, _> = serde_json::from_str("\"JDK\"");
    assert_eq!(ok.map(|i| i.as_str().to_string()).ok().as_deref(), Some("JDK"));
    let bad: Result<Initials, _> = serde_json::from_str("\"toolong\"");
    assert!(bad.is_err());
}

// ── Qualification ─────────────────────────────────────────────────────────────

#[test]
fn short_board_always_qualifies() {
    let top = vec![entry("AAA", 500, 0), entry("BBB", 400, 1)];
    assert!(qualifies(&top, 0, 10));
    assert!(qualifies(&[], 120, 10));
}

#[test]
fn full_board_needs_to_beat_the_last_entry() {
    let top: Vec<_> = (0..10).map(|i| entry("AAA", 1000 - i * 100, i as i64)).collect();
    let last = top[9].score;
    assert!(qualifies(&top, last + 1, 10));
    assert!(!qualifies(&top, last, 10));
    assert!(!qualifies(&top, last - 1, 10));
}

#[test]
fn zero_sized_board_never_qualifies() {
    assert!(!qualifies(&[], 1_000, 0));
}

// ── In-memory gateway ─────────────────────────────────────────────────────────

#[test]
fn memory_board_ranks_descending() {
    let mut board = MemoryLeaderboard::new();
    board.submit_score(&initials("AAA"), 50).unwrap();
    board.submit_score(&initials("BBB"), 300).unwrap();
    board.submit_score(&initials("CCC"), 120).unwrap();

    let top = board.fetch_top(2).unwrap();
    let scores: Vec<u32> = top.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![300, 120]);
    assert_eq!(board.len(), 3);
}

#[test]
fn older_entry_wins_a_tie() {
    let board = MemoryLeaderboard::with_entries(vec![entry("NEW", 200, 50), entry("OLD", 200, 10)]);
    let top = board.fetch_top(1).unwrap();
    assert_eq!(top[0].initials.as_str(), "OLD");
}

#[test]
fn default_qualifying_check_uses_fetch_top() {
    let board = MemoryLeaderboard::with_entries(vec![entry("AAA", 500, 0)]);
    assert!(board.is_qualifying_score(1, 1).map(|q| !q).unwrap());
    assert!(board.is_qualifying_score(501, 1).unwrap());
    assert!(board.is_qualifying_score(1, 10).unwrap());
}

// ── JSON file gateway ─────────────────────────────────────────────────────────

#[test]
fn json_board_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let board = JsonFileLeaderboard::new(dir.path().join("scores.json"), 10);
    assert!(board.fetch_top(10).unwrap().is_empty());
}

#[test]
fn json_board_persists_and_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scores.json");

    let mut board = JsonFileLeaderboard::new(&path, 3);
    for (name, score) in [("AAA", 10), ("BBB", 40), ("CCC", 30), ("DDD", 20)] {
        board.submit_score(&initials(name), score).unwrap();
    }
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = JsonFileLeaderboard::new(&path, 3);
    let top = reopened.fetch_top(10).unwrap();
    let names: Vec<&str> = top.iter().map(|e| e.initials.as_str()).collect();
    assert_eq!(names, vec!["BBB", "CCC", "DDD"]);
}

#[test]
fn json_board_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "{ not json").unwrap();
    let board = JsonFileLeaderboard::new(&path, 10);
    assert!(matches!(board.fetch_top(10), Err(LeaderboardError::Json(_))));
}

#[test]
fn json_board_rejects_bad_initials_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(
        &path,
        r#"{"entries":[{"initials":"x","score":5,"timestamp":"2024-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();
    let board = JsonFileLeaderboard::new(&path, 10);
    assert!(board.fetch_top(10).is_err());
}

#[test]
fn offline_board_always_fails() {
    let mut board = OfflineLeaderboard;
    assert!(matches!(
        board.fetch_top(10),
        Err(LeaderboardError::Unavailable(_))
    ));
    assert!(board.submit_score(&initials("ABC"), 10).is_err());
    assert!(board.is_qualifying_score(10, 10).is_err());
}

// ── Worker client ─────────────────────────────────────────────────────────────

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn client_answers_standing() {
    let client = LeaderboardClient::spawn(MemoryLeaderboard::new(), 10);
    client.send(Request::Standing { round: 4, score: 120 });
    let response = client.recv_timeout(WAIT);
    assert_eq!(
        response,
        Some(Response::Standing {
            round: 4,
            top: Vec::new(),
            qualifies: Some(true),
        })
    );
}

#[test]
fn client_folds_failures_into_no_data() {
    let client = LeaderboardClient::spawn(OfflineLeaderboard, 10);
    client.send(Request::Standing { round: 1, score: 120 });
    client.send(Request::Submit {
        round: 1,
        initials: initials("ABC"),
        score: 120,
    });
    client.send(Request::Best);

    assert_eq!(
        client.recv_timeout(WAIT),
        Some(Response::Standing {
            round: 1,
            top: Vec::new(),
            qualifies: None,
        })
    );
    assert_eq!(
        client.recv_timeout(WAIT),
        Some(Response::Submitted {
            round: 1,
            ok: false,
            top: Vec::new(),
        })
    );
    assert_eq!(client.recv_timeout(WAIT), Some(Response::Best(None)));
}

#[test]
fn client_submit_returns_refreshed_top() {
    let board = MemoryLeaderboard::with_entries(vec![entry("AAA", 500, 0)]);
    let client = LeaderboardClient::spawn(board, 10);
    client.send(Request::Submit {
        round: 2,
        initials: initials("NEW"),
        score: 700,
    });
    match client.recv_timeout(WAIT) {
        Some(Response::Submitted { round, ok, top }) => {
            assert_eq!(round, 2);
            assert!(ok);
            assert_eq!(top.len(), 2);
            assert_eq!(top[0].initials.as_str(), "NEW");
        }
        other => panic!("unexpected response: {other:?}"),
    }
    client.send(Request::Best);
    assert_eq!(client.recv_timeout(WAIT), Some(Response::Best(Some(700))));
}

#[test]
fn try_recv_never_blocks() {
    let client = LeaderboardClient::spawn(MemoryLeaderboard::new(), 10);
    assert_eq!(client.try_recv(), None);
}
