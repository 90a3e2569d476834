use downtime_dash::audio::{Audio, Cue, Silent, TerminalBell};
use downtime_dash::compute::GameEvent;
use downtime_dash::entities::EntityKind;

#[test]
fn events_map_to_cues() {
    assert_eq!(Cue::for_event(&GameEvent::Jumped), Some(Cue::Jump));
    assert_eq!(Cue::for_event(&GameEvent::Fired), Some(Cue::Fire));
    assert_eq!(
        Cue::for_event(&GameEvent::Pickup(EntityKind::Heart)),
        Some(Cue::Pickup)
    );
    assert_eq!(Cue::for_event(&GameEvent::HazardShot), Some(Cue::Explosion));
    assert_eq!(Cue::for_event(&GameEvent::RoundStarted { round: 1 }), None);
}

#[test]
fn bell_rings_only_for_hits_and_game_over() {
    let mut bell = TerminalBell::new(Vec::new());
    bell.play(Cue::Jump).unwrap();
    bell.play(Cue::Fire).unwrap();
    bell.play(Cue::Hit).unwrap();
    bell.play(Cue::GameOver).unwrap();
    assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
}

#[test]
fn boxed_audio_delegates() {
    let mut audio: Box<dyn Audio> = Box::new(Silent);
    assert!(audio.play(Cue::Explosion).is_ok());
}
