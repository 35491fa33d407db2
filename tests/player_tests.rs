// Integration tests for the trace player state machine

use std::time::Duration;

use algoscope::player::{Player, PlayerState};
use algoscope::trace::{HighlightSet, Trace, TraceRecorder};

const INTERVAL: Duration = Duration::from_millis(50);

/// Trace of `n` numbered steps over a trivial state type
fn make_trace(n: usize) -> Trace<i32> {
    let mut rec = TraceRecorder::new();
    for i in 0..n {
        rec.record(i as i32, HighlightSet::default(), format!("step {}", i));
    }
    rec.finish()
}

#[test]
fn load_trace_resets_to_idle() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(5));
    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(player.cursor(), 0);
    assert_eq!(player.len(), 5);
}

#[test]
fn play_without_a_trace_is_a_noop() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.play();
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(!player.scheduler().is_armed());
}

#[test]
fn play_on_single_step_trace_is_a_noop() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(1));
    player.play();
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(!player.scheduler().is_armed());
}

#[test]
fn forward_steps_clamp_at_the_last_index() {
    let n = 6;
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(n));

    for _ in 0..n {
        player.step_forward();
    }
    assert_eq!(player.cursor(), n - 1);
    player.step_forward();
    assert_eq!(player.cursor(), n - 1);
}

#[test]
fn backward_steps_clamp_at_zero() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(4));
    player.step_forward();
    player.step_backward();
    player.step_backward();
    player.step_backward();
    assert_eq!(player.cursor(), 0);
}

#[test]
fn play_runs_to_completion_with_exactly_n_minus_one_advances() {
    let n = 8;
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(n));

    player.play();
    assert_eq!(player.state(), PlayerState::Playing);
    assert!(player.scheduler().is_armed());

    let mut advances = 0;
    // Fire a few extra stale ticks past the end; they must be absorbed.
    for _ in 0..(n + 3) {
        if player.tick() {
            advances += 1;
        }
    }
    assert_eq!(advances, n - 1);
    assert_eq!(player.cursor(), n - 1);
    assert_eq!(player.state(), PlayerState::Finished);
    assert!(!player.scheduler().is_armed());
}

#[test]
fn pause_holds_the_cursor_and_disarms_the_timer() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(5));
    player.play();
    player.tick();
    player.pause();

    assert_eq!(player.state(), PlayerState::Paused);
    assert_eq!(player.cursor(), 1);
    assert!(!player.scheduler().is_armed());

    // Resuming picks up where the cursor stopped.
    player.play();
    assert_eq!(player.state(), PlayerState::Playing);
    player.tick();
    assert_eq!(player.cursor(), 2);
}

#[test]
fn manual_stepping_is_disabled_while_playing() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(5));
    player.play();
    player.step_forward();
    player.step_backward();
    assert_eq!(player.cursor(), 0);
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test]
fn ticks_outside_playing_are_absorbed() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(3));
    assert!(!player.tick());
    assert_eq!(player.cursor(), 0);
}

#[test]
fn loading_a_new_trace_cancels_a_running_timer() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(5));
    player.play();
    assert!(player.scheduler().is_armed());

    player.load_trace(make_trace(3));
    assert!(!player.scheduler().is_armed());
    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(player.cursor(), 0);
    assert_eq!(player.len(), 3);
}

#[test]
fn reset_rewinds_but_keeps_the_trace() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(4));
    player.play();
    player.tick();
    player.reset();

    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(player.cursor(), 0);
    assert_eq!(player.len(), 4);
    assert!(!player.scheduler().is_armed());
}

#[test]
fn stepping_back_out_of_finished_allows_replay() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(3));
    player.play();
    while player.tick() {}
    assert_eq!(player.state(), PlayerState::Finished);

    player.step_backward();
    assert_eq!(player.state(), PlayerState::Paused);
    player.play();
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test]
fn current_follows_the_cursor() {
    let mut player: Player<i32> = Player::new(INTERVAL);
    player.load_trace(make_trace(3));
    assert_eq!(player.current().map(|s| s.state), Some(0));
    player.step_forward();
    assert_eq!(player.current().map(|s| s.state), Some(1));
    assert_eq!(player.current().map(|s| s.message.as_str()), Some("step 1"));
}
