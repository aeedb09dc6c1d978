use crate::{
    CommandOutcome, SessionCommand, TimedProgress,
    tests::fakes::{FakeEncoderFactory, TestOutputs, WriteBehavior, test_frame},
};

use std::time::{Duration, Instant};

/// WHAT: Two continuous toggles restore the flag with one open and one close
/// WHY: Recording must never leak or double-open a sink across a toggle pair
#[test]
fn given_idle_when_toggling_continuous_twice_then_flag_restored_with_one_open_and_close() {
    // Given: An idle controller
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();

    // When: Toggling continuous recording twice
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());
    assert!(controller.state().continuous_recording);
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());

    // Then: Flag is back to false, exactly one sink opened and closed
    assert!(!controller.state().continuous_recording);
    let log = factory.log.borrow();
    assert_eq!(log.opened_in(&outputs.continuous_dir()), 1);
    assert_eq!(log.finished_in(&outputs.continuous_dir()), 1);
    assert!(controller.continuous_path().is_none());
}

/// WHAT: Only the continuous sink receives frames when only it is active
/// WHY: Sinks are independent; an inactive slot must never be written
#[test]
#[allow(clippy::unwrap_used)]
fn given_only_continuous_active_when_routing_frame_then_only_continuous_sink_written() {
    // Given: Continuous recording active, timed inactive
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    controller.start_stop_continuous().unwrap();

    // When: Routing one frame
    let written = controller.route_frame(&frame);

    // Then: Exactly the continuous sink got it
    assert_eq!(written, 1);
    let log = factory.log.borrow();
    assert_eq!(log.writes_to(&outputs.continuous_dir()), 1);
    assert_eq!(log.writes_to(&outputs.timed_dir()), 0);
}

/// WHAT: Both sinks receive the frame when both recordings are active
/// WHY: Continuous and timed recordings may overlap
#[test]
fn given_both_recordings_active_when_routing_frame_then_both_sinks_written() {
    // Given: Continuous and timed recording both active
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    let now = Instant::now();
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, now);
    controller.handle_command(SessionCommand::SelectDuration(10), &frame, now);

    // When: Routing one frame
    let written = controller.route_frame(&frame);

    // Then: Each sink got exactly one write
    assert_eq!(written, 2);
    let log = factory.log.borrow();
    assert_eq!(log.writes_to(&outputs.continuous_dir()), 1);
    assert_eq!(log.writes_to(&outputs.timed_dir()), 1);
}

/// WHAT: Idle controller writes nothing
/// WHY: Frames must not be written without an explicit recording command
#[test]
fn given_idle_when_routing_frame_then_nothing_written() {
    // Given: An idle controller
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);

    // When: Routing a frame
    let written = controller.route_frame(&test_frame());

    // Then: No sink written
    assert_eq!(written, 0);
    assert!(factory.log.borrow().writes.is_empty());
}

/// WHAT: Timed recording survives before its duration and stops right after
/// WHY: Auto-stop is driven only by the per-cycle advance call
#[test]
fn given_three_second_timed_recording_when_advancing_past_duration_then_stops_once() {
    // Given: A 3 second timed recording started at t0
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let t0 = Instant::now();
    controller.handle_command(SessionCommand::SelectDuration(3), &test_frame(), t0);
    assert!(controller.state().timed_recording);

    // When: Advancing to 2.9s
    let progress = controller.advance_timed_recording(t0 + Duration::from_millis(2900));

    // Then: Still recording with ~0.1s left
    assert_eq!(progress, TimedProgress::Remaining(Duration::from_millis(100)));
    assert!(controller.state().timed_recording);
    assert_eq!(factory.log.borrow().finished_in(&outputs.timed_dir()), 0);

    // When: Advancing to 3.1s
    let progress = controller.advance_timed_recording(t0 + Duration::from_millis(3100));

    // Then: Stopped, duration cleared, sink closed exactly once
    assert!(matches!(progress, TimedProgress::Finished(Some(_))));
    assert!(!controller.state().timed_recording);
    assert_eq!(controller.state().timed_recording_duration_seconds, 0);
    assert!(controller.state().timed_recording_started_at.is_none());

    // When: Advancing again
    let progress = controller.advance_timed_recording(t0 + Duration::from_secs(5));

    // Then: Nothing more happens
    assert_eq!(progress, TimedProgress::Inactive);
    assert_eq!(factory.log.borrow().finished_in(&outputs.timed_dir()), 1);
}

/// WHAT: Elapsed time exactly equal to the duration keeps recording
/// WHY: The stop condition is strictly greater than the duration
#[test]
fn given_timed_recording_when_elapsed_equals_duration_then_still_recording() {
    // Given: A 5 second timed recording
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let t0 = Instant::now();
    controller.handle_command(SessionCommand::SelectDuration(5), &test_frame(), t0);

    // When: Advancing to exactly 5s
    let progress = controller.advance_timed_recording(t0 + Duration::from_secs(5));

    // Then: Remaining is zero but the recording continues
    assert_eq!(progress, TimedProgress::Remaining(Duration::ZERO));
    assert!(controller.state().timed_recording);
}

/// WHAT: Duration keys are ignored while a timed recording runs
/// WHY: A running countdown must not be restarted or altered
#[test]
fn given_timed_recording_running_when_selecting_duration_then_no_effect() {
    // Given: A running 3 second timed recording
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    let t0 = Instant::now();
    controller.handle_command(SessionCommand::SelectDuration(3), &frame, t0);
    controller.take_suppress_next_frame();
    let before = controller.state().clone();

    // When: Selecting a 5 second duration
    let outcome = controller.handle_command(
        SessionCommand::SelectDuration(5),
        &frame,
        t0 + Duration::from_secs(1),
    );

    // Then: State is untouched and no new sink opened
    assert_eq!(outcome, CommandOutcome::Continue);
    assert_eq!(controller.state(), &before);
    assert_eq!(controller.state().timed_recording_duration_seconds, 3);
    assert_eq!(factory.log.borrow().opened_in(&outputs.timed_dir()), 1);
}

/// WHAT: Recording and snapshot commands set the one-shot suppress flag
/// WHY: The frame after a blocking action is stale and must be skipped once
#[test]
fn given_command_with_io_when_handled_then_suppress_flag_set_once() {
    // Given: An idle controller
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();

    for command in [
        SessionCommand::ToggleContinuous,
        SessionCommand::Snapshot,
        SessionCommand::SelectDuration(8),
    ] {
        // When: Handling the command
        controller.handle_command(command, &frame, Instant::now());

        // Then: Flag is set and consumed exactly once
        assert!(controller.take_suppress_next_frame(), "{command:?}");
        assert!(!controller.take_suppress_next_frame(), "{command:?}");
    }
}

/// WHAT: Ignored duration selection does not suppress a frame
/// WHY: Only commands that performed blocking I/O skip a frame
#[test]
fn given_timed_recording_running_when_duration_ignored_then_no_suppression() {
    // Given: A running timed recording with the suppress flag consumed
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    controller.handle_command(SessionCommand::SelectDuration(10), &frame, Instant::now());
    controller.take_suppress_next_frame();

    // When: Selecting another duration
    controller.handle_command(SessionCommand::SelectDuration(3), &frame, Instant::now());

    // Then: Nothing to suppress
    assert!(!controller.take_suppress_next_frame());
}

/// WHAT: Quit returns the quit outcome without touching state
/// WHY: Shutdown is signalled to the loop, which owns teardown
#[test]
fn given_recording_when_quit_command_then_quit_outcome_and_state_kept() {
    // Given: Continuous recording active
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());

    // When: Quit
    let outcome = controller.handle_command(SessionCommand::Quit, &frame, Instant::now());

    // Then: Quit signalled, recording still active until teardown
    assert_eq!(outcome, CommandOutcome::Quit);
    assert!(controller.state().continuous_recording);
}

/// WHAT: Snapshot writes an image file in the snapshot directory
/// WHY: Snapshot is a stateless save of the displayed frame
#[test]
#[allow(clippy::unwrap_used)]
fn given_frame_when_snapshot_then_image_written_to_snapshot_dir() {
    // Given: An idle controller
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);

    // When: Taking a snapshot
    let path = controller.snapshot(&test_frame()).unwrap();

    // Then: A decodable image of the frame size exists in the snapshot dir
    assert!(path.starts_with(outputs.snapshot_dir()));
    let saved = image::open(&path).unwrap();
    assert_eq!(saved.width(), crate::tests::fakes::TEST_WIDTH);
    assert_eq!(saved.height(), crate::tests::fakes::TEST_HEIGHT);
    assert!(controller.state().is_idle());
}

/// WHAT: Failed sink open leaves the flag inactive and a retry succeeds
/// WHY: Open failures are recoverable and must not strand a half-open slot
#[test]
fn given_failing_encoder_when_toggling_continuous_then_flag_stays_false_and_retry_works() {
    // Given: An encoder factory that fails to open
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    factory.fail_open.set(true);
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();

    // When: Toggling continuous recording
    let outcome = controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());

    // Then: Loop continues, flag stays off, nothing opened
    assert_eq!(outcome, CommandOutcome::Continue);
    assert!(!controller.state().continuous_recording);
    assert!(factory.log.borrow().opened.is_empty());

    // When: Retrying after the encoder recovers
    factory.fail_open.set(false);
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());

    // Then: Recording starts with a single sink
    assert!(controller.state().continuous_recording);
    assert_eq!(factory.log.borrow().opened.len(), 1);
}

/// WHAT: Failed timed open clears the requested duration
/// WHY: A duration without a running recording would be a dangling request
#[test]
fn given_failing_encoder_when_selecting_duration_then_duration_cleared() {
    // Given: An encoder factory that fails to open
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    factory.fail_open.set(true);
    let mut controller = outputs.controller(&factory);

    // When: Selecting a timed duration
    controller.handle_command(SessionCommand::SelectDuration(5), &test_frame(), Instant::now());

    // Then: Nothing is recording and the duration is reset
    assert!(!controller.state().timed_recording);
    assert_eq!(controller.state().timed_recording_duration_seconds, 0);
    assert!(controller.state().timed_recording_started_at.is_none());
}

/// WHAT: A closed stream stops only the affected recording
/// WHY: Sink failures are recoverable and the other sink keeps recording
#[test]
fn given_both_recording_when_streams_close_then_flags_cleared_and_sinks_released() {
    // Given: Both recordings active
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    let now = Instant::now();
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, now);
    controller.handle_command(SessionCommand::SelectDuration(10), &frame, now);

    // When: Every encoder reports its stream closed
    factory.behavior.set(Some(WriteBehavior::CloseStream));
    let written = controller.route_frame(&frame);

    // Then: Both recordings stopped and nothing was written
    assert_eq!(written, 0);
    assert!(controller.state().is_idle());
    assert_eq!(controller.state().timed_recording_duration_seconds, 0);
    assert!(controller.continuous_path().is_none());
    assert!(controller.timed_path().is_none());

    // When: Routing again
    factory.behavior.set(Some(WriteBehavior::Accept));
    controller.route_frame(&frame);

    // Then: Released sinks are never touched
    assert_eq!(factory.log.borrow().writes_after_finish, 0);
}

/// WHAT: A single dropped frame keeps the recording running
/// WHY: Per-frame write failures are logged, not fatal
#[test]
fn given_recording_when_frame_dropped_then_recording_continues() {
    // Given: Continuous recording active
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, Instant::now());

    // When: The encoder drops one frame, then accepts the next
    factory.behavior.set(Some(WriteBehavior::DropFrame));
    controller.route_frame(&frame);
    factory.behavior.set(Some(WriteBehavior::Accept));
    controller.route_frame(&frame);

    // Then: Still recording and the second frame landed
    assert!(controller.state().continuous_recording);
    assert_eq!(factory.log.borrow().writes_to(&outputs.continuous_dir()), 1);
}

/// WHAT: Shutdown closes open sinks once even when called twice
/// WHY: Teardown must release every handle exactly once
#[test]
fn given_both_recording_when_shutdown_twice_then_each_sink_closed_once() {
    // Given: Both recordings active
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let frame = test_frame();
    let now = Instant::now();
    controller.handle_command(SessionCommand::ToggleContinuous, &frame, now);
    controller.handle_command(SessionCommand::SelectDuration(10), &frame, now);

    // When: Shutting down twice
    controller.shutdown();
    controller.shutdown();

    // Then: Each sink finished once and state is idle
    let log = factory.log.borrow();
    assert_eq!(log.finished.len(), 2);
    assert_eq!(log.finished_in(&outputs.continuous_dir()), 1);
    assert_eq!(log.finished_in(&outputs.timed_dir()), 1);
    assert!(controller.state().is_idle());
}

/// WHAT: Starting timed recording records the start instant
/// WHY: The countdown is measured from the moment the sink opened
#[test]
fn given_idle_when_starting_timed_then_start_time_recorded() {
    // Given: An idle controller
    let outputs = TestOutputs::new();
    let factory = FakeEncoderFactory::default();
    let mut controller = outputs.controller(&factory);
    let t0 = Instant::now();

    // When: Starting a timed recording
    controller.handle_command(SessionCommand::SelectDuration(8), &test_frame(), t0);

    // Then: Start time and remaining time reflect t0
    assert_eq!(controller.state().timed_recording_started_at, Some(t0));
    let status = controller.status(t0 + Duration::from_secs(2));
    assert_eq!(status.timed_remaining, Some(Duration::from_secs(6)));
    assert!(status.timed_recording);
    assert!(status.mirror_enabled);
}
