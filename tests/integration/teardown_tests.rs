//! Teardown and fault handling: no exit path may leave a door disabled.

use airlock::app::events::AppEvent;
use airlock::app::ports::UpdateFrequency;
use airlock::error::{DeviceError, Error};
use airlock::fsm::StageId;
use airlock::{Outcome, Verb};

use super::mock_hw::{DeviceCall, MockHardware, Rig};

/// Start `Pressurize G` on a pressurized chamber and run stage 0.
fn mid_sequence() -> Rig {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "Pressurize G").unwrap();
    assert_eq!(
        rig.tick(0).unwrap(),
        Outcome::StageRan(StageId::ChangePressure)
    );
    assert!(!rig.hw.all_doors_enabled());
    rig
}

// ── Superseding commands ──────────────────────────────────────

#[test]
fn new_command_re_enables_previous_doors_first() {
    let mut rig = mid_sequence();
    rig.hw.clear_calls();

    rig.at(500, "Depressurize G").unwrap();

    // The first calls re-enable every door of the interrupted sequence.
    let doors = rig.hw.doors();
    let head: Vec<_> = rig.hw.calls.iter().take(doors.len()).copied().collect();
    let expected: Vec<_> = doors.iter().map(|&d| DeviceCall::Enable(d, true)).collect();
    assert_eq!(head, expected);

    assert_eq!(rig.app.verb(), Verb::Depressurize);
    assert_eq!(rig.app.stage_index(), 0);
    assert!(rig.hw.all_doors_enabled());
}

#[test]
fn superseded_sequence_leaves_no_effects_behind() {
    let mut rig = mid_sequence();
    rig.at(500, "Depressurize G").unwrap();
    rig.hw.clear_calls();

    // Old pressurize deadline (2000) must not matter; new door wait ends
    // at 1500, depressurize wait at 5500.
    assert_eq!(
        rig.tick(1500).unwrap(),
        Outcome::StageRan(StageId::ChangePressure)
    );
    assert_eq!(rig.hw.vent_calls(), vec![true]);
    assert_eq!(rig.tick(2000).unwrap(), Outcome::Waiting);
    assert_eq!(rig.tick(5500).unwrap(), Outcome::Complete);

    // Depressurize opened the outer side; the inner door never opened.
    assert!(!rig.hw.calls.contains(&DeviceCall::Open(rig.hw.inner[0])));
    assert!(rig.hw.is_open(rig.hw.outer[0]));
}

// ── Faults during stages ──────────────────────────────────────

#[test]
fn stage_one_fault_tears_down_and_resurfaces() {
    let mut rig = mid_sequence();
    let inner = rig.hw.inner[0];
    rig.hw.fail_on = Some(inner);

    let err = rig.tick(2000).unwrap_err();
    assert_eq!(err, Error::Device(DeviceError::NotFunctional(inner)));

    assert!(rig.app.is_idle());
    assert!(rig.hw.all_doors_enabled());
    assert_eq!(rig.sched.current(), UpdateFrequency::None);
    assert_eq!(
        rig.sink.last_line().unwrap(),
        format!("Failed to cycle doors: block {inner} not functional")
    );
}

#[test]
fn stage_zero_fault_tears_down() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "Pressurize G").unwrap();
    let vent = rig.hw.vent();
    rig.hw.fail_on = Some(vent);

    let err = rig.tick(0).unwrap_err();
    assert_eq!(err, Error::Device(DeviceError::NotFunctional(vent)));
    assert!(rig.app.is_idle());
    assert!(rig.hw.all_doors_enabled(), "stage 0 disabled them first");
    assert!(rig.sink.contains(&AppEvent::SequenceAborted {
        stage: Some(StageId::ChangePressure),
        reason: format!("block {vent} not functional"),
    }));
    assert!(
        rig.sink
            .last_line()
            .unwrap()
            .starts_with("Failed to change the pressure:")
    );
}

#[test]
fn pre_close_fault_aborts_setup() {
    let mut hw = MockHardware::standard();
    hw.pressurized = false;
    let outer = hw.outer[1];
    hw.fail_on = Some(outer);
    let mut rig = Rig::new(hw);

    let err = rig.at(0, "Pressurize G").unwrap_err();
    assert_eq!(err, Error::Device(DeviceError::NotFunctional(outer)));
    assert!(rig.app.is_idle());
    assert!(rig.hw.all_doors_enabled());
    assert!(!rig.app.is_wait_armed());
    assert!(rig.sink.contains(&AppEvent::SequenceAborted {
        stage: None,
        reason: format!("block {outer} not functional"),
    }));
}

#[test]
fn teardown_skips_doors_it_cannot_reach() {
    let mut rig = mid_sequence();
    let broken = rig.hw.outer[0];
    rig.hw.fail_on = Some(broken);
    rig.hw.fail_enable = true;

    // Supersede: teardown runs, then the pre-close trips on the same door.
    let err = rig.at(500, "Depressurize G").unwrap_err();
    assert_eq!(err, Error::Device(DeviceError::NotFunctional(broken)));

    for door in rig.hw.doors() {
        if door != broken {
            assert!(rig.hw.is_enabled(door), "{door} left disabled");
        }
    }
    assert!(rig.app.is_idle());
}

// ── Explicit teardown ─────────────────────────────────────────

#[test]
fn teardown_on_idle_engine_is_harmless() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.app.teardown(false, &mut rig.hw, &mut rig.sched);
    rig.app.teardown(false, &mut rig.hw, &mut rig.sched);

    assert!(rig.hw.calls.is_empty());
    assert!(rig.app.is_idle());
    assert_eq!(rig.app.verb(), Verb::SpaceReady);
    assert_eq!(rig.sched.current(), UpdateFrequency::None);
}

#[test]
fn explicit_failure_teardown_is_idempotent() {
    let mut rig = mid_sequence();

    rig.app.teardown(false, &mut rig.hw, &mut rig.sched);
    assert!(rig.hw.all_doors_enabled());
    assert!(rig.app.group_name().is_none());
    assert!(!rig.app.is_wait_armed());

    rig.hw.clear_calls();
    rig.app.teardown(false, &mut rig.hw, &mut rig.sched);
    assert!(rig.hw.calls.is_empty());

    // Nothing left to resume.
    assert_eq!(rig.tick(5000).unwrap(), Outcome::Idle);
}

#[test]
fn successful_completion_leaves_near_side_sealed() {
    let mut rig = mid_sequence();
    assert_eq!(rig.tick(2000).unwrap(), Outcome::Complete);
    // Outer doors stay disabled after a clean pressurize.
    assert!(!rig.hw.is_enabled(rig.hw.outer[0]));
    assert!(rig.hw.is_enabled(rig.hw.inner[0]));
}
