//! End-to-end sequence tests: command → pre-close → stage 0 → wait →
//! stage 1 → teardown, against the recording mock grid.

use airlock::app::events::AppEvent;
use airlock::app::ports::UpdateFrequency;
use airlock::error::{Error, ValidationError};
use airlock::fsm::StageId;
use airlock::{AirlockConfig, Outcome, Verb};

use super::mock_hw::{DeviceCall, MockHardware, Rig};

// ── Pressurize ────────────────────────────────────────────────

#[test]
fn pressurize_runs_both_stages_after_waits() {
    let mut hw = MockHardware::standard();
    hw.pressurized = false;
    let mut rig = Rig::new(hw);

    let started = rig.at(0, "Pressurize G").unwrap();
    assert_eq!(
        started,
        Outcome::Started {
            verb: Verb::Pressurize,
            pre_closed: true
        }
    );
    assert_eq!(rig.app.stage_index(), 0);
    assert_eq!(rig.sched.current(), UpdateFrequency::Update10);
    // Pre-close: every door closed, still enabled.
    for door in rig.hw.doors() {
        assert!(rig.hw.calls.contains(&DeviceCall::Close(door)));
        assert!(rig.hw.is_enabled(door));
    }
    assert!(rig.hw.vent_calls().is_empty());

    // Door wait (1 s) still running.
    assert_eq!(rig.tick(500).unwrap(), Outcome::Waiting);
    assert_eq!(rig.app.stage_index(), 0);

    // Stage 0 runs once the door wait has passed.
    assert_eq!(
        rig.tick(1000).unwrap(),
        Outcome::StageRan(StageId::ChangePressure)
    );
    assert_eq!(rig.hw.vent_calls(), vec![false]);
    for door in rig.hw.doors() {
        assert!(!rig.hw.is_enabled(door), "stage 0 disables every door");
    }

    // Pressurize wait is 2 s from stage 0.
    assert_eq!(rig.tick(2999).unwrap(), Outcome::Waiting);
    assert_eq!(rig.app.stage_index(), 0);

    assert_eq!(rig.tick(3000).unwrap(), Outcome::Complete);
    assert_eq!(rig.app.stage_index(), -1);
    assert!(rig.app.is_idle());
    assert_eq!(rig.sched.current(), UpdateFrequency::None);

    let inner = rig.hw.inner[0];
    assert!(rig.hw.is_open(inner));
    assert!(rig.hw.is_enabled(inner));
    for &outer in &rig.hw.outer {
        assert!(!rig.hw.is_open(outer));
        assert!(!rig.hw.is_enabled(outer), "near side stays sealed");
    }

    assert_eq!(
        rig.sink.lines(),
        vec![
            "Starting sequence.",
            "Pressurize \"G\".",
            "Stage 0: ChangePressure.",
            "Stage 1: CycleDoors.",
            "Sequence complete.",
        ]
    );
}

#[test]
fn already_pressurized_skips_pre_close() {
    let mut rig = Rig::new(MockHardware::standard());

    let started = rig.at(0, "Pressurize G").unwrap();
    assert_eq!(
        started,
        Outcome::Started {
            verb: Verb::Pressurize,
            pre_closed: false
        }
    );
    assert!(rig.hw.calls.is_empty());

    // No door wait armed: stage 0 runs on the very next tick.
    assert_eq!(
        rig.tick(0).unwrap(),
        Outcome::StageRan(StageId::ChangePressure)
    );
}

#[test]
fn zero_door_wait_runs_stage_zero_immediately() {
    let mut hw = MockHardware::standard();
    hw.pressurized = false;
    let config = AirlockConfig {
        door_wait_secs: 0,
        ..AirlockConfig::default()
    };
    let mut rig = Rig::with_config(hw, config);

    rig.at(0, "Pressurize G").unwrap();
    assert!(!rig.app.is_wait_armed());
    assert_eq!(
        rig.tick(0).unwrap(),
        Outcome::StageRan(StageId::ChangePressure)
    );
}

// ── SpaceReady / AtmoReady / Depressurize ─────────────────────

#[test]
fn space_ready_opens_then_closes_outer_doors() {
    let mut rig = Rig::new(MockHardware::standard());

    rig.at(0, "SpaceReady G").unwrap();
    assert_eq!(rig.app.verb(), Verb::SpaceReady);
    rig.tick(1000).unwrap();
    assert_eq!(rig.hw.vent_calls(), vec![true], "depressurizing");
    assert!(!rig.hw.pressurized);

    // Depressurize wait is 4 s.
    assert_eq!(rig.tick(4999).unwrap(), Outcome::Waiting);
    rig.hw.clear_calls();
    assert_eq!(rig.tick(5000).unwrap(), Outcome::Complete);

    let outer = rig.hw.outer[0];
    let calls = &rig.hw.calls;
    let opened = calls.iter().position(|c| *c == DeviceCall::Open(outer));
    let closed = calls.iter().position(|c| *c == DeviceCall::Close(outer));
    assert!(opened.unwrap() < closed.unwrap());
    for &door in &rig.hw.outer {
        assert!(!rig.hw.is_open(door));
        assert!(rig.hw.is_enabled(door));
    }
    assert!(!rig.hw.calls.contains(&DeviceCall::Open(rig.hw.inner[0])));
    assert!(rig.app.is_idle());
}

#[test]
fn depressurize_opens_outer_side_only() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "Depressurize G").unwrap();
    rig.tick(1000).unwrap();
    assert_eq!(rig.tick(5000).unwrap(), Outcome::Complete);

    for &door in &rig.hw.outer {
        assert!(rig.hw.is_open(door));
        assert!(rig.hw.is_enabled(door));
    }
    assert!(!rig.hw.is_open(rig.hw.inner[0]));
    assert!(!rig.hw.is_enabled(rig.hw.inner[0]));
}

#[test]
fn atmo_ready_never_disables_and_opens_everything() {
    let mut hw = MockHardware::standard();
    hw.pressurized = false;
    let mut rig = Rig::new(hw);

    let started = rig.at(0, "AtmoReady G").unwrap();
    assert_eq!(
        started,
        Outcome::Started {
            verb: Verb::AtmoReady,
            pre_closed: false
        }
    );

    rig.tick(0).unwrap();
    assert!(
        !rig.hw.calls.contains(&DeviceCall::Enable(rig.hw.outer[0], false)),
        "AtmoReady leaves doors operable"
    );
    assert_eq!(rig.hw.vent_calls(), vec![false]);

    assert_eq!(rig.tick(2000).unwrap(), Outcome::Complete);
    for door in rig.hw.doors() {
        assert!(rig.hw.is_open(door));
        assert!(rig.hw.is_enabled(door));
    }
}

// ── Rejected commands ─────────────────────────────────────────

#[test]
fn group_without_vent_is_rejected_untouched() {
    let mut rig = Rig::new(MockHardware::airlock("G", 1, 1, 0));

    let err = rig.at(0, "Pressurize G").unwrap_err();
    assert_eq!(err, Error::Validation(ValidationError::VentCount(0)));
    assert!(rig.hw.calls.is_empty());
    assert!(rig.sched.requests.is_empty());
    assert_eq!(rig.app.stage_index(), -1);
    assert!(
        rig.sink
            .last_line()
            .unwrap()
            .starts_with("An airlock must have exactly one air vent")
    );
}

#[test]
fn two_vents_are_rejected() {
    let mut rig = Rig::new(MockHardware::airlock("G", 1, 1, 2));
    assert_eq!(
        rig.at(0, "Depressurize G").unwrap_err(),
        Error::Validation(ValidationError::VentCount(2))
    );
}

#[test]
fn missing_door_sides_are_rejected() {
    let mut rig = Rig::new(MockHardware::airlock("G", 0, 2, 1));
    assert!(matches!(
        rig.at(0, "Pressurize G"),
        Err(Error::Validation(ValidationError::NoOuterDoor { .. }))
    ));

    let mut rig = Rig::new(MockHardware::airlock("G", 2, 0, 1));
    assert!(matches!(
        rig.at(0, "Pressurize G"),
        Err(Error::Validation(ValidationError::NoInnerDoor { .. }))
    ));
}

#[test]
fn unknown_group_leaves_engine_idle() {
    let mut rig = Rig::new(MockHardware::standard());
    let err = rig.at(0, "Pressurize Nowhere").unwrap_err();
    assert_eq!(
        err,
        Error::Validation(ValidationError::GroupNotFound("Nowhere".into()))
    );
    assert!(rig.app.is_idle());
    assert!(rig.sched.requests.is_empty(), "no resumption requested");
    assert_eq!(
        rig.sink.last_line().unwrap(),
        format!(
            "No airlock group found by this name (\"Nowhere\"). {}",
            airlock::error::USAGE
        )
    );
}

#[test]
fn bad_command_lines_are_invalid() {
    let mut rig = Rig::new(MockHardware::standard());
    for line in ["Pressurize", "Vent G", "pressurize G", "SpaceReady \"G"] {
        assert!(
            matches!(rig.at(0, line), Err(Error::InvalidCommand(_))),
            "{line:?} should be rejected"
        );
    }
    assert!(rig.hw.calls.is_empty());
    assert!(rig.app.is_idle());
}

#[test]
fn rejected_command_does_not_disturb_running_sequence() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "Pressurize G").unwrap();
    rig.tick(0).unwrap();
    rig.hw.clear_calls();

    assert!(rig.at(100, "Pressurize Elsewhere").is_err());
    assert!(rig.at(100, "Bogus").is_err());
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.app.stage_index(), 0);
    assert_eq!(rig.app.verb(), Verb::Pressurize);

    assert_eq!(rig.tick(2000).unwrap(), Outcome::Complete);
}

// ── Configured group ──────────────────────────────────────────

#[test]
fn configured_group_needs_only_the_verb() {
    let config = AirlockConfig {
        group_name: Some("G".into()),
        ..AirlockConfig::default()
    };
    let mut rig = Rig::with_config(MockHardware::standard(), config);

    rig.at(0, "Depressurize").unwrap();
    assert_eq!(rig.app.group_name(), Some("G"));
}

#[test]
fn quoted_group_names_resolve() {
    let mut rig = Rig::new(MockHardware::airlock("Bay 2", 1, 1, 1));
    rig.at(0, "Depressurize \"Bay 2\"").unwrap();
    assert_eq!(rig.app.group_name(), Some("Bay 2"));
    assert!(rig.sink.contains(&AppEvent::SequenceStarted {
        verb: Verb::Depressurize,
        group: "Bay 2".into(),
    }));
}

// ── Demo mode ─────────────────────────────────────────────────

#[test]
fn demo_toggle_touches_nothing() {
    let mut rig = Rig::new(MockHardware::standard());

    assert_eq!(rig.at(0, "EnableDemoMode").unwrap(), Outcome::DemoMode(true));
    assert!(rig.app.demo_mode());
    assert!(rig.hw.calls.is_empty());
    assert!(rig.sched.requests.is_empty());
    assert_eq!(rig.app.stage_index(), -1);
    assert_eq!(
        rig.sink.last_line().unwrap(),
        "Demo mode enabled. Sequence complete."
    );

    assert_eq!(rig.at(0, "DisableDemoMode").unwrap(), Outcome::DemoMode(false));
    assert!(!rig.app.demo_mode());
}

#[test]
fn demo_toggle_mid_sequence_cancels_it() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "Depressurize G").unwrap();
    rig.tick(1000).unwrap();
    assert!(!rig.hw.all_doors_enabled());

    assert_eq!(rig.at(2000, "EnableDemoMode").unwrap(), Outcome::DemoMode(true));
    assert!(rig.app.is_idle());
    assert!(rig.app.demo_mode());
    assert!(rig.hw.all_doors_enabled());
    assert_eq!(rig.sched.current(), UpdateFrequency::None);

    // The cancelled cycle never opens the outer doors.
    rig.hw.clear_calls();
    assert_eq!(rig.tick(6000).unwrap(), Outcome::Idle);
    assert!(rig.hw.calls.is_empty());
    for &door in &rig.hw.outer {
        assert!(!rig.hw.is_open(door));
    }
}

#[test]
fn demo_mode_always_pre_closes() {
    let mut rig = Rig::new(MockHardware::standard());
    rig.at(0, "EnableDemoMode").unwrap();

    let started = rig.at(0, "Pressurize G").unwrap();
    assert_eq!(
        started,
        Outcome::Started {
            verb: Verb::Pressurize,
            pre_closed: true
        }
    );
}

// ── Ticks ─────────────────────────────────────────────────────

#[test]
fn idle_tick_asks_scheduler_to_stop() {
    let mut rig = Rig::new(MockHardware::standard());
    assert_eq!(rig.tick(0).unwrap(), Outcome::Idle);
    assert_eq!(rig.sched.requests, vec![UpdateFrequency::None]);
    assert_eq!(rig.app.invocations(), 1);
}
