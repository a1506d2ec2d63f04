//! End-to-end scenarios driving complete machines.

use std::sync::{Arc, Mutex};
use tracing::Level;
use waypoint::builder::{BuildError, StateBuilder, StateMachineBuilder, TransitionBuilder};
use waypoint::checkpoint::{self, Checkpoint};
use waypoint::core::{EventId, Guard, StateId};
use waypoint::machine::{MachineError, MachineStatus, Notification, Phase, StateMachine};
use waypoint::{CallbackContext, CallbackError, CallbackRegistry};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn named(name: &str) -> StateId {
    StateId::named(name)
}

fn path(machine: &StateMachine<impl Sized>) -> Vec<String> {
    machine
        .transition_log()
        .path()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Default)]
struct Turnstile {
    sounds: Vec<&'static str>,
    coins: u32,
    max: u32,
    do_runs: u32,
}

fn record(sound: &'static str) -> impl Fn(&mut waypoint::CallbackContext<'_, Turnstile>) -> Result<(), waypoint::CallbackError> {
    move |ctx| {
        if let Some(turnstile) = ctx.payload_mut() {
            turnstile.sounds.push(sound);
        }
        Ok(())
    }
}

fn turnstile(guard: Option<Guard<Turnstile>>) -> StateMachine<Turnstile> {
    let mut coin = TransitionBuilder::new().from("locked").on("insertCoin").to("unlocked");
    if let Some(guard) = guard {
        coin = coin.guard(guard);
    }

    StateMachineBuilder::new()
        .add_state(StateBuilder::<Turnstile>::new("locked").on_do(|ctx| {
            if let Some(turnstile) = ctx.payload_mut() {
                turnstile.do_runs += 1;
            }
            Ok(())
        }))
        .and_then(|b| b.state("unlocked"))
        .and_then(|b| b.start_at("locked"))
        .and_then(|b| b.transition(coin))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("locked")
                    .on("pass")
                    .to("locked")
                    .action(record("alarm")),
            )
        })
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("unlocked")
                    .on("insertCoin")
                    .to("unlocked")
                    .action(record("thank")),
            )
        })
        .and_then(|b| b.add_transition("unlocked", "pass", "locked"))
        .and_then(|b| b.id("turnstile").payload(Turnstile::default()).build())
        .unwrap()
}

#[test]
fn turnstile_walks_expected_path() {
    init_tracing();
    let mut machine = turnstile(None);
    machine.start().unwrap();

    for event in ["pass", "insertCoin", "insertCoin", "pass"] {
        machine.trigger_event(event).unwrap();
    }

    assert_eq!(
        path(&machine),
        vec!["__INITIAL__", "locked", "locked", "unlocked", "unlocked", "locked"]
    );
    assert_eq!(machine.payload().unwrap().sounds, vec!["alarm", "thank"]);
    assert_eq!(machine.current_state(), Some(&named("locked")));
    assert_eq!(machine.previous_state(), Some(&named("unlocked")));
}

#[test]
fn start_lands_on_declared_start_state() {
    let mut machine = turnstile(None);
    assert!(machine.current_state().is_none());
    assert!(machine.previous_state().is_none());

    machine.start().unwrap();

    assert!(machine.is_active());
    assert_eq!(machine.current_state(), Some(&named("locked")));
    assert_eq!(machine.previous_state(), Some(&StateId::Initial));
    assert!(matches!(machine.start(), Err(MachineError::AlreadyStarted)));
}

#[test]
fn events_before_start_are_rejected() {
    let mut machine = turnstile(None);

    assert!(matches!(machine.trigger_event("pass"), Err(MachineError::NotStarted)));
    assert!(matches!(machine.queue_event("pass"), Err(MachineError::NotStarted)));
    assert_eq!(machine.status(), MachineStatus::NotStarted);
}

#[test]
fn guarded_turnstile_vetoes_and_still_runs_do_once() {
    init_tracing();
    let mut machine = turnstile(Some(Guard::payload(|t: &Turnstile| t.coins <= t.max)));
    machine.start().unwrap();
    {
        let turnstile = machine.payload_mut().unwrap();
        turnstile.coins = 11;
        turnstile.max = 10;
    }
    let do_runs = machine.payload().unwrap().do_runs;

    machine.trigger_event("insertCoin").unwrap();

    assert_eq!(machine.current_state(), Some(&named("locked")));
    assert_eq!(machine.transition_log().len(), 1);
    assert_eq!(machine.payload().unwrap().do_runs, do_runs + 1);
}

#[test]
fn unconfigured_event_is_a_no_op() {
    let mut machine = turnstile(None);
    machine.start().unwrap();

    machine.trigger_event("kick").unwrap();
    machine.trigger_event("__START__").unwrap();

    assert_eq!(machine.current_state(), Some(&named("locked")));
    assert_eq!(machine.transition_log().len(), 1);
}

fn workflow() -> StateMachine<()> {
    StateMachineBuilder::new()
        .state("Input")
        .and_then(|b| b.state("Validation"))
        .and_then(|b| b.state("Confirmation"))
        .and_then(|b| b.state("Registration"))
        .and_then(|b| b.state("Success"))
        .and_then(|b| b.start_at("Input"))
        .and_then(|b| b.add_transition("Input", "next", "Validation"))
        .and_then(|b| b.add_transition("Validation", "valid", "Confirmation"))
        .and_then(|b| b.add_transition("Confirmation", "next", "Registration"))
        .and_then(|b| b.add_transition("Registration", "next", "Success"))
        .and_then(|b| b.add_transition("Success", "next", StateId::Final))
        .and_then(|b| b.build())
        .unwrap()
}

#[test]
fn linear_workflow_ends_in_final() {
    init_tracing();
    let mut machine = workflow();
    machine.start().unwrap();

    for event in ["next", "valid", "next", "next", "next"] {
        machine.trigger_event(event).unwrap();
    }

    let log = machine.transition_log();
    assert_eq!(log.len(), 6);
    assert_eq!(log.last().unwrap().to, StateId::Final);
    assert!(machine.is_ended());

    let err = machine.trigger_event("next").unwrap_err();
    assert!(matches!(err, MachineError::AlreadyShutdown));
    assert_eq!(machine.current_state(), Some(&StateId::Final));
    assert_eq!(machine.transition_log().len(), 6);
}

#[test]
fn events_queued_behind_final_are_discarded() {
    let mut machine = StateMachineBuilder::<()>::new()
        .state("open")
        .and_then(|b| b.start_at("open"))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("open")
                    .on("close")
                    .to(StateId::Final)
                    .action(|ctx| {
                        ctx.trigger_event("again");
                        Ok(())
                    }),
            )
        })
        .and_then(|b| b.build())
        .unwrap();
    machine.start().unwrap();

    let err = machine.trigger_event("close").unwrap_err();

    assert!(matches!(err, MachineError::AlreadyShutdown));
    assert_eq!(machine.current_state(), Some(&StateId::Final));
    assert_eq!(machine.pending_events().count(), 0);
}

fn region(start: &str, event: &str) -> StateMachine<()> {
    StateMachineBuilder::new()
        .state(start)
        .and_then(|b| b.start_at(start))
        .and_then(|b| b.add_transition(start, event, StateId::Final))
        .and_then(|b| b.build())
        .unwrap()
}

fn order_machine(auto_start: bool) -> StateMachine<()> {
    StateMachineBuilder::new()
        .state("FillOrder")
        .and_then(|b| b.fork("FORK"))
        .and_then(|b| {
            b.add_state(
                StateBuilder::new("ProcessOrder")
                    .region("AcceptOrder", region("accepting", "accept"))
                    .region("ShipOrder", region("shipping", "ship")),
            )
        })
        .and_then(|b| b.join("JOIN"))
        .and_then(|b| b.state("CloseOrder"))
        .and_then(|b| b.start_at("FillOrder"))
        .and_then(|b| b.add_transition("FillOrder", "next", "FORK"))
        .and_then(|b| b.completion("FORK", "ProcessOrder"))
        .and_then(|b| b.add_transition("ProcessOrder", "done", "JOIN"))
        .and_then(|b| b.completion("JOIN", "CloseOrder"))
        .and_then(|b| b.auto_start_regions(auto_start).build())
        .unwrap()
}

#[test]
fn fork_join_waits_for_every_region() {
    init_tracing();
    let mut machine = order_machine(true);
    machine.start().unwrap();

    machine.trigger_event("next").unwrap();
    assert_eq!(machine.current_state(), Some(&named("ProcessOrder")));
    assert_eq!(
        machine.region("AcceptOrder").unwrap().current_state(),
        Some(&named("accepting"))
    );
    assert_eq!(
        machine.region("ShipOrder").unwrap().current_state(),
        Some(&named("shipping"))
    );

    machine.trigger_region_event("AcceptOrder", "accept").unwrap();
    assert!(machine.region("AcceptOrder").unwrap().is_ended());
    assert_eq!(machine.current_state(), Some(&named("ProcessOrder")));

    machine.trigger_region_event("ShipOrder", "ship").unwrap();
    assert_eq!(machine.current_state(), Some(&named("CloseOrder")));
    assert_eq!(
        path(&machine),
        vec!["__INITIAL__", "FillOrder", "FORK", "ProcessOrder", "JOIN", "CloseOrder"]
    );
}

#[test]
fn join_is_vetoed_while_regions_run() {
    let mut machine = order_machine(true);
    machine.start().unwrap();
    machine.trigger_event("next").unwrap();

    machine.trigger_event("done").unwrap();

    assert_eq!(machine.current_state(), Some(&named("ProcessOrder")));
}

#[test]
fn region_events_need_an_active_owner() {
    let mut machine = order_machine(true);
    machine.start().unwrap();

    let err = machine.trigger_region_event("AcceptOrder", "accept").unwrap_err();
    assert!(matches!(err, MachineError::RegionNotActive { .. }));

    let err = machine.trigger_region_event("Billing", "bill").unwrap_err();
    assert!(matches!(err, MachineError::RegionNotFound { .. }));
}

#[test]
fn region_errors_are_wrapped() {
    let mut machine = order_machine(true);
    machine.start().unwrap();
    machine.trigger_event("next").unwrap();
    machine.trigger_region_event("AcceptOrder", "accept").unwrap();

    let err = machine.trigger_region_event("AcceptOrder", "accept").unwrap_err();
    match err {
        MachineError::Region { region, source } => {
            assert_eq!(region, "AcceptOrder");
            assert!(matches!(*source, MachineError::AlreadyShutdown));
        }
        other => panic!("expected a region error, got {other:?}"),
    }
}

#[test]
fn regions_can_be_started_by_hand() {
    let mut machine = order_machine(false);
    machine.start().unwrap();
    machine.trigger_event("next").unwrap();
    assert_eq!(machine.region("ShipOrder").unwrap().status(), MachineStatus::NotStarted);

    machine.start_region("AcceptOrder").unwrap();
    machine.start_region("ShipOrder").unwrap();
    machine.trigger_region_event("ShipOrder", "ship").unwrap();
    machine.trigger_region_event("AcceptOrder", "accept").unwrap();

    assert_eq!(machine.current_state(), Some(&named("CloseOrder")));
}

fn nested(inner_event: &str) -> StateMachine<()> {
    let inner = region("x", inner_event);
    StateMachineBuilder::new()
        .add_state(StateBuilder::new("Inner").region("inner", inner))
        .and_then(|b| b.join("INNER_JOIN"))
        .and_then(|b| b.start_at("Inner"))
        .and_then(|b| b.add_transition("Inner", "done", "INNER_JOIN"))
        .and_then(|b| b.completion("INNER_JOIN", StateId::Final))
        .and_then(|b| b.build())
        .unwrap()
}

fn three_levels() -> StateMachine<()> {
    StateMachineBuilder::new()
        .add_state(StateBuilder::new("Outer").region("outer", nested("finish")))
        .and_then(|b| b.join("JOIN"))
        .and_then(|b| b.state("Closed"))
        .and_then(|b| b.start_at("Outer"))
        .and_then(|b| b.add_transition("Outer", "done", "JOIN"))
        .and_then(|b| b.completion("JOIN", "Closed"))
        .and_then(|b| b.build())
        .unwrap()
}

#[test]
fn nested_regions_start_and_join_through_every_level() {
    init_tracing();
    let mut top = three_levels();
    top.start().unwrap();
    assert_eq!(
        top.region_at(&["outer", "inner"]).unwrap().current_state(),
        Some(&named("x"))
    );

    let err = top.trigger_region_event("inner", "finish").unwrap_err();
    assert!(matches!(err, MachineError::RegionNotFound { .. }));

    top.trigger_region_path(&["outer", "inner"], "finish").unwrap();

    assert!(top.region_at(&["outer", "inner"]).unwrap().is_ended());
    assert!(top.region("outer").unwrap().is_ended());
    assert_eq!(top.current_state(), Some(&named("Closed")));
    assert_eq!(path(&top), vec!["__INITIAL__", "Outer", "JOIN", "Closed"]);
}

#[test]
fn nested_region_errors_are_wrapped_per_level() {
    let mut top = three_levels();
    top.start().unwrap();

    let err = top.trigger_region_path(&["outer", "missing"], "finish").unwrap_err();

    match err {
        MachineError::Region { region, source } => {
            assert_eq!(region, "outer");
            assert!(matches!(*source, MachineError::RegionNotFound { .. }));
        }
        other => panic!("expected a region error, got {other:?}"),
    }
    assert_eq!(top.current_state(), Some(&named("Outer")));
}

#[test]
fn nested_regions_can_be_started_by_hand() {
    let mut top = StateMachineBuilder::<()>::new()
        .add_state(StateBuilder::new("Outer").region("outer", nested("finish")))
        .and_then(|b| b.join("JOIN"))
        .and_then(|b| b.start_at("Outer"))
        .and_then(|b| b.add_transition("Outer", "done", "JOIN"))
        .and_then(|b| b.completion("JOIN", StateId::Final))
        .and_then(|b| b.auto_start_regions(false).build())
        .unwrap();
    top.start().unwrap();
    assert_eq!(top.region("outer").unwrap().status(), MachineStatus::NotStarted);

    top.start_region_path(&["outer"]).unwrap();
    assert_eq!(
        top.region_at(&["outer", "inner"]).unwrap().current_state(),
        Some(&named("x"))
    );

    top.trigger_region_path(&["outer", "inner"], "finish").unwrap();
    assert!(top.is_ended());
}

fn count_do(seen: &Arc<Mutex<Vec<String>>>) -> impl Fn(&mut CallbackContext<'_, ()>) -> Result<(), CallbackError> {
    let seen = Arc::clone(seen);
    move |ctx| {
        let state = ctx.current_state().map(ToString::to_string).unwrap_or_default();
        seen.lock().unwrap().push(state);
        Ok(())
    }
}

#[test]
fn do_runs_once_per_settled_position_through_fork_and_join() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut machine = StateMachineBuilder::new()
        .add_state(StateBuilder::new("FillOrder").on_do(count_do(&seen)))
        .and_then(|b| b.fork("FORK"))
        .and_then(|b| {
            b.add_state(
                StateBuilder::new("ProcessOrder")
                    .on_do(count_do(&seen))
                    .region("AcceptOrder", region("accepting", "accept"))
                    .region("ShipOrder", region("shipping", "ship")),
            )
        })
        .and_then(|b| b.join("JOIN"))
        .and_then(|b| b.add_state(StateBuilder::new("CloseOrder").on_do(count_do(&seen))))
        .and_then(|b| b.start_at("FillOrder"))
        .and_then(|b| b.add_transition("FillOrder", "next", "FORK"))
        .and_then(|b| b.completion("FORK", "ProcessOrder"))
        .and_then(|b| b.add_transition("ProcessOrder", "done", "JOIN"))
        .and_then(|b| b.completion("JOIN", "CloseOrder"))
        .and_then(|b| b.build())
        .unwrap();

    machine.start().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["FillOrder"]);

    machine.trigger_event("next").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["FillOrder", "ProcessOrder"]);

    machine.trigger_region_event("AcceptOrder", "accept").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["FillOrder", "ProcessOrder"]);

    machine.trigger_region_event("ShipOrder", "ship").unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["FillOrder", "ProcessOrder", "CloseOrder"]
    );
    assert_eq!(machine.current_state(), Some(&named("CloseOrder")));
}

#[test]
fn failing_entry_action_leaves_the_source_in_place() {
    init_tracing();
    let mut machine = StateMachineBuilder::<()>::new()
        .state("a")
        .and_then(|b| b.add_state(StateBuilder::new("b").on_entry(|_| Err("boom".into()))))
        .and_then(|b| b.state("c"))
        .and_then(|b| b.start_at("a"))
        .and_then(|b| b.add_transition("a", "go", "b"))
        .and_then(|b| b.add_transition("a", "skip", "c"))
        .and_then(|b| b.add_transition("b", "go", "c"))
        .and_then(|b| b.build())
        .unwrap();
    machine.start().unwrap();

    let err = machine.trigger_event("go").unwrap_err();

    assert!(matches!(err, MachineError::ActionFailed { ref event, .. } if event == &EventId::Entry));
    assert_eq!(machine.current_state(), Some(&named("a")));
    assert_eq!(machine.previous_state(), Some(&StateId::Initial));
    assert!(machine.state(&named("a")).unwrap().has_token());
    assert!(!machine.state(&named("b")).unwrap().has_token());
    assert_eq!(machine.transition_log().len(), 1);

    machine.trigger_event("go").unwrap_err();
    machine.trigger_event("skip").unwrap();

    let log = machine.transition_log();
    for pair in log.entries().windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
    assert_eq!(path(&machine), vec!["__INITIAL__", "a", "c"]);
}

#[test]
fn nested_triggers_drain_in_fifo_order() {
    init_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut machine = StateMachineBuilder::<()>::new()
        .state("a")
        .and_then(|b| b.state("b"))
        .and_then(|b| b.state("c"))
        .and_then(|b| b.state("d"))
        .and_then(|b| b.start_at("a"))
        .and_then(|b| {
            b.transition(TransitionBuilder::new().from("a").on("go").to("b").action(|ctx| {
                ctx.trigger_event("first");
                ctx.queue_event("second");
                Ok(())
            }))
        })
        .and_then(|b| b.add_transition("b", "first", "c"))
        .and_then(|b| b.add_transition("c", "second", "d"))
        .and_then(|b| {
            b.observer(move |n: &Notification<'_>| {
                if matches!(n.phase, Phase::Process | Phase::Do) {
                    let state = n.state.map(ToString::to_string).unwrap_or_default();
                    sink.lock().unwrap().push(format!("{:?} {} {}", n.phase, n.event, state));
                }
            })
            .build()
        })
        .unwrap();

    machine.start().unwrap();
    seen.lock().unwrap().clear();
    machine.trigger_event("go").unwrap();

    assert_eq!(machine.current_state(), Some(&named("d")));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "Process go a",
            "Do __DO__ b",
            "Process first b",
            "Do __DO__ c",
            "Process second c",
            "Do __DO__ d",
        ]
    );
}

#[test]
fn failing_exit_action_aborts_the_drain() {
    init_tracing();
    let mut machine = StateMachineBuilder::<()>::new()
        .add_state(StateBuilder::new("a").on_exit(|_| Err("exit failed".into())))
        .and_then(|b| b.state("b"))
        .and_then(|b| b.start_at("a"))
        .and_then(|b| b.add_transition("a", "go", "b"))
        .and_then(|b| b.build())
        .unwrap();
    machine.start().unwrap();
    machine.queue_event("later").unwrap();

    let err = machine.trigger_event("go").unwrap_err();

    match &err {
        MachineError::ActionFailed { event, source } => {
            assert_eq!(event, &EventId::Exit);
            assert_eq!(source.to_string(), "exit failed");
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert_eq!(machine.current_state(), Some(&named("a")));
    assert!(machine.state(&named("a")).unwrap().has_token());
    assert_eq!(machine.pending_events().count(), 0);
    assert_eq!(machine.transition_log().len(), 1);
}

#[test]
fn failing_guard_surfaces_the_event() {
    let mut machine = StateMachineBuilder::<()>::new()
        .state("a")
        .and_then(|b| b.state("b"))
        .and_then(|b| b.start_at("a"))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("a")
                    .on("go")
                    .to("b")
                    .when(|_| Err("lookup failed".into())),
            )
        })
        .and_then(|b| b.build())
        .unwrap();
    machine.start().unwrap();

    let err = machine.trigger_event("go").unwrap_err();

    assert!(matches!(err, MachineError::GuardFailed { ref event, .. } if event == &EventId::custom("go")));
    assert_eq!(machine.current_state(), Some(&named("a")));
}

#[test]
fn subscribers_see_every_step_in_order() {
    let steps = Arc::new(Mutex::new(Vec::new()));
    let runner_steps = Arc::clone(&steps);
    let first_steps = Arc::clone(&steps);
    let second_steps = Arc::clone(&steps);

    let mut machine = StateMachineBuilder::<()>::new()
        .state("locked")
        .and_then(|b| b.state("unlocked"))
        .and_then(|b| b.start_at("locked"))
        .and_then(|b| b.add_transition("locked", "coin", "unlocked"))
        .and_then(|b| {
            b.action_fn(move |ctx| {
                runner_steps.lock().unwrap().push(format!("run {}", ctx.event()));
                Ok(())
            })
            .guard_fn(move |ctx| {
                first_steps.lock().unwrap().push(format!("first {}", ctx.event()));
                Ok(ctx.event() != &EventId::custom("coin"))
            })
            .guard_fn(move |ctx| {
                second_steps.lock().unwrap().push(format!("second {}", ctx.event()));
                Ok(true)
            })
            .build()
        })
        .unwrap();

    machine.start().unwrap();
    assert_eq!(
        *steps.lock().unwrap(),
        vec![
            "first __START__",
            "second __START__",
            "run __START__",
            "run __ENTRY__",
            "run __DO__",
        ]
    );

    steps.lock().unwrap().clear();
    machine.trigger_event("coin").unwrap();
    assert_eq!(*steps.lock().unwrap(), vec!["first coin", "run __DO__"]);
    assert_eq!(machine.current_state(), Some(&named("locked")));
}

#[test]
fn runaway_self_triggering_hits_the_event_limit() {
    let mut machine = StateMachineBuilder::<()>::new()
        .state("spinning")
        .and_then(|b| b.start_at("spinning"))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("spinning")
                    .on("spin")
                    .to("spinning")
                    .action(|ctx| {
                        ctx.trigger_event("spin");
                        Ok(())
                    }),
            )
        })
        .and_then(|b| b.max_events_per_drain(5).build())
        .unwrap();
    machine.start().unwrap();

    let err = machine.trigger_event("spin").unwrap_err();

    assert!(matches!(err, MachineError::EventLimitExceeded { limit: 5 }));
    assert_eq!(machine.transition_log().len(), 6);
    assert_eq!(machine.pending_events().count(), 0);
}

#[test]
fn checkpoint_excludes_payload() {
    let mut machine = turnstile(None);
    machine.start().unwrap();
    machine.trigger_event("insertCoin").unwrap();

    let json = checkpoint::to_json(&machine).unwrap();
    let restored = Checkpoint::<Turnstile>::from_json(&json)
        .unwrap()
        .restore(&CallbackRegistry::new())
        .unwrap();

    assert!(machine.payload().is_some());
    assert!(restored.payload().is_none());
    assert_eq!(restored.current_state(), Some(&named("unlocked")));
    assert_eq!(restored.id(), "turnstile");
}

#[test]
fn plain_serde_round_trip_drops_payload() {
    let mut machine = order_machine(true);
    machine.set_payload(());
    machine.start().unwrap();
    machine.trigger_event("next").unwrap();

    let json = serde_json::to_string(&machine).unwrap();
    let back: StateMachine<()> = serde_json::from_str(&json).unwrap();

    assert!(back.payload().is_none());
    assert_eq!(back.current_state(), Some(&named("ProcessOrder")));
    assert_eq!(
        back.region("AcceptOrder").unwrap().current_state(),
        Some(&named("accepting"))
    );
}

#[test]
fn unknown_callback_name_is_not_callable() {
    let result = StateMachineBuilder::<()>::new()
        .state("a")
        .and_then(|b| b.start_at("a"))
        .and_then(|b| {
            b.transition(
                TransitionBuilder::new()
                    .from("a")
                    .on("go")
                    .to("a")
                    .action_named("not_registered"),
            )
        })
        .and_then(|b| b.build());

    assert_eq!(
        result.err(),
        Some(BuildError::ActionNotCallable {
            name: "not_registered".into()
        })
    );
}
