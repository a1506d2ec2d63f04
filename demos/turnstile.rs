//! Turnstile State Machine
//!
//! This example demonstrates a guarded, payload-carrying machine.
//!
//! Key concepts:
//! - Transition actions with side effects on the payload
//! - A guard that vetoes a transition without leaving the state
//! - A do action that runs after every processed event
//! - The transition log as an audit trail
//!
//! Run with: cargo run --example turnstile

use tracing::Level;
use waypoint::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
use waypoint::core::Guard;

#[derive(Debug, Default)]
struct Gate {
    coins: u32,
    max_coins: u32,
    alarms: u32,
    ticks: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    println!("=== Turnstile State Machine ===\n");

    let mut turnstile = StateMachineBuilder::<Gate>::new()
        .id("turnstile-1")
        .add_state(StateBuilder::<Gate>::new("locked").on_do(|ctx| {
            if let Some(gate) = ctx.payload_mut() {
                gate.ticks += 1;
            }
            Ok(())
        }))?
        .state("unlocked")?
        .start_at("locked")?
        .transition(
            TransitionBuilder::<Gate>::new()
                .from("locked")
                .on("insertCoin")
                .to("unlocked")
                .guard(Guard::payload(|gate: &Gate| gate.coins < gate.max_coins))
                .action(|ctx| {
                    if let Some(gate) = ctx.payload_mut() {
                        gate.coins += 1;
                    }
                    Ok(())
                }),
        )?
        .transition(
            TransitionBuilder::<Gate>::new()
                .from("locked")
                .on("pass")
                .to("locked")
                .action(|ctx| {
                    if let Some(gate) = ctx.payload_mut() {
                        gate.alarms += 1;
                    }
                    Ok(())
                }),
        )?
        .add_transition("unlocked", "pass", "locked")?
        .payload(Gate {
            max_coins: 2,
            ..Gate::default()
        })
        .build()?;

    turnstile.start()?;
    for event in ["pass", "insertCoin", "pass", "insertCoin", "pass", "insertCoin"] {
        turnstile.trigger_event(event)?;
        println!("{event:>10} -> {:?}", turnstile.current_state());
    }

    println!("\nTransition log:");
    for entry in turnstile.transition_log() {
        println!("  {} --{}--> {}", entry.from, entry.event, entry.to);
    }

    println!("\nFinal payload: {:?}", turnstile.payload());
    println!("\n=== Example Complete ===");
    Ok(())
}
