//! Order Fulfillment with Orthogonal Regions
//!
//! This example demonstrates fork/join: after the order is filled, accepting
//! and shipping run as independent regions, and the order closes only once
//! both have finished.
//!
//! Key concepts:
//! - Fork and join pseudo-states driven by completion events
//! - Regions owned by a composite state and addressed by name
//! - Named callbacks resolved from a registry
//! - Checkpointing a machine mid-flight
//!
//! Run with: cargo run --example order_fulfillment

use tracing::Level;
use waypoint::builder::{CallbackRegistry, StateBuilder, StateMachineBuilder};
use waypoint::checkpoint::{self, Checkpoint};
use waypoint::core::StateId;
use waypoint::StateMachine;

fn region(start: &str, event: &str) -> Result<StateMachine<()>, Box<dyn std::error::Error>> {
    let machine = StateMachineBuilder::new()
        .id(start)
        .state(start)?
        .start_at(start)?
        .add_transition(start, event, StateId::Final)?
        .build()?;
    Ok(machine)
}

fn registry() -> CallbackRegistry<()> {
    CallbackRegistry::new()
        .with_action("announce", |ctx| {
            println!("  entering {}", ctx.current_state().map(ToString::to_string).unwrap_or_default());
            Ok(())
        })
        .with_action("farewell", |_| {
            println!("  order closed, thank you");
            Ok(())
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    println!("=== Order Fulfillment ===\n");

    let mut order = StateMachineBuilder::<()>::new()
        .id("order-42")
        .registry(registry())
        .add_state(StateBuilder::new("FillOrder").on_entry_named("announce"))?
        .fork("FORK")?
        .add_state(
            StateBuilder::new("ProcessOrder")
                .on_entry_named("announce")
                .region("AcceptOrder", region("accepting", "accept")?)
                .region("ShipOrder", region("shipping", "ship")?),
        )?
        .join("JOIN")?
        .add_state(StateBuilder::new("CloseOrder").on_entry_named("farewell"))?
        .start_at("FillOrder")?
        .add_transition("FillOrder", "next", "FORK")?
        .completion("FORK", "ProcessOrder")?
        .add_transition("ProcessOrder", "done", "JOIN")?
        .completion("JOIN", "CloseOrder")?
        .build()?;

    println!("Starting order:");
    order.start()?;
    order.trigger_event("next")?;

    for name in ["AcceptOrder", "ShipOrder"] {
        if let Some(region) = order.region(name) {
            println!("  region {name} is at {:?}", region.current_state());
        }
    }

    println!("\nCheckpoint while both regions run:");
    let json = checkpoint::to_json(&order)?;
    println!("{} bytes of JSON", json.len());

    println!("\nAccepting, then shipping:");
    order.trigger_region_event("AcceptOrder", "accept")?;
    println!("  after accept: {:?}", order.current_state());
    order.trigger_region_event("ShipOrder", "ship")?;
    println!("  after ship: {:?}", order.current_state());

    println!("\nResuming the checkpoint and finishing in the other order:");
    let mut resumed = Checkpoint::<()>::from_json(&json)?.restore(&registry())?;
    resumed.trigger_region_event("ShipOrder", "ship")?;
    resumed.trigger_region_event("AcceptOrder", "accept")?;
    println!("  resumed copy is at {:?}", resumed.current_state());

    println!("\nTransition log:");
    for entry in order.transition_log() {
        println!("  {} --{}--> {}", entry.from, entry.event, entry.to);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
