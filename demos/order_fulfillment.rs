//! Order Fulfillment
//!
//! This demo models an order lifecycle whose states are plain Rust structs.
//!
//! Key concepts:
//! - Shapes derived from serde types with `typed`
//! - Actions written against domain types with `typed_action`
//! - Services injected through the environment
//! - Action failures carrying their cause
//!
//! Run with: cargo run --example order_fulfillment

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stillwater::prelude::*;
use tracing_subscriber::EnvFilter;
use waypoint::schema::typed;
use waypoint::{label_enum, ActionError, Definition, TransitionBuilder};

label_enum! {
    enum Order {
        Placed,
        Paid,
        Shipped,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Placed {
    id: u64,
    items: Vec<String>,
    total_cents: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Paid {
    id: u64,
    items: Vec<String>,
    total_cents: u64,
    transaction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Shipped {
    id: u64,
    transaction: String,
    tracking: String,
}

#[derive(Deserialize)]
struct Payment {
    card: String,
}

#[derive(Deserialize)]
struct Shipment {
    address: String,
}

trait PaymentGateway: Send + Sync {
    fn charge(&self, card: &str, cents: u64) -> Result<String, String>;
}

struct MockGateway {
    next_id: AtomicU64,
}

impl PaymentGateway for MockGateway {
    fn charge(&self, card: &str, cents: u64) -> Result<String, String> {
        if card.starts_with("0000") {
            return Err(format!("card {card} declined"));
        }
        println!("  [Payment] Charged ${:.2}", cents as f64 / 100.0);
        Ok(format!("TXN-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

#[derive(Clone)]
struct Services {
    payments: Arc<dyn PaymentGateway>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct GatewayError(String);

fn orders() -> Result<Definition<Services>, Box<dyn std::error::Error>> {
    let definition = Definition::<Services>::default()
        .add_state(Order::Placed, typed::<Placed>())?
        .add_state(Order::Paid, typed::<Paid>())?
        .add_state(Order::Shipped, typed::<Shipped>())?
        .add_transition(
            TransitionBuilder::new("pay")
                .from(Order::Placed)
                .to(Order::Paid)
                .typed_action(|order: Placed, payment: Payment| {
                    from_fn(move |services: &Services| {
                        services
                            .payments
                            .charge(&payment.card, order.total_cents)
                            .map(|transaction| Paid {
                                id: order.id,
                                items: order.items.clone(),
                                total_cents: order.total_cents,
                                transaction,
                            })
                            .map_err(|e| ActionError::with_source("payment failed", GatewayError(e)))
                    })
                    .boxed()
                }),
        )?
        .add_transition(
            TransitionBuilder::new("ship")
                .from(Order::Paid)
                .to(Order::Shipped)
                .typed_action(|order: Paid, shipment: Shipment| {
                    println!("  [Shipping] {} item(s) to {}", order.items.len(), shipment.address);
                    pure(Shipped {
                        id: order.id,
                        transaction: order.transaction,
                        tracking: format!("TRACK-{}", order.id * 1000),
                    })
                    .boxed()
                }),
        )?;

    Ok(definition)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Order Fulfillment ===\n");

    let orders = orders()?;
    let services = Services {
        payments: Arc::new(MockGateway {
            next_id: AtomicU64::new(1),
        }),
    };

    let placed = orders.parse_state(
        Order::Placed,
        &json!({"id": 7, "items": ["book", "lamp"], "total_cents": 4599}),
    )?;
    println!("Placed: {}", placed.data());

    let paid = placed
        .execute_with("pay", json!({"card": "4242-4242"}), &services)
        .await?;
    println!("Paid: {}", paid.data());

    let shipped = paid
        .execute_with("ship", json!({"address": "1 Main St"}), &services)
        .await?;
    let final_order: Shipped = shipped.data_as()?;
    println!("Shipped: {final_order:?}");
    tracing::info!(order = final_order.id, state = %shipped.state(), "order complete");

    println!("\n=== Declined card ===\n");

    match placed
        .execute_with("pay", json!({"card": "0000-0000"}), &services)
        .await
    {
        Err(err) => {
            println!("[{}] {err}", err.error_code());
            let mut cause = std::error::Error::source(&err);
            while let Some(inner) = cause {
                println!("  caused by: {inner}");
                cause = inner.source();
            }
            println!("Order is still {}", placed.state());
        }
        Ok(instance) => println!("unexpected: {instance:?}"),
    }

    Ok(())
}
