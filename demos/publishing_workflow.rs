//! Blog Publishing Workflow
//!
//! This demo walks a post from draft to publication.
//!
//! Key concepts:
//! - Per-state shapes (Draft -> Review -> Published)
//! - Label enums for state and transition names
//! - An environment supplying the publication time
//! - Every failure kind surfaced to the caller
//!
//! Run with: cargo run --example publishing_workflow

use serde_json::{json, Value};
use stillwater::prelude::*;
use tracing_subscriber::EnvFilter;
use waypoint::schema::{FieldType, ObjectShape};
use waypoint::{label_enum, merge_transition, Definition, FsmError, TransitionBuilder};

label_enum! {
    enum Post {
        Draft,
        Review,
        Published,
    }
}

label_enum! {
    enum Step {
        Submit,
        Reject,
        Publish,
    }
}

#[derive(Clone)]
struct Clock {
    now: u64,
}

fn blog() -> Result<Definition<Clock>, Box<dyn std::error::Error>> {
    let draft = ObjectShape::new()
        .field("title", FieldType::String)
        .field("body", FieldType::String)
        .refine("title must not be empty", |data| {
            data["title"].as_str().is_some_and(|t| !t.trim().is_empty())
        });
    let review = draft.clone().field("reviewer", FieldType::String);
    let published = draft.clone().field("publishedAt", FieldType::Integer);

    let definition = Definition::<Clock>::default()
        .add_state(Post::Draft, draft)?
        .add_state(Post::Review, review)?
        .add_state(Post::Published, published)?
        .add_transition(merge_transition(Step::Submit, Post::Draft, Post::Review))?
        .add_transition(merge_transition(Step::Reject, Post::Review, Post::Draft))?
        .add_transition(
            TransitionBuilder::new(Step::Publish)
                .from(Post::Review)
                .to(Post::Published)
                .action(|data: Value, _payload: Value| {
                    from_fn(move |clock: &Clock| {
                        let mut next = data.clone();
                        next["publishedAt"] = json!(clock.now);
                        Ok(next)
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
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    println!("=== Blog Publishing Workflow ===\n");

    let blog = blog()?;
    let clock = Clock { now: 1_700_000_000 };

    let post = blog.parse(&json!({
        "state": "Draft",
        "title": "Typed state machines",
        "body": "Each state owns its data.",
    }))?;
    println!("Parsed: {} {}", post.state(), post.data());
    println!("Available: {:?}", post.available_transitions());

    let review = post
        .execute_with(Step::Submit, json!({"reviewer": "sam"}), &clock)
        .await?;
    println!("Submitted: {} {}", review.state(), review.data());

    let live = review.execute_with(Step::Publish, Value::Null, &clock).await?;
    println!("Published: {}", live.to_tagged().unwrap_or_default());
    println!("Original post is still {}", post.state());

    println!("\n=== Failures ===\n");

    match live.execute_with(Step::Publish, Value::Null, &clock).await {
        Err(err @ FsmError::UnknownTransition { .. }) => println!("[{}] {err}", err.error_code()),
        other => println!("unexpected: {other:?}"),
    }

    match blog.parse(&json!({"state": "Scheduled", "title": "Later"})) {
        Err(err) => println!("[{}] {err}", err.error_code()),
        Ok(instance) => println!("unexpected: {instance:?}"),
    }

    match blog.parse_state(Post::Draft, &json!({"title": 7})) {
        Err(err) => {
            println!("[{}] {err}", err.error_code());
            if let Some(validation) = err.as_validation() {
                for issue in &validation.issues {
                    println!("  - {issue}");
                }
            }
        }
        Ok(instance) => println!("unexpected: {instance:?}"),
    }

    Ok(())
}
