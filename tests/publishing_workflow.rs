//! End-to-end tests of a blog publishing machine.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use stillwater::prelude::*;
use waypoint::core::Label;
use waypoint::schema::{typed, FieldType, ObjectShape};
use waypoint::{
    carry_transition, label_enum, merge_transition, ActionError, BuildError, Definition,
    FsmError, RegistrationPolicy, TransitionBuilder,
};

label_enum! {
    enum Post {
        Draft,
        Review,
        Published,
        Archived,
    }
}

label_enum! {
    enum Step {
        Submit,
        Approve,
        Reject,
        Archive,
    }
}

fn draft() -> ObjectShape {
    ObjectShape::new().field("title", FieldType::String)
}

fn published() -> ObjectShape {
    draft().field("publishedAt", FieldType::Number)
}

fn blog() -> Definition {
    Definition::new()
        .add_state(Post::Draft, draft())
        .unwrap()
        .add_state(Post::Published, published())
        .unwrap()
        .add_transition(
            TransitionBuilder::new("publish")
                .from(Post::Draft)
                .to(Post::Published)
                .action(|data: Value, payload: Value| {
                    let mut next = data;
                    next["publishedAt"] = payload["publishedAt"].clone();
                    pure(next).boxed()
                }),
        )
        .unwrap()
}

#[tokio::test]
async fn publish_then_publish_again() {
    let post = blog()
        .parse_state("Draft", &json!({"title": "Hi"}))
        .unwrap();

    let live = post
        .execute("publish", json!({"publishedAt": 1000}))
        .await
        .unwrap();
    assert_eq!(live.state(), "Published");
    assert_eq!(live.data(), &json!({"title": "Hi", "publishedAt": 1000}));

    let err = live
        .execute("publish", json!({"publishedAt": 2000}))
        .await
        .unwrap_err();
    assert!(matches!(err, FsmError::UnknownTransition { .. }));
    assert_eq!(
        err.to_string(),
        "unknown transition 'publish' from state 'Published'"
    );
}

#[test]
fn parse_with_unknown_state() {
    let err = blog()
        .parse(&json!({"state": "Unknown", "title": "Hi"}))
        .unwrap_err();

    assert!(matches!(err, FsmError::UnknownState { ref state } if state == "Unknown"));
}

#[test]
fn parse_state_with_wrong_title_type() {
    let err = blog()
        .parse_state("Draft", &json!({"title": 123}))
        .unwrap_err();

    let FsmError::Validation(validation) = &err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(validation.state, "Draft");
    let issue = validation.issues_at("title").next().unwrap();
    assert_eq!(issue.to_string(), "title: expected string, found number");
}

#[tokio::test]
async fn transition_name_is_scoped_to_source_state() {
    let definition = blog()
        .add_state(Post::Archived, published())
        .unwrap()
        .add_transition(carry_transition(Step::Archive, Post::Published, Post::Archived))
        .unwrap();
    let post = definition
        .parse_state(Post::Draft, &json!({"title": "Hi"}))
        .unwrap();

    let err = post.execute(Step::Archive, json!(null)).await.unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_TRANSITION");

    let live = post
        .execute("publish", json!({"publishedAt": 5}))
        .await
        .unwrap();
    let archived = live.execute(Step::Archive, json!(null)).await.unwrap();
    assert_eq!(archived.label::<Post>(), Some(Post::Archived));
    assert!(archived.is_terminal());
}

#[tokio::test]
async fn earlier_definition_does_not_see_later_transitions() {
    let base = blog().add_state(Post::Review, draft()).unwrap();
    let extended = base
        .add_transition(carry_transition(Step::Submit, Post::Draft, Post::Review))
        .unwrap();

    let from_base = base.parse_state("Draft", &json!({"title": "Hi"})).unwrap();
    let from_extended = extended
        .parse_state("Draft", &json!({"title": "Hi"}))
        .unwrap();

    assert!(!from_base.can_execute(Step::Submit));
    assert!(from_extended.can_execute(Step::Submit));
    assert!(from_base.execute(Step::Submit, json!(null)).await.is_err());
    assert!(from_extended
        .execute(Step::Submit, json!(null))
        .await
        .unwrap()
        .is(Post::Review));
}

#[tokio::test]
async fn review_cycle_with_labels() {
    let definition = blog()
        .add_state(Post::Review, draft().optional("notes", FieldType::String))
        .unwrap()
        .add_transition(carry_transition(Step::Submit, Post::Draft, Post::Review))
        .unwrap()
        .add_transition(merge_transition(Step::Reject, Post::Review, Post::Draft))
        .unwrap()
        .add_transition(merge_transition(Step::Approve, Post::Review, Post::Published))
        .unwrap();

    let post = definition
        .parse_state(Post::Draft, &json!({"title": "Hi"}))
        .unwrap();
    let review = post.execute(Step::Submit, json!(null)).await.unwrap();

    let mut names = review.available_transitions();
    names.sort_unstable();
    assert_eq!(names, vec!["Approve", "Reject"]);

    let back = review
        .execute(Step::Reject, json!({"notes": "needs work"}))
        .await
        .unwrap();
    assert!(back.is(Post::Draft));
    assert_eq!(back.data(), &json!({"title": "Hi"}));

    let live = review
        .execute(Step::Approve, json!({"publishedAt": 7}))
        .await
        .unwrap();
    assert_eq!(live.label::<Post>(), Some(Post::Published));
}

#[test]
fn strict_registration_rejects_unregistered_states() {
    let err = blog()
        .add_transition(carry_transition(Step::Archive, Post::Published, Post::Archived))
        .unwrap_err();

    assert_eq!(
        err,
        BuildError::UnknownTargetState {
            transition: "Archive".to_string(),
            state: "Archived".to_string(),
        }
    );
}

#[tokio::test]
async fn deferred_registration_fails_at_execute() {
    let definition = Definition::new()
        .with_policy(RegistrationPolicy::Deferred)
        .add_state(Post::Published, published())
        .unwrap()
        .add_transition(carry_transition(Step::Archive, Post::Published, Post::Archived))
        .unwrap();
    let live = definition
        .parse_state(Post::Published, &json!({"title": "Hi", "publishedAt": 1}))
        .unwrap();

    let err = live.execute(Step::Archive, json!(null)).await.unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_STATE");
    assert!(live.is(Post::Published));
}

#[tokio::test]
async fn action_failure_keeps_its_cause() {
    let definition = blog()
        .add_transition(
            TransitionBuilder::new("publish_scheduled")
                .from(Post::Draft)
                .to(Post::Published)
                .action_fn(|_data, payload| {
                    let at = payload["at"].as_str().unwrap_or_default();
                    at.parse::<u64>()
                        .map(|at| json!({"publishedAt": at}))
                        .map_err(|e| ActionError::with_source("bad schedule", e))
                }),
        )
        .unwrap();
    let post = definition
        .parse_state(Post::Draft, &json!({"title": "Hi"}))
        .unwrap();

    let err = post
        .execute("publish_scheduled", json!({"at": "soon"}))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ACTION_FAILED");
    let action = err.source().unwrap();
    assert_eq!(action.to_string(), "bad schedule");
    assert!(action.source().is_some());
    assert!(post.is(Post::Draft));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Article {
    title: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[test]
fn typed_shape_normalizes_with_serde_defaults() {
    let definition = Definition::new()
        .add_state(Post::Draft, typed::<Article>())
        .unwrap();

    let post = definition
        .parse(&json!({"state": "Draft", "title": "Hi"}))
        .unwrap();

    assert_eq!(post.data(), &json!({"title": "Hi", "tags": []}));
    assert_eq!(
        post.data_as::<Article>().unwrap(),
        Article {
            title: "Hi".to_string(),
            tags: vec![],
        }
    );
    assert_eq!(Post::all().len(), 4);
}
