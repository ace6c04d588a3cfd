mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use yatra_assistant::{RequestState, TripAssistant};
use yatra_core::{Action, DateRange, DisplayBlock, DraftError};
use yatra_gateway::RequestGateway;
use yatra_observability::AppMetrics;

use common::{gateway_for, spawn_backend};

fn text(value: &str) -> String {
    value.to_string()
}

async fn assistant() -> (TripAssistant<RequestGateway>, Arc<AppMetrics>) {
    let base = spawn_backend().await;
    let metrics = AppMetrics::shared();
    (
        TripAssistant::new(Arc::new(gateway_for(&base)), metrics.clone()),
        metrics,
    )
}

#[tokio::test]
async fn complete_trip_plan_renders_blocks() {
    let (assistant, metrics) = assistant().await;
    let dates = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date"),
    )
    .expect("ordered range");
    assistant.update_draft(|draft| {
        draft
            .with_origin("Delhi")
            .with_destination("Rishikesh")
            .with_dates(Some(dates))
    });

    let state = assistant
        .dispatch(Action::CompleteTripPlan, &CancellationToken::new())
        .await
        .expect("draft is complete");

    let expected = vec![
        DisplayBlock::Heading(text("Trip to Rishikesh")),
        DisplayBlock::Subheading(text("From Delhi")),
        DisplayBlock::Bullet(text("Mode: train")),
        DisplayBlock::Bullet(text("Dates: 2025-03-01 to 2025-03-03")),
        DisplayBlock::DayMarker(text("Day 1: Arrive after 3 days of planning")),
        DisplayBlock::CostLine(text("Budget: ₹5000 (medium)")),
    ];
    assert_eq!(
        state,
        RequestState::Success {
            action: Action::CompleteTripPlan,
            blocks: expected.clone(),
        }
    );
    assert_eq!(
        assistant.sections().get(&Action::CompleteTripPlan),
        Some(&expected)
    );

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_total, 1);
    assert_eq!(snapshot.blocks_rendered_total, expected.len() as u64);
}

#[tokio::test]
async fn plan_without_origin_is_blocked_locally() {
    let (assistant, metrics) = assistant().await;
    assistant.update_draft(|draft| draft.with_destination("Rishikesh"));

    let result = assistant
        .dispatch(Action::CompleteTripPlan, &CancellationToken::new())
        .await;

    assert_eq!(result, Err(DraftError::MissingEndpoints));
    assert_eq!(assistant.state().request, RequestState::Idle);
    assert_eq!(metrics.snapshot().requests_total, 0);
    assert_eq!(metrics.snapshot().validation_rejects_total, 1);
}

#[tokio::test]
async fn failed_action_can_be_retried() {
    let (assistant, metrics) = assistant().await;
    assistant.update_draft(|draft| draft.with_destination("Munnar"));
    let cancel = CancellationToken::new();

    let first = assistant
        .dispatch(Action::Stay, &cancel)
        .await
        .expect("draft is complete");
    assert!(matches!(
        first,
        RequestState::Failure { action: Action::Stay, ref message }
            if message.starts_with("Stay options failed: 500")
    ));

    let second = assistant
        .retry(&cancel)
        .await
        .expect("an action was attempted")
        .expect("draft is complete");
    assert!(matches!(second, RequestState::Failure { .. }));
    assert_eq!(metrics.snapshot().failures_total, 2);
    assert!(assistant.sections().is_empty());
}

#[tokio::test]
async fn travel_guide_categories_become_sections() {
    let (assistant, _) = assistant().await;
    assistant.update_draft(|draft| draft.with_destination("Varanasi").with_days("2"));

    let state = assistant
        .dispatch(Action::TravelGuide, &CancellationToken::new())
        .await
        .expect("draft is complete");

    let RequestState::Success { blocks, .. } = state else {
        panic!("expected success, got {state:?}");
    };
    assert_eq!(
        blocks,
        vec![
            DisplayBlock::Heading(text("Itinerary")),
            DisplayBlock::DayMarker(text("Day 1: Ghats at dawn")),
            DisplayBlock::Spacer,
            DisplayBlock::Heading(text("Food")),
            DisplayBlock::Bullet(text("Kachori Sabzi")),
        ]
    );
}

#[tokio::test]
async fn sections_accumulate_across_actions() {
    let (assistant, _) = assistant().await;
    assistant.update_draft(|draft| draft.with_destination("Goa"));
    let cancel = CancellationToken::new();

    assistant
        .dispatch(Action::Weather, &cancel)
        .await
        .expect("draft is complete");
    assistant
        .dispatch(Action::PopularDestinations, &cancel)
        .await
        .expect("no input needed");

    let sections = assistant.sections();
    assert_eq!(
        sections.get(&Action::Weather),
        Some(&vec![DisplayBlock::Paragraph(text("Weather in Goa: 31°C"))])
    );
    assert_eq!(
        sections.get(&Action::PopularDestinations).map(Vec::len),
        Some(3)
    );
    assert_eq!(assistant.state().last_action, Some(Action::PopularDestinations));
}
