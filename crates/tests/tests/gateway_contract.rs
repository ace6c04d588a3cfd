mod common;

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use yatra_core::{
    Budget, Operation, PlanTripParams, QuickInfoCategory, RequestResult, NO_DATA_FOUND,
};
use yatra_gateway::{GatewayConfig, RequestGateway};

use common::{dead_address, gateway_for, spawn_backend};

fn location(name: &str) -> String {
    name.to_string()
}

#[tokio::test]
async fn health_check_reads_the_status_message() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway.invoke(&Operation::HealthCheck).await;

    assert_eq!(
        result,
        RequestResult::Success("Travel Recommendation API is running!".to_string())
    );
}

#[tokio::test]
async fn plan_trip_sends_every_draft_field() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let params = PlanTripParams {
        origin: Some(location("Mumbai")),
        days: Some(5),
        budget: Some(Budget::High),
        travel_dates: Some("2025-02-10 to 2025-02-14".to_string()),
        preferred_mode: Some("flight".to_string()),
        ..PlanTripParams::for_location("Goa")
    };

    let text = gateway
        .invoke(&Operation::PlanTrip(params))
        .await
        .into_result()
        .expect("plan trip succeeds");

    assert!(text.starts_with("## Trip to Goa"));
    assert!(text.contains("**From Mumbai**"));
    assert!(text.contains("* Mode: flight"));
    assert!(text.contains("* Dates: 2025-02-10 to 2025-02-14"));
    assert!(text.contains("after 5 days"));
    assert!(text.contains("Budget: ₹5000 (high)"));
}

#[tokio::test]
async fn itinerary_passes_location_and_days_as_query() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::Itinerary {
            location: location("Jaisalmer"),
            days: 4,
        })
        .await;

    assert_eq!(
        result.text(),
        "## 4-day itinerary for Jaisalmer\nDay 1: Fort walk"
    );
}

#[tokio::test]
async fn non_success_status_names_the_operation_and_status() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::StayOptions {
            location: location("Ooty"),
        })
        .await;

    let RequestResult::Failure(message) = result else {
        panic!("expected failure, got {result:?}");
    };
    assert!(message.starts_with("Stay options failed: 500"), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[tokio::test]
async fn missing_payload_becomes_placeholder() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::FoodRestaurants {
            location: location("Kochi"),
        })
        .await;

    assert_eq!(result, RequestResult::Success(NO_DATA_FOUND.to_string()));
}

#[tokio::test]
async fn empty_body_becomes_placeholder() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::LocalConveyance {
            location: location("Pune"),
        })
        .await;

    assert_eq!(result, RequestResult::Success(NO_DATA_FOUND.to_string()));
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::Markets {
            location: location("Jaipur"),
        })
        .await;

    let RequestResult::Failure(message) = result else {
        panic!("expected failure, got {result:?}");
    };
    assert!(
        message.starts_with("Markets failed: unreadable response"),
        "{message}"
    );
}

#[tokio::test]
async fn explicit_rejection_surfaces_the_server_error() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway
        .invoke(&Operation::ThingsToDo {
            location: location("Leh"),
        })
        .await;

    assert_eq!(
        result,
        RequestResult::Failure("Things to do failed: quota exhausted".to_string())
    );
}

#[tokio::test]
async fn path_parameters_are_percent_encoded() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let weather = gateway
        .invoke(&Operation::Weather {
            location: location("New Delhi"),
        })
        .await;
    let budget = gateway
        .invoke(&Operation::BudgetEstimate {
            location: location("New Delhi"),
            days: 3,
            travelers: 2,
        })
        .await;

    assert_eq!(weather.text(), "Weather in New Delhi: 31°C");
    assert_eq!(budget.text(), "Budget for New Delhi: 2 travelers x 3 days");
}

#[tokio::test]
async fn popular_destinations_needs_no_input() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let result = gateway.invoke(&Operation::PopularDestinations).await;

    assert_eq!(result.text(), "* Goa\n* Manali\n* Varanasi");
}

#[tokio::test]
async fn quick_info_batch_keeps_partial_failures() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);

    let results = gateway
        .quick_info_all("Udaipur", Some(2), Some(Budget::Low), &CancellationToken::new())
        .await;

    assert_eq!(results.len(), QuickInfoCategory::ALL.len());
    assert_eq!(results.values().filter(|result| result.is_success()).count(), 6);

    let shopping = &results[&QuickInfoCategory::Shopping];
    assert!(
        matches!(shopping, RequestResult::Failure(message)
            if message.starts_with("Quick info (shopping) failed: 503")
                && message.contains("model overloaded")),
        "{shopping:?}"
    );
    assert_eq!(
        results[&QuickInfoCategory::Food].text(),
        "## food in Udaipur\n* tier low"
    );
}

#[tokio::test]
async fn cancellation_abandons_a_slow_call() {
    let base = spawn_backend().await;
    let gateway = gateway_for(&base);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = gateway
        .invoke_with_cancel(
            &Operation::NearbyAttractions {
                location: location("Hampi"),
            },
            &cancel,
        )
        .await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(
        result,
        RequestResult::Failure("Attractions cancelled".to_string())
    );
}

#[tokio::test]
async fn slow_server_hits_the_request_timeout() {
    let base = spawn_backend().await;
    let config = GatewayConfig::default()
        .with_base_url(&base)
        .with_timeout(Duration::from_millis(200));
    let gateway = RequestGateway::new(&config).expect("gateway builds");

    let result = gateway
        .invoke(&Operation::NearbyAttractions {
            location: location("Hampi"),
        })
        .await;

    let RequestResult::Failure(message) = result else {
        panic!("expected failure, got {result:?}");
    };
    assert!(message.starts_with("Attractions failed:"), "{message}");
    assert!(message.contains("timed out"), "{message}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let base = dead_address().await;
    let gateway = gateway_for(&base);

    let result = gateway.invoke(&Operation::PopularDestinations).await;

    let RequestResult::Failure(message) = result else {
        panic!("expected failure, got {result:?}");
    };
    assert!(
        message.starts_with("Popular destinations failed: network error"),
        "{message}"
    );
}
