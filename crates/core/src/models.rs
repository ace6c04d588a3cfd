use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::guide;

/// Text shown when a successful response carries no usable payload.
pub const NO_DATA_FOUND: &str = "No Data Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl Budget {
    /// Unknown tiers collapse to `Medium`, mirroring the backend validator.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" | "budget" | "cheap" => Self::Low,
            "high" | "luxury" | "premium" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickInfoCategory {
    Food,
    Attractions,
    Accommodation,
    Itinerary,
    Transport,
    Shopping,
    Culture,
}

impl QuickInfoCategory {
    pub const ALL: [QuickInfoCategory; 7] = [
        Self::Food,
        Self::Attractions,
        Self::Accommodation,
        Self::Itinerary,
        Self::Transport,
        Self::Shopping,
        Self::Culture,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "food" | "restaurants" => Some(Self::Food),
            "attractions" | "sights" => Some(Self::Attractions),
            "accommodation" | "stay" | "hotels" => Some(Self::Accommodation),
            "itinerary" => Some(Self::Itinerary),
            "transport" | "conveyance" => Some(Self::Transport),
            "shopping" | "markets" => Some(Self::Shopping),
            "culture" => Some(Self::Culture),
            _ => None,
        }
    }

    pub fn as_path(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Attractions => "attractions",
            Self::Accommodation => "accommodation",
            Self::Itinerary => "itinerary",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Culture => "culture",
        }
    }
}

impl fmt::Display for QuickInfoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTripParams {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_mode: Option<String>,
}

impl PlanTripParams {
    pub fn for_location(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            origin: None,
            days: None,
            budget: None,
            interests: None,
            travel_dates: None,
            preferred_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelGuideParams {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

/// One fixed remote action together with the fields it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    HealthCheck,
    PlanTrip(PlanTripParams),
    Itinerary {
        location: String,
        days: u32,
    },
    StayOptions {
        location: String,
    },
    LocalConveyance {
        location: String,
    },
    NearbyAttractions {
        location: String,
    },
    Markets {
        location: String,
    },
    FoodRestaurants {
        location: String,
    },
    ThingsToDo {
        location: String,
    },
    TravelGuide(TravelGuideParams),
    QuickInfo {
        category: QuickInfoCategory,
        location: String,
        days: Option<u32>,
        budget: Option<Budget>,
    },
    PopularDestinations,
    Weather {
        location: String,
    },
    BudgetEstimate {
        location: String,
        days: u32,
        travelers: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    PlanTrip(PlanTripParams),
    TravelGuide(TravelGuideParams),
}

/// Transport-agnostic description of the HTTP call an operation maps to.
/// `segments` are unencoded path segments relative to the base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<RequestBody>,
}

impl RouteSpec {
    fn get(segments: &[&str]) -> Self {
        Self {
            method: HttpMethod::Get,
            segments: segments.iter().map(|segment| segment.to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    fn post(segment: &str, body: RequestBody) -> Self {
        Self {
            method: HttpMethod::Post,
            segments: vec![segment.to_string()],
            query: Vec::new(),
            body: Some(body),
        }
    }

    fn with_query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

impl Operation {
    pub fn route(&self) -> RouteSpec {
        match self {
            Self::HealthCheck => RouteSpec::get(&[]),
            Self::PlanTrip(params) => {
                RouteSpec::post("plan-trip", RequestBody::PlanTrip(params.clone()))
            }
            Self::Itinerary { location, days } => RouteSpec::get(&["itinerary"])
                .with_query("location", location)
                .with_query("days", days),
            Self::StayOptions { location } => {
                RouteSpec::get(&["stay-options"]).with_query("location", location)
            }
            Self::LocalConveyance { location } => {
                RouteSpec::get(&["local-conveyance"]).with_query("location", location)
            }
            Self::NearbyAttractions { location } => {
                RouteSpec::get(&["nearby-attractions"]).with_query("location", location)
            }
            Self::Markets { location } => {
                RouteSpec::get(&["markets"]).with_query("location", location)
            }
            Self::FoodRestaurants { location } => {
                RouteSpec::get(&["food-restaurants"]).with_query("location", location)
            }
            Self::ThingsToDo { location } => {
                RouteSpec::get(&["things-to-do"]).with_query("location", location)
            }
            Self::TravelGuide(params) => {
                RouteSpec::post("travel-guide", RequestBody::TravelGuide(params.clone()))
            }
            Self::QuickInfo {
                category,
                location,
                days,
                budget,
            } => {
                let mut route = RouteSpec::get(&["quick-info", category.as_path()])
                    .with_query("location", location);
                if let Some(days) = days {
                    route = route.with_query("days", days);
                }
                if let Some(budget) = budget {
                    route = route.with_query("budget", budget.as_str());
                }
                route
            }
            Self::PopularDestinations => RouteSpec::get(&["destinations", "popular"]),
            Self::Weather { location } => RouteSpec::get(&["weather", location.as_str()]),
            Self::BudgetEstimate {
                location,
                days,
                travelers,
            } => RouteSpec::get(&["budget-estimate", location.as_str()])
                .with_query("days", days)
                .with_query("travelers", travelers),
        }
    }

    /// Human name used as the prefix of failure messages.
    pub fn label(&self) -> String {
        match self {
            Self::HealthCheck => "Health check".to_string(),
            Self::PlanTrip(_) => "Plan trip".to_string(),
            Self::Itinerary { .. } => "Itinerary".to_string(),
            Self::StayOptions { .. } => "Stay options".to_string(),
            Self::LocalConveyance { .. } => "Local conveyance".to_string(),
            Self::NearbyAttractions { .. } => "Attractions".to_string(),
            Self::Markets { .. } => "Markets".to_string(),
            Self::FoodRestaurants { .. } => "Food restaurants".to_string(),
            Self::ThingsToDo { .. } => "Things to do".to_string(),
            Self::TravelGuide(_) => "Travel guide".to_string(),
            Self::QuickInfo { category, .. } => format!("Quick info ({category})"),
            Self::PopularDestinations => "Popular destinations".to_string(),
            Self::Weather { .. } => "Weather".to_string(),
            Self::BudgetEstimate { .. } => "Budget estimate".to_string(),
        }
    }

    /// Stable identifier for logs and metrics.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::HealthCheck => "health_check",
            Self::PlanTrip(_) => "plan_trip",
            Self::Itinerary { .. } => "itinerary",
            Self::StayOptions { .. } => "stay_options",
            Self::LocalConveyance { .. } => "local_conveyance",
            Self::NearbyAttractions { .. } => "nearby_attractions",
            Self::Markets { .. } => "markets",
            Self::FoodRestaurants { .. } => "food_restaurants",
            Self::ThingsToDo { .. } => "things_to_do",
            Self::TravelGuide(_) => "travel_guide",
            Self::QuickInfo { .. } => "quick_info",
            Self::PopularDestinations => "popular_destinations",
            Self::Weather { .. } => "weather",
            Self::BudgetEstimate { .. } => "budget_estimate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum RequestResult {
    Success(String),
    Failure(String),
}

impl RequestResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Failure(message) => Err(message),
        }
    }
}

/// Tolerant superset of every response body the travel backend returns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiEnvelope {
    pub fn display_text(&self) -> String {
        if let Some(text) = non_blank(self.response.as_deref()) {
            return text.to_string();
        }

        if let Some(text) = self.data.as_ref().and_then(guide::render_data) {
            return text;
        }

        if let Some(text) = non_blank(self.message.as_deref()) {
            return text.to_string();
        }

        NO_DATA_FOUND.to_string()
    }

    /// Server-reported failure inside a 2xx body.
    pub fn rejection(&self) -> Option<&str> {
        if self.success == Some(false) {
            non_blank(self.error.as_deref())
        } else {
            None
        }
    }

    pub fn detail_text(&self) -> Option<String> {
        let detail = match self.detail.as_ref() {
            Some(Value::String(text)) => non_blank(Some(text)).map(ToString::to_string),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        detail.or_else(|| non_blank(self.error.as_deref()).map(ToString::to_string))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
