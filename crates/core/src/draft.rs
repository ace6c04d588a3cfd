use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Budget, Operation, PlanTripParams, QuickInfoCategory, TravelGuideParams};

const DEFAULT_DAYS: u32 = 3;
const MAX_DAYS: u32 = 14;
const DEFAULT_TRAVELERS: u32 = 1;

/// Validation failures caught before anything is dispatched. `Display` is the
/// prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please enter a destination first")]
    MissingDestination,
    #[error("Please enter both origin and destination")]
    MissingEndpoints,
    #[error("Please enter a whole number for {field} (got \"{value}\")")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Trips can span 1 to 14 days (got {0})")]
    DaysOutOfRange(u32),
    #[error("Return date {to} is before departure date {from}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DraftError> {
        if to < from {
            return Err(DraftError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Inclusive day count.
    pub fn days(&self) -> u32 {
        let span = (self.to - self.from).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// A user-facing action on the trip screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    HealthCheck,
    CompleteTripPlan,
    Itinerary,
    Food,
    Stay,
    LocalTransport,
    Markets,
    ThingsToDo,
    Attractions,
    TravelGuide,
    QuickInfo(QuickInfoCategory),
    PopularDestinations,
    Weather,
    BudgetEstimate,
}

impl Action {
    /// Title of the result card for this action.
    pub fn title(self) -> String {
        match self {
            Self::HealthCheck => "Service Status".to_string(),
            Self::CompleteTripPlan => "Travel Options Summary".to_string(),
            Self::Itinerary => "Itinerary".to_string(),
            Self::Food => "Food & Restaurants".to_string(),
            Self::Stay => "Stay Options".to_string(),
            Self::LocalTransport => "Local Transport".to_string(),
            Self::Markets => "Markets".to_string(),
            Self::ThingsToDo => "Things To Do".to_string(),
            Self::Attractions => "Nearby Attractions".to_string(),
            Self::TravelGuide => "Travel Guide".to_string(),
            Self::QuickInfo(category) => format!("Quick Info: {category}"),
            Self::PopularDestinations => "Popular Destinations".to_string(),
            Self::Weather => "Weather".to_string(),
            Self::BudgetEstimate => "Budget Estimate".to_string(),
        }
    }
}

/// In-progress trip request as typed by the user. Values are kept verbatim;
/// parsing happens in [`TripDraft::operation`]. Setters return a new draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDraft {
    pub origin: String,
    pub destination: String,
    pub dates: Option<DateRange>,
    pub preferred_mode: String,
    pub budget: String,
    pub travelers: String,
    pub days: String,
    pub interests: String,
}

impl Default for TripDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            dates: None,
            preferred_mode: "train".to_string(),
            budget: Budget::Medium.as_str().to_string(),
            travelers: String::new(),
            days: String::new(),
            interests: String::new(),
        }
    }
}

impl TripDraft {
    pub fn with_origin(&self, value: impl Into<String>) -> Self {
        Self {
            origin: value.into(),
            ..self.clone()
        }
    }

    pub fn with_destination(&self, value: impl Into<String>) -> Self {
        Self {
            destination: value.into(),
            ..self.clone()
        }
    }

    pub fn with_dates(&self, dates: Option<DateRange>) -> Self {
        Self {
            dates,
            ..self.clone()
        }
    }

    pub fn with_preferred_mode(&self, value: impl Into<String>) -> Self {
        Self {
            preferred_mode: value.into(),
            ..self.clone()
        }
    }

    pub fn with_budget(&self, value: impl Into<String>) -> Self {
        Self {
            budget: value.into(),
            ..self.clone()
        }
    }

    pub fn with_travelers(&self, value: impl Into<String>) -> Self {
        Self {
            travelers: value.into(),
            ..self.clone()
        }
    }

    pub fn with_days(&self, value: impl Into<String>) -> Self {
        Self {
            days: value.into(),
            ..self.clone()
        }
    }

    pub fn with_interests(&self, value: impl Into<String>) -> Self {
        Self {
            interests: value.into(),
            ..self.clone()
        }
    }

    /// Builds the operation for `action`, or the prompt to show instead of
    /// dispatching.
    pub fn operation(&self, action: Action) -> Result<Operation, DraftError> {
        let operation = match action {
            Action::HealthCheck => Operation::HealthCheck,
            Action::PopularDestinations => Operation::PopularDestinations,
            Action::CompleteTripPlan => {
                let (Some(origin), Some(destination)) =
                    (non_blank(&self.origin), non_blank(&self.destination))
                else {
                    return Err(DraftError::MissingEndpoints);
                };

                Operation::PlanTrip(PlanTripParams {
                    location: destination,
                    origin: Some(origin),
                    days: Some(self.trip_days()?),
                    budget: Some(self.budget_tier()),
                    interests: non_blank(&self.interests),
                    travel_dates: self.dates.map(|dates| dates.to_string()),
                    preferred_mode: non_blank(&self.preferred_mode),
                })
            }
            Action::Itinerary => Operation::Itinerary {
                location: self.location()?,
                days: self.trip_days()?,
            },
            Action::Food => Operation::FoodRestaurants {
                location: self.location()?,
            },
            Action::Stay => Operation::StayOptions {
                location: self.location()?,
            },
            Action::LocalTransport => Operation::LocalConveyance {
                location: self.location()?,
            },
            Action::Markets => Operation::Markets {
                location: self.location()?,
            },
            Action::ThingsToDo => Operation::ThingsToDo {
                location: self.location()?,
            },
            Action::Attractions => Operation::NearbyAttractions {
                location: self.location()?,
            },
            Action::TravelGuide => Operation::TravelGuide(TravelGuideParams {
                location: self.location()?,
                days: Some(self.trip_days()?),
                budget: Some(self.budget_tier()),
                interests: non_blank(&self.interests),
            }),
            Action::QuickInfo(category) => Operation::QuickInfo {
                category,
                location: self.location()?,
                days: Some(self.trip_days()?),
                budget: Some(self.budget_tier()),
            },
            Action::Weather => Operation::Weather {
                location: self.location()?,
            },
            Action::BudgetEstimate => Operation::BudgetEstimate {
                location: self.location()?,
                days: self.trip_days()?,
                travelers: self.traveler_count()?,
            },
        };

        Ok(operation)
    }

    fn location(&self) -> Result<String, DraftError> {
        non_blank(&self.destination).ok_or(DraftError::MissingDestination)
    }

    /// Explicit days win over the date range; both fall back to the default.
    pub fn trip_days(&self) -> Result<u32, DraftError> {
        let days = match non_blank(&self.days) {
            Some(raw) => parse_count("days", &raw)?,
            None => self.dates.map(|dates| dates.days()).unwrap_or(DEFAULT_DAYS),
        };

        if (1..=MAX_DAYS).contains(&days) {
            Ok(days)
        } else {
            Err(DraftError::DaysOutOfRange(days))
        }
    }

    pub fn traveler_count(&self) -> Result<u32, DraftError> {
        match non_blank(&self.travelers) {
            Some(raw) => match parse_count("travelers", &raw)? {
                0 => Err(DraftError::InvalidNumber {
                    field: "travelers",
                    value: raw,
                }),
                count => Ok(count),
            },
            None => Ok(DEFAULT_TRAVELERS),
        }
    }

    pub fn budget_tier(&self) -> Budget {
        Budget::parse(&self.budget)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, DraftError> {
    raw.parse::<u32>().map_err(|_| DraftError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}
