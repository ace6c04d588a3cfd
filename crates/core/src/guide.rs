//! Structured payloads returned under `data` by the travel-guide, weather and
//! budget endpoints, rendered back to text the formatter understands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelGuideData {
    pub attractions: Option<Vec<Attraction>>,
    pub accommodation: Option<Vec<Accommodation>>,
    pub food: Option<Vec<Restaurant>>,
    pub transport: Option<Vec<Transport>>,
    pub itinerary: Option<Vec<ItineraryDay>>,
    pub shopping: Option<Vec<ShoppingPlace>>,
    pub culture: Option<Vec<CulturalSite>>,
    pub budget_breakdown: Option<BudgetBreakdown>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub activities: Vec<String>,
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accommodation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price_range: String,
    pub rating: Option<f64>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attraction {
    pub name: String,
    pub description: String,
    pub category: String,
    pub rating: Option<f64>,
    pub entry_fee: Option<String>,
    pub timings: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub price_range: String,
    pub rating: Option<f64>,
    pub speciality: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transport {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShoppingPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub special_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CulturalSite {
    pub name: String,
    pub description: String,
    pub significance: String,
    pub visiting_hours: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetBreakdown {
    pub accommodation: String,
    pub food: String,
    pub transport: String,
    pub activities: String,
    pub shopping: String,
    pub total: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherData {
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
    pub forecast: Option<Vec<DayForecast>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayForecast {
    pub date: String,
    pub temperature: String,
    pub condition: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetData {
    pub total_estimate: String,
    pub per_person_per_day: String,
    pub breakdown: Option<BudgetBreakdown>,
}

impl TravelGuideData {
    pub fn is_empty(&self) -> bool {
        self.attractions.is_none()
            && self.accommodation.is_none()
            && self.food.is_none()
            && self.transport.is_none()
            && self.itinerary.is_none()
            && self.shopping.is_none()
            && self.culture.is_none()
            && self.budget_breakdown.is_none()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if let Some(days) = &self.itinerary {
            section(&mut out, "Itinerary");
            for day in days {
                let _ = writeln!(out, "Day {}: {}", day.day, day.title);
                for activity in &day.activities {
                    let _ = writeln!(out, "* {activity}");
                }
                if let Some(cost) = &day.estimated_cost {
                    let _ = writeln!(out, "Estimated Cost: {cost}");
                }
            }
        }

        if let Some(attractions) = &self.attractions {
            section(&mut out, "Attractions");
            for attraction in attractions {
                let _ = writeln!(out, "**{}**", attraction.name);
                line_if_present(&mut out, &attraction.description);
                bullet_if_present(&mut out, "Category", Some(&attraction.category));
                bullet_if_present(&mut out, "Entry fee", attraction.entry_fee.as_ref());
                bullet_if_present(&mut out, "Timings", attraction.timings.as_ref());
                rating(&mut out, attraction.rating);
            }
        }

        if let Some(food) = &self.food {
            section(&mut out, "Food & Restaurants");
            for place in food {
                let _ = writeln!(out, "**{}**", place.name);
                bullet_if_present(&mut out, "Cuisine", Some(&place.cuisine));
                bullet_if_present(&mut out, "Price range", Some(&place.price_range));
                bullet_if_present(&mut out, "Speciality", place.speciality.as_ref());
                rating(&mut out, place.rating);
            }
        }

        if let Some(stays) = &self.accommodation {
            section(&mut out, "Stay Options");
            for stay in stays {
                let _ = writeln!(out, "**{}**", stay.name);
                bullet_if_present(&mut out, "Type", Some(&stay.kind));
                bullet_if_present(&mut out, "Price range", Some(&stay.price_range));
                if let Some(amenities) = stay.amenities.as_ref().filter(|a| !a.is_empty()) {
                    let _ = writeln!(out, "* Amenities: {}", amenities.join(", "));
                }
                rating(&mut out, stay.rating);
            }
        }

        if let Some(transport) = &self.transport {
            section(&mut out, "Local Transport");
            for option in transport {
                let _ = writeln!(out, "* {}: {}", option.kind, option.description);
                if let Some(cost) = &option.estimated_cost {
                    let _ = writeln!(out, "Estimated Cost: {cost}");
                }
            }
        }

        if let Some(shopping) = &self.shopping {
            section(&mut out, "Markets");
            for place in shopping {
                let _ = writeln!(out, "**{}**", place.name);
                line_if_present(&mut out, &place.description);
                if let Some(items) = place.special_items.as_ref().filter(|i| !i.is_empty()) {
                    let _ = writeln!(out, "* Look for: {}", items.join(", "));
                }
            }
        }

        if let Some(sites) = &self.culture {
            section(&mut out, "Culture");
            for site in sites {
                let _ = writeln!(out, "**{}**", site.name);
                line_if_present(&mut out, &site.description);
                bullet_if_present(&mut out, "Significance", Some(&site.significance));
                bullet_if_present(&mut out, "Visiting hours", site.visiting_hours.as_ref());
            }
        }

        if let Some(breakdown) = &self.budget_breakdown {
            section(&mut out, "Budget Breakdown");
            breakdown.write_lines(&mut out);
        }

        out.trim_end().to_string()
    }
}

impl BudgetBreakdown {
    fn write_lines(&self, out: &mut String) {
        bullet_if_present(out, "Accommodation", Some(&self.accommodation));
        bullet_if_present(out, "Food", Some(&self.food));
        bullet_if_present(out, "Transport", Some(&self.transport));
        bullet_if_present(out, "Activities", Some(&self.activities));
        bullet_if_present(out, "Shopping", Some(&self.shopping));
        if !self.total.trim().is_empty() {
            let _ = writeln!(out, "Total Budget: {}", self.total);
        }
    }
}

impl WeatherData {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        section(&mut out, "Weather");
        bullet_if_present(&mut out, "Temperature", Some(&self.temperature));
        bullet_if_present(&mut out, "Condition", Some(&self.condition));
        bullet_if_present(&mut out, "Humidity", Some(&self.humidity));
        bullet_if_present(&mut out, "Wind", Some(&self.wind_speed));

        if let Some(forecast) = self.forecast.as_ref().filter(|f| !f.is_empty()) {
            let _ = writeln!(out, "**Forecast**");
            for day in forecast {
                let _ = writeln!(out, "* {}: {}, {}", day.date, day.temperature, day.condition);
            }
        }

        out.trim_end().to_string()
    }
}

impl BudgetData {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        section(&mut out, "Budget Estimate");
        let _ = writeln!(out, "Total Budget: {}", self.total_estimate);
        if !self.per_person_per_day.trim().is_empty() {
            let _ = writeln!(out, "Cost per person per day: {}", self.per_person_per_day);
        }
        if let Some(breakdown) = &self.breakdown {
            breakdown.write_lines(&mut out);
        }

        out.trim_end().to_string()
    }
}

/// Best-effort text for a `data` payload. `None` when nothing displayable is
/// present.
pub fn render_data(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| format!("* {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => {
            if map.contains_key("temperature") {
                serde_json::from_value::<WeatherData>(value.clone())
                    .map(|weather| weather.to_markdown())
                    .unwrap_or_default()
            } else if map.contains_key("totalEstimate") {
                serde_json::from_value::<BudgetData>(value.clone())
                    .map(|budget| budget.to_markdown())
                    .unwrap_or_default()
            } else {
                match serde_json::from_value::<TravelGuideData>(value.clone()) {
                    Ok(guide) if !guide.is_empty() => guide.to_markdown(),
                    _ => render_category_map(map),
                }
            }
        }
        _ => String::new(),
    };

    (!rendered.trim().is_empty()).then_some(rendered)
}

/// Order the travel-guide route generates its categories in.
const GUIDE_CATEGORY_ORDER: [&str; 7] = [
    "itinerary",
    "attractions",
    "food",
    "accommodation",
    "transport",
    "shopping",
    "culture",
];

/// The backend's travel guide ships each category as a block of text keyed by
/// name; nested values such as `metadata` are skipped. Known categories come
/// first in guide order, any others follow by key.
fn render_category_map(map: &serde_json::Map<String, Value>) -> String {
    let known = GUIDE_CATEGORY_ORDER
        .iter()
        .filter_map(|key| map.get(*key).map(|value| (*key, value)));
    let extra = map
        .iter()
        .map(|(key, value)| (key.as_str(), value))
        .filter(|(key, _)| !GUIDE_CATEGORY_ORDER.contains(key));

    let mut out = String::new();
    for (key, value) in known.chain(extra) {
        let Some(text) = value.as_str().filter(|text| !text.trim().is_empty()) else {
            continue;
        };
        section(&mut out, &title_case(key));
        let _ = writeln!(out, "{}", text.trim());
    }

    out.trim_end().to_string()
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "## {title}");
}

fn line_if_present(out: &mut String, text: &str) {
    if !text.trim().is_empty() {
        let _ = writeln!(out, "{}", text.trim());
    }
}

fn bullet_if_present(out: &mut String, label: &str, value: Option<&String>) {
    if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
        let _ = writeln!(out, "* {label}: {}", value.trim());
    }
}

fn rating(out: &mut String, rating: Option<f64>) {
    if let Some(rating) = rating {
        let _ = writeln!(out, "* Rating: {rating:.1}");
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
