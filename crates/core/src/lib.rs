pub mod draft;
pub mod formatter;
pub mod guide;
pub mod models;

pub use draft::{Action, DateRange, DraftError, TripDraft};
pub use formatter::{format_response, inline_spans, DisplayBlock, InlineSpan, LINE_RULES};
pub use guide::TravelGuideData;
pub use models::*;
