//! Daily module - visit streaks and the paragraph shown each day.
//!
//! - `paragraph` - Numbered reading paragraphs loaded from JSON
//! - `streak` - Calendar-day visit classification and the day plan

mod paragraph;
mod streak;

pub use paragraph::{Paragraph, ParagraphCatalog, ParagraphError, ParagraphLinks, ParagraphText};
pub use streak::{plan_day, DailyPlan, NewDay, VisitGap};
