//! Daily digest composition.
//!
//! Turns a forecast day plus a subscriber's personality and language into
//! the weather section of the daily email, and assembles the full brief with
//! countdown and name day lines. No I/O happens here apart from loading
//! optional message and name day files at startup.

mod advice;
mod catalog;
mod compose;
mod condition;
mod countdown;
mod error;
mod locale;
mod nameday;

pub use advice::{advice_for, clothing_advice};
pub use catalog::{MessageCatalog, MESSAGES_FILE};
pub use compose::{compose, compose_brief, BriefInput, DailyBrief};
pub use condition::{classify, Condition};
pub use countdown::{next_occurrence, render_countdown, render_countdowns};
pub use error::{DigestError, Result};
pub use locale::{Language, Personality, Strings};
pub use nameday::{NamedayCalendar, Namedays, NAMEDAYS_FILE};
