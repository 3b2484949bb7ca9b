//! Domain layer - Business logic and domain models

pub mod day_ref;
pub mod entry;
pub mod hashtags;
pub mod markdown;
pub mod message;
pub mod session;
pub mod settings;

pub use day_ref::DayReference;
pub use entry::DailyEntry;
pub use message::{Message, Role};
pub use session::SessionKind;
pub use settings::Settings;
