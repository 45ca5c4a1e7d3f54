pub mod email_text;
pub mod schedule;
pub mod text;

pub use email_text::{SplitEmail, split_generated_email};
pub use schedule::{ScheduleDefaults, ScheduleRequest, interpret};
pub use text::{capitalize, title_case};
