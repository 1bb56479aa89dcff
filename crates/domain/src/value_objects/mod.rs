//! Value objects - immutable, validated domain primitives

pub mod chat_id;
pub mod pace;
pub mod selection_token;
pub mod time_picker;

pub use chat_id::ChatId;
pub use pace::Pace;
pub use selection_token::SelectionToken;
pub use time_picker::TimePicker;
