pub mod locale;
pub mod updates;

pub use locale::Locale;
pub use updates::{display_date, render_updates};
