pub mod csv;
pub mod identity;
pub mod rows;

pub use csv::{parse_csv, tokenize_line};
pub use identity::{is_truthy, normalize_identity};
pub use rows::{
    Filtered, app_candidate, expand_user_row, expand_user_rows, filter_apps, filter_user_apps,
};
