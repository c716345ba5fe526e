pub mod json;

pub use json::{JsonConfig, JsonFormatter, blueprint_to_json, convert_to_json};
