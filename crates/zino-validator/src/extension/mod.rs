//! Extension traits for JSON values and TOML tables.

mod json_object;
mod json_value;
mod toml_table;

pub use json_object::JsonObjectExt;
pub use json_value::JsonValueExt;
pub use toml_table::TomlTableExt;
