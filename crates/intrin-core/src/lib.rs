#![deny(missing_docs)]
#![doc = "Core error taxonomy and dynamic runtime values shared by the intrin crates."]

pub mod errors;
mod serde;
pub mod value;

pub use errors::{codes, ErrorInfo, IntrinError};
pub use serde::{from_json_slice, to_canonical_json_bytes};
pub use value::{
    as_count, compare_values, is_truthy, kind_name, name_label, value_label, values_equal, Value,
};
