//! Bulk generation of intrinsic declarations from parameter grids.

mod expand;
mod grid;
mod validator;

pub use expand::{expand, ExpansionReport, Template};
pub use grid::{combinations, Combination, GridParameter};
pub use intrin_iface::GenerationContext;
pub use validator::Validator;
