//! Constraint expression trees and constraint-checked invocation.
//!
//! Constraints are comparisons over a callable's parameter names, built with
//! [`var`], [`constant`] and the comparison builders. They are attached to a
//! [`Function`] with [`constraint`] and checked on every call; a call that
//! violates any of them fails with every violation listed and never reaches
//! the function body.

mod checked;
mod expr;
mod signature;

pub use checked::{constraint, Constrain, ConstrainedFn, Function, VIOLATION_INDENT};
pub use expr::{
    constant, eq, ge, gt, le, lt, ne, var, ConstraintExpr, ConstraintOp, ConstraintValue, Context,
};
pub use signature::{BoundArguments, CallArgs, Param, ParamKind, Signature};
