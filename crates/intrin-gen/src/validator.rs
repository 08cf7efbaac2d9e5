use std::fmt;

use intrin_constraint::{BoundArguments, ConstraintExpr};
use intrin_core::{is_truthy, IntrinError, Value};

type Check<'a> = Box<dyn Fn(&BoundArguments) -> Result<bool, IntrinError> + 'a>;

/// Predicate deciding whether a combination is expanded. A falsy outcome
/// skips the combination; an error aborts the expansion.
pub struct Validator<'a> {
    label: String,
    check: Check<'a>,
}

impl<'a> Validator<'a> {
    pub fn new<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&BoundArguments) -> bool + 'a,
    {
        Self {
            label: label.into(),
            check: Box::new(move |args: &BoundArguments| Ok::<_, IntrinError>(check(args))),
        }
    }

    /// Validator whose dynamic result is reduced by truthiness.
    pub fn from_value_fn<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&BoundArguments) -> Value + 'a,
    {
        Self {
            label: label.into(),
            check: Box::new(move |args: &BoundArguments| {
                Ok::<_, IntrinError>(is_truthy(&check(args)))
            }),
        }
    }

    pub fn from_expr(expr: ConstraintExpr) -> Self {
        Self {
            label: expr.to_string(),
            check: Box::new(move |args: &BoundArguments| expr.holds(args)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn accepts(&self, args: &BoundArguments) -> Result<bool, IntrinError> {
        (self.check)(args)
    }
}

impl fmt::Debug for Validator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl From<ConstraintExpr> for Validator<'_> {
    fn from(expr: ConstraintExpr) -> Self {
        Self::from_expr(expr)
    }
}
