use intrin_core::{codes, ErrorInfo, IntrinError};
use tracing::debug;

use crate::expr::ConstraintExpr;
use crate::signature::{BoundArguments, CallArgs, Signature};

const VIOLATION_PREFIX: &str = "unsatisfied constraint(s): ";

/// Column at which continuation lines of a violation message start, so that
/// every failed constraint lines up under the first one when the error is
/// displayed as `constraint error: unsatisfied constraint(s): ...`.
pub const VIOLATION_INDENT: usize = "constraint error: ".len() + VIOLATION_PREFIX.len();

/// A named callable together with its declared parameters.
#[derive(Debug, Clone)]
pub struct Function<F> {
    name: String,
    signature: Signature,
    body: F,
}

impl<F> Function<F> {
    pub fn new(name: impl Into<String>, signature: Signature, body: F) -> Self {
        Self {
            name: name.into(),
            signature,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Binds the arguments and runs the body without any checks.
    pub fn call<R>(&self, args: &CallArgs) -> Result<R, IntrinError>
    where
        F: Fn(&BoundArguments) -> R,
    {
        let bound = self.signature.bind(args)?;
        Ok((self.body)(&bound))
    }

    /// Attaches the first constraint, installing the checking wrapper.
    pub fn constraint(self, expr: ConstraintExpr) -> ConstrainedFn<F> {
        ConstrainedFn {
            inner: self,
            constraints: vec![expr],
        }
    }
}

/// A [`Function`] whose every invocation is gated by its attached
/// constraints. There is exactly one wrapper per function; further
/// constraints extend its list.
#[derive(Debug, Clone)]
pub struct ConstrainedFn<F> {
    inner: Function<F>,
    constraints: Vec<ConstraintExpr>,
}

impl<F> ConstrainedFn<F> {
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    pub fn constraints(&self) -> &[ConstraintExpr] {
        &self.constraints
    }

    pub fn constraint(mut self, expr: ConstraintExpr) -> Self {
        self.constraints.push(expr);
        self
    }

    /// Evaluates every constraint against `bound` and reports all failures
    /// together.
    pub fn check(&self, bound: &BoundArguments) -> Result<(), IntrinError> {
        let mut failed = Vec::new();
        for expr in &self.constraints {
            if !expr.holds(bound)? {
                failed.push(expr.to_string());
            }
        }
        debug!(
            function = %self.inner.name,
            checked = self.constraints.len(),
            failed = failed.len(),
            "constraints evaluated"
        );
        if failed.is_empty() {
            return Ok(());
        }
        let separator = format!(",\n{}", " ".repeat(VIOLATION_INDENT));
        Err(IntrinError::Constraint(
            ErrorInfo::new(
                codes::CONSTRAINT_VIOLATION,
                format!("{VIOLATION_PREFIX}{}", failed.join(&separator)),
            )
            .with_context("function", self.inner.name.clone())
            .with_context("arguments", bound.describe())
            .with_details(failed),
        ))
    }

    /// Binds, checks, and only then runs the wrapped body.
    pub fn call<R>(&self, args: &CallArgs) -> Result<R, IntrinError>
    where
        F: Fn(&BoundArguments) -> R,
    {
        let bound = self.inner.signature.bind(args)?;
        self.check(&bound)?;
        Ok((self.inner.body)(&bound))
    }

    pub fn into_inner(self) -> Function<F> {
        self.inner
    }
}

/// Attaching a constraint to either a plain or an already-checked function.
pub trait Constrain<F> {
    fn constrain(self, expr: ConstraintExpr) -> ConstrainedFn<F>;
}

impl<F> Constrain<F> for Function<F> {
    fn constrain(self, expr: ConstraintExpr) -> ConstrainedFn<F> {
        self.constraint(expr)
    }
}

impl<F> Constrain<F> for ConstrainedFn<F> {
    fn constrain(self, expr: ConstraintExpr) -> ConstrainedFn<F> {
        self.constraint(expr)
    }
}

/// Attaches `expr` to `target`. Applying it repeatedly never nests wrappers.
pub fn constraint<F, T>(expr: ConstraintExpr, target: T) -> ConstrainedFn<F>
where
    T: Constrain<F>,
{
    target.constrain(expr)
}
