use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use intrin_core::{codes, compare_values, is_truthy, kind_name, value_label, values_equal};
use intrin_core::{ErrorInfo, IntrinError, Value};
use serde::{Deserialize, Serialize};

/// Comparison operator carried by a [`ConstraintExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Eq => "==",
            ConstraintOp::Neq => "!=",
            ConstraintOp::Lt => "<",
            ConstraintOp::Le => "<=",
            ConstraintOp::Gt => ">",
            ConstraintOp::Ge => ">=",
        }
    }

    /// Applies the operator with host comparison semantics.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Result<bool, IntrinError> {
        match self {
            ConstraintOp::Eq => Ok(values_equal(lhs, rhs)),
            ConstraintOp::Neq => Ok(!values_equal(lhs, rhs)),
            ordering => {
                let ord = compare_values(lhs, rhs).ok_or_else(|| {
                    IntrinError::Constraint(
                        ErrorInfo::new(
                            codes::INCOMPARABLE,
                            format!(
                                "'{}' not supported between {} and {}",
                                ordering.symbol(),
                                kind_name(lhs),
                                kind_name(rhs)
                            ),
                        )
                        .with_context("lhs", value_label(lhs))
                        .with_context("rhs", value_label(rhs)),
                    )
                })?;
                Ok(match ordering {
                    ConstraintOp::Lt => ord.is_lt(),
                    ConstraintOp::Le => ord.is_le(),
                    ConstraintOp::Gt => ord.is_gt(),
                    _ => ord.is_ge(),
                })
            }
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Name lookup used while evaluating constraint variables.
pub trait Context {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl Context for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Context for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Context for serde_json::Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Operand of a constraint: a literal, a named parameter, or a nested
/// comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ConstraintValue {
    Constant(Value),
    Variable(String),
    Expression(Box<ConstraintExpr>),
}

impl ConstraintValue {
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> Result<Value, IntrinError> {
        match self {
            ConstraintValue::Constant(value) => Ok(value.clone()),
            ConstraintValue::Variable(name) => context.lookup(name).cloned().ok_or_else(|| {
                IntrinError::Constraint(
                    ErrorInfo::new(
                        codes::UNBOUND_VARIABLE,
                        format!("constraint variable '{name}' is not bound"),
                    )
                    .with_context("variable", name.clone()),
                )
            }),
            ConstraintValue::Expression(expr) => expr.evaluate(context),
        }
    }

    pub fn equals(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Eq, rhs)
    }

    pub fn not_equals(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Neq, rhs)
    }

    pub fn lt(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Lt, rhs)
    }

    pub fn le(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Le, rhs)
    }

    pub fn gt(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Gt, rhs)
    }

    pub fn ge(self, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
        ConstraintExpr::new(self, ConstraintOp::Ge, rhs)
    }

    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            ConstraintValue::Constant(_) => {}
            ConstraintValue::Variable(name) => {
                out.insert(name.as_str());
            }
            ConstraintValue::Expression(expr) => {
                expr.lhs.collect_variables(out);
                expr.rhs.collect_variables(out);
            }
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintValue::Constant(value) => f.write_str(&value_label(value)),
            ConstraintValue::Variable(name) => f.write_str(name),
            ConstraintValue::Expression(expr) => write!(f, "{expr}"),
        }
    }
}

impl From<Value> for ConstraintValue {
    fn from(value: Value) -> Self {
        ConstraintValue::Constant(value)
    }
}

impl From<ConstraintExpr> for ConstraintValue {
    fn from(expr: ConstraintExpr) -> Self {
        ConstraintValue::Expression(Box::new(expr))
    }
}

macro_rules! literal_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ConstraintValue {
                fn from(value: $ty) -> Self {
                    ConstraintValue::Constant(Value::from(value))
                }
            }
        )*
    };
}

literal_operand!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, &str, String);

/// A comparison between two operands; the unit attached to functions as a
/// constraint and accepted by generator validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintExpr {
    lhs: ConstraintValue,
    op: ConstraintOp,
    rhs: ConstraintValue,
}

impl ConstraintExpr {
    pub fn new(
        lhs: impl Into<ConstraintValue>,
        op: ConstraintOp,
        rhs: impl Into<ConstraintValue>,
    ) -> Self {
        Self {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    pub fn lhs(&self) -> &ConstraintValue {
        &self.lhs
    }

    pub fn op(&self) -> ConstraintOp {
        self.op
    }

    pub fn rhs(&self) -> &ConstraintValue {
        &self.rhs
    }

    /// Evaluates both operands and returns the comparison as `Value::Bool`.
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> Result<Value, IntrinError> {
        let lhs = self.lhs.evaluate(context)?;
        let rhs = self.rhs.evaluate(context)?;
        Ok(Value::Bool(self.op.apply(&lhs, &rhs)?))
    }

    /// Evaluates the expression and reduces the result to its truthiness.
    pub fn holds<C: Context + ?Sized>(&self, context: &C) -> Result<bool, IntrinError> {
        self.evaluate(context).map(|value| is_truthy(&value))
    }

    /// Names of every variable referenced anywhere in the tree.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.lhs.collect_variables(&mut out);
        self.rhs.collect_variables(&mut out);
        out
    }
}

impl fmt::Display for ConstraintExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// Refers to a parameter by name.
pub fn var(name: impl Into<String>) -> ConstraintValue {
    ConstraintValue::Variable(name.into())
}

pub fn constant(value: impl Into<Value>) -> ConstraintValue {
    ConstraintValue::Constant(value.into())
}

pub fn eq(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Eq, rhs)
}

pub fn ne(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Neq, rhs)
}

pub fn lt(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Lt, rhs)
}

pub fn le(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Le, rhs)
}

pub fn gt(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Gt, rhs)
}

pub fn ge(lhs: impl Into<ConstraintValue>, rhs: impl Into<ConstraintValue>) -> ConstraintExpr {
    ConstraintExpr::new(lhs, ConstraintOp::Ge, rhs)
}
