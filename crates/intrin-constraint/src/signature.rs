//! Declared parameters and host-style argument binding.
//!
//! A [`Signature`] stands in for the parameter list of a callable. Binding a
//! [`CallArgs`] against it yields [`BoundArguments`] in declaration order with
//! defaults filled in; the bound mapping is the context constraints are
//! evaluated against.

use std::collections::BTreeMap;

use intrin_core::{codes, value_label, ErrorInfo, IntrinError, Value};
use serde::{Deserialize, Serialize};

use crate::expr::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
}

impl ParamKind {
    pub fn accepts_positional(self) -> bool {
        !matches!(self, ParamKind::KeywordOnly)
    }

    pub fn accepts_keyword(self) -> bool {
        !matches!(self, ParamKind::PositionalOnly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: None,
        }
    }

    pub fn positional_only(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::PositionalOnly,
            ..Self::new(name)
        }
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::KeywordOnly,
            ..Self::new(name)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered parameter list of a callable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new(params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }

    /// Shorthand for a signature of plain positional-or-keyword parameters.
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Param::new))
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }

    /// Binds call arguments to parameter names, applying declared defaults.
    pub fn bind(&self, args: &CallArgs) -> Result<BoundArguments, IntrinError> {
        let positional: Vec<&Param> = self
            .params
            .iter()
            .filter(|param| param.kind.accepts_positional())
            .collect();
        if args.positional.len() > positional.len() {
            return Err(IntrinError::Binding(
                ErrorInfo::new(
                    codes::TOO_MANY_POSITIONAL,
                    format!(
                        "takes {} positional arguments but {} were given",
                        positional.len(),
                        args.positional.len()
                    ),
                )
                .with_context("expected", positional.len().to_string())
                .with_context("got", args.positional.len().to_string()),
            ));
        }

        let mut assigned: BTreeMap<&str, &Value> = BTreeMap::new();
        for (param, value) in positional.iter().zip(&args.positional) {
            assigned.insert(param.name.as_str(), value);
        }

        for (name, value) in &args.keyword {
            let param = self.get(name).ok_or_else(|| {
                IntrinError::Binding(
                    ErrorInfo::new(
                        codes::UNEXPECTED_KEYWORD,
                        format!("got an unexpected keyword argument '{name}'"),
                    )
                    .with_context("argument", name.clone()),
                )
            })?;
            if !param.kind.accepts_keyword() {
                return Err(IntrinError::Binding(
                    ErrorInfo::new(
                        codes::POSITIONAL_ONLY,
                        format!("positional-only argument '{name}' passed as keyword"),
                    )
                    .with_context("argument", name.clone()),
                ));
            }
            if assigned.insert(param.name.as_str(), value).is_some() {
                return Err(IntrinError::Binding(
                    ErrorInfo::new(
                        codes::MULTIPLE_VALUES,
                        format!("got multiple values for argument '{name}'"),
                    )
                    .with_context("argument", name.clone()),
                ));
            }
        }

        let mut bound = Vec::with_capacity(self.params.len());
        let mut missing = Vec::new();
        for param in &self.params {
            match (assigned.get(param.name.as_str()), &param.default) {
                (Some(value), _) => bound.push((param.name.clone(), (*value).clone())),
                (None, Some(default)) => bound.push((param.name.clone(), default.clone())),
                (None, None) => missing.push(param.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(IntrinError::Binding(
                ErrorInfo::new(
                    codes::MISSING_ARGUMENT,
                    format!(
                        "missing {} required argument(s): {}",
                        missing.len(),
                        missing.join(", ")
                    ),
                )
                .with_details(missing),
            ));
        }
        Ok(BoundArguments { arguments: bound })
    }
}

/// Positional and keyword arguments supplied to a call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CallArgs {
    #[serde(default)]
    pub positional: Vec<Value>,
    #[serde(default)]
    pub keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }
}

/// Parameter name to value mapping produced by [`Signature::bind`], in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundArguments {
    arguments: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.arguments
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Rebuilds call arguments: positional-only parameters positionally,
    /// everything else by keyword.
    pub fn to_call_args(&self, signature: &Signature) -> CallArgs {
        let mut args = CallArgs::new();
        for (name, value) in self.iter() {
            match signature.get(name).map(|param| param.kind) {
                Some(ParamKind::PositionalOnly) => args.positional.push(value.clone()),
                _ => {
                    args.keyword.insert(name.to_string(), value.clone());
                }
            }
        }
        args
    }

    /// Compact `name=value` rendering used in log lines.
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}={}", value_label(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Context for BoundArguments {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_unsupplied_parameters() {
        let sig = Signature::of(["a"]).param(Param::new("b").with_default(7));
        let bound = sig.bind(&CallArgs::positional([1])).unwrap();
        assert_eq!(bound.get("a"), Some(&json!(1)));
        assert_eq!(bound.get_i64("b"), Some(7));
    }

    #[test]
    fn missing_arguments_are_all_reported() {
        let sig = Signature::of(["a", "b", "c"]);
        let err = sig.bind(&CallArgs::new().kwarg("b", 1)).unwrap_err();
        assert!(err.is(codes::MISSING_ARGUMENT));
        assert_eq!(err.info().details, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn round_trips_through_call_args() {
        let sig = Signature::new([Param::positional_only("x"), Param::new("y")]);
        let bound = sig.bind(&CallArgs::positional([1, 2])).unwrap();
        let rebuilt = bound.to_call_args(&sig);
        assert_eq!(rebuilt.positional, vec![json!(1)]);
        assert_eq!(rebuilt.keyword.get("y"), Some(&json!(2)));
        assert_eq!(sig.bind(&rebuilt).unwrap(), bound);
    }
}
