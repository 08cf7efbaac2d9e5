use std::collections::{BTreeMap, BTreeSet};

use intrin_constraint::{BoundArguments, CallArgs, ParamKind, Signature};
use intrin_core::{codes, value_label, ErrorInfo, IntrinError, Value};
use intrin_iface::GenerationContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::{combinations, Combination, GridParameter};
use crate::validator::Validator;

/// A parameterised producer body, invoked once per surviving combination.
#[derive(Debug, Clone)]
pub struct Template<F> {
    name: String,
    signature: Signature,
    body: F,
}

impl<F> Template<F>
where
    F: Fn(&BoundArguments, &GenerationContext) -> Result<(), IntrinError>,
{
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

    pub fn invoke(
        &self,
        args: &BoundArguments,
        ctx: &GenerationContext,
    ) -> Result<(), IntrinError> {
        (self.body)(args, ctx)
    }
}

/// Outcome of one [`expand`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub template: String,
    pub total: usize,
    pub skipped: usize,
    pub invoked: Vec<Combination>,
}

/// Expands `template` over the cartesian product of `parameters`.
///
/// Every combination is bound against the template signature and filtered by
/// `validators` first. The surviving combinations must have pairwise distinct
/// name suffixes; only then is the template invoked for each of them, in
/// product order. The first error from binding, a validator, or the template
/// stops the expansion.
pub fn expand<F>(
    parameters: &[GridParameter],
    validators: &[Validator<'_>],
    template: &Template<F>,
) -> Result<ExpansionReport, IntrinError>
where
    F: Fn(&BoundArguments, &GenerationContext) -> Result<(), IntrinError>,
{
    reject_repeated_parameters(parameters)?;

    let all = combinations(parameters);
    let total = all.len();
    let mut skipped = 0;
    let mut planned: Vec<(BoundArguments, GenerationContext)> = Vec::new();
    let mut suffixes: BTreeMap<String, String> = BTreeMap::new();

    'combos: for combination in all {
        let bound = template
            .signature
            .bind(&call_args(&template.signature, &combination))?;
        for validator in validators {
            if !validator.accepts(&bound)? {
                debug!(
                    template = %template.name,
                    validator = %validator.label(),
                    arguments = %bound.describe(),
                    "combination rejected"
                );
                skipped += 1;
                continue 'combos;
            }
        }
        let ctx = GenerationContext::new(template.name.clone(), combination);
        let suffix = ctx.suffix();
        if let Some(first) = suffixes.insert(suffix.clone(), describe(ctx.combination())) {
            return Err(IntrinError::Generator(
                ErrorInfo::new(
                    codes::NAME_COLLISION,
                    format!(
                        "combinations of template {} produce the same name suffix '{suffix}'",
                        template.name
                    ),
                )
                .with_context("template", template.name.clone())
                .with_context("suffix", suffix)
                .with_details([first, describe(ctx.combination())])
                .with_hint("parameter values must render to distinct labels"),
            ));
        }
        planned.push((bound, ctx));
    }

    let mut invoked = Vec::with_capacity(planned.len());
    for (bound, ctx) in planned {
        template.invoke(&bound, &ctx)?;
        invoked.push(ctx.combination().to_vec());
    }

    info!(
        template = %template.name,
        total,
        skipped,
        invoked = invoked.len(),
        "template expanded"
    );
    Ok(ExpansionReport {
        template: template.name.clone(),
        total,
        skipped,
        invoked,
    })
}

fn reject_repeated_parameters(parameters: &[GridParameter]) -> Result<(), IntrinError> {
    let mut seen = BTreeSet::new();
    for param in parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(IntrinError::Binding(
                ErrorInfo::new(
                    codes::MULTIPLE_VALUES,
                    format!("grid parameter '{}' is given more than once", param.name),
                )
                .with_context("argument", param.name.clone()),
            ));
        }
    }
    Ok(())
}

// Positional-only parameters are fed positionally in declaration order, with
// their defaults filling gaps; everything else goes by keyword. After the first
// uncovered positional-only parameter without a default nothing more can be
// passed positionally, and later positional-only values are dropped so binding
// reports the missing argument.
fn call_args(signature: &Signature, combination: &Combination) -> CallArgs {
    let mut covered: BTreeMap<&str, &Value> = combination
        .iter()
        .map(|(name, value)| (name.as_str(), value))
        .collect();
    let mut args = CallArgs::new();
    let mut filling = true;
    for param in signature
        .params()
        .iter()
        .filter(|param| param.kind == ParamKind::PositionalOnly)
    {
        let given = covered.remove(param.name.as_str());
        if !filling {
            continue;
        }
        match (given, &param.default) {
            (Some(value), _) => args.positional.push(value.clone()),
            (None, Some(default)) => args.positional.push(default.clone()),
            (None, None) => filling = false,
        }
    }
    for (name, value) in combination {
        if covered.contains_key(name.as_str()) {
            args.keyword.insert(name.clone(), value.clone());
        }
    }
    args
}

fn describe(combination: &[(String, Value)]) -> String {
    combination
        .iter()
        .map(|(name, value)| format!("{name}={}", value_label(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use intrin_constraint::Param;
    use serde_json::json;

    #[test]
    fn positional_only_parameters_are_passed_positionally() {
        let sig = Signature::new([
            Param::positional_only("m"),
            Param::positional_only("n").with_default(8),
            Param::new("dtype"),
        ]);
        let combo = vec![("dtype".to_string(), json!("f16")), ("m".to_string(), json!(4))];
        let args = call_args(&sig, &combo);
        assert_eq!(args.positional, vec![json!(4), json!(8)]);
        assert_eq!(args.keyword.get("dtype"), Some(&json!("f16")));
        assert!(sig.bind(&args).is_ok());
    }

    #[test]
    fn gap_in_positional_only_parameters_reports_missing_argument() {
        let sig = Signature::new([
            Param::positional_only("m"),
            Param::positional_only("n"),
            Param::new("dtype"),
        ]);
        let combo = vec![("n".to_string(), json!(8)), ("dtype".to_string(), json!("f16"))];
        let args = call_args(&sig, &combo);
        assert!(args.positional.is_empty());
        assert!(!args.keyword.contains_key("n"));
        let err = sig.bind(&args).unwrap_err();
        assert!(err.is(codes::MISSING_ARGUMENT));
        assert_eq!(err.info().details, vec!["m".to_string(), "n".to_string()]);
    }
}
