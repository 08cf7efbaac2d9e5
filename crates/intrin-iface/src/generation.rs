use intrin_core::{name_label, Value};
use serde::{Deserialize, Serialize};

/// The parameter combination a template is currently being invoked with.
///
/// Registrations made while expanding a template receive it so that every
/// combination produces a distinct name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    template: String,
    combination: Vec<(String, Value)>,
}

impl GenerationContext {
    pub fn new(template: impl Into<String>, combination: Vec<(String, Value)>) -> Self {
        Self {
            template: template.into(),
            combination,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn combination(&self) -> &[(String, Value)] {
        &self.combination
    }

    /// Name labels of the combination values joined by `_`, in parameter
    /// order. Distinct combinations of distinct values give distinct suffixes.
    pub fn suffix(&self) -> String {
        self.combination
            .iter()
            .map(|(_, value)| name_label(value))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// `base` with the combination suffix appended; unchanged for an empty
    /// combination.
    pub fn qualify(&self, base: &str) -> String {
        if self.combination.is_empty() {
            base.to_string()
        } else {
            format!("{base}_{}", self.suffix())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suffix_follows_parameter_order() {
        let ctx = GenerationContext::new(
            "tmpl",
            vec![("a".into(), json!(1)), ("b".into(), json!("f16"))],
        );
        assert_eq!(ctx.suffix(), "1_f16");
        assert_eq!(ctx.qualify("iface_generated"), "iface_generated_1_f16");
        assert_eq!(GenerationContext::new("t", vec![]).qualify("x"), "x");
    }

    #[test]
    fn underscores_inside_values_do_not_merge_suffixes() {
        let left = GenerationContext::new(
            "tmpl",
            vec![("x".into(), json!("a_b")), ("y".into(), json!("c"))],
        );
        let right = GenerationContext::new(
            "tmpl",
            vec![("x".into(), json!("a")), ("y".into(), json!("b_c"))],
        );
        assert_eq!(left.suffix(), "a$ub_c");
        assert_eq!(right.suffix(), "a_b$uc");
        assert_ne!(left.suffix(), right.suffix());

        let int = GenerationContext::new("tmpl", vec![("x".into(), json!(1))]);
        let text = GenerationContext::new("tmpl", vec![("x".into(), json!("1"))]);
        assert_ne!(int.suffix(), text.suffix());
    }
}
