use intrin_core::Value;
use serde::{Deserialize, Serialize};

/// One axis of the expansion grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParameter {
    pub name: String,
    pub values: Vec<Value>,
}

impl GridParameter {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parameter name to value assignment, in grid parameter order.
pub type Combination = Vec<(String, Value)>;

/// Cartesian product of the grid. The first parameter varies slowest; an
/// empty grid yields a single empty combination.
pub fn combinations(params: &[GridParameter]) -> Vec<Combination> {
    let mut outputs = Vec::new();
    expand_grid(params, 0, Vec::with_capacity(params.len()), &mut outputs);
    outputs
}

fn expand_grid(
    params: &[GridParameter],
    idx: usize,
    current: Combination,
    outputs: &mut Vec<Combination>,
) {
    if idx == params.len() {
        outputs.push(current);
        return;
    }
    let param = &params[idx];
    for value in &param.values {
        let mut next = current.clone();
        next.push((param.name.clone(), value.clone()));
        expand_grid(params, idx + 1, next, outputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_parameter_varies_slowest() {
        let grid = [
            GridParameter::new("a", [1, 2]),
            GridParameter::new("b", ["x", "y"]),
        ];
        let labels: Vec<(Value, Value)> = combinations(&grid)
            .into_iter()
            .map(|combo| (combo[0].1.clone(), combo[1].1.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (json!(1), json!("x")),
                (json!(1), json!("y")),
                (json!(2), json!("x")),
                (json!(2), json!("y")),
            ]
        );
    }

    #[test]
    fn empty_axis_empties_the_product() {
        let grid = [
            GridParameter::new("a", [1, 2]),
            GridParameter::new("b", Vec::<Value>::new()),
        ];
        assert!(combinations(&grid).is_empty());
        assert_eq!(combinations(&[]), vec![Combination::new()]);
    }
}
