use log::trace;

use crate::{
    data::{DataSet, Value},
    scene::{StackRole, StackSign},
};

/// Sums `measure` over every row stacked together with `row`.
///
/// Rows stack together when they share the values of the role's group
/// fields. Only rows on the stack's side contribute: the role's explicit
/// sign, or else the sign of the net total of the stack. Returns `None` when
/// no stacked row has a numeric value.
pub fn stack_total(data: &DataSet, row: usize, measure: &str, role: &StackRole) -> Option<f64> {
    let values: Vec<f64> = data
        .rows_matching(row, &role.group_fields)
        .into_iter()
        .filter_map(|stacked| data.value(stacked, measure).and_then(Value::as_f64))
        .collect();
    if values.is_empty() {
        return None;
    }

    let sign = role.sign.unwrap_or_else(|| {
        if values.iter().sum::<f64>() < 0.0 {
            StackSign::Negative
        } else {
            StackSign::Positive
        }
    });
    let total = values.iter().filter(|value| sign.accepts(**value)).sum();
    trace!(row, measure, rows = values.len(), total; "Stack total");
    Some(total)
}
