use serde_json::{Number, Value};

use crate::record::{Labels, StructuredValue};

/// Label value written for JSON `null`. Distinct from a user string `"null"`.
pub const NULL_SENTINEL: &str = "null_value:NULL_VALUE";

/// Flatten a structured value into `(key, value)` pairs.
///
/// Objects extend the key with `.field`, arrays with `[index]`. With an
/// empty `prefix` the first level of object keys is used bare. Keys come out
/// in sorted order, so flattening the same value always yields the same
/// pairs in the same order.
pub fn flatten(value: &StructuredValue, prefix: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    walk(value, prefix.to_string(), &mut |key, val| pairs.push((key, val)));
    pairs
}

/// Flatten `value` straight into `labels`, overwriting existing keys.
pub fn flatten_into(labels: &mut Labels, prefix: &str, value: &StructuredValue) {
    walk(value, prefix.to_string(), &mut |key, val| {
        labels.insert(key, val);
    });
}

fn walk(value: &Value, key: String, emit: &mut impl FnMut(String, String)) {
    match value {
        Value::Null => emit(key, NULL_SENTINEL.to_string()),
        Value::Bool(b) => emit(key, b.to_string()),
        Value::Number(n) => emit(key, render_number(n)),
        Value::String(s) => emit(key, s.clone()),
        Value::Object(map) => {
            for (field, child) in map {
                walk(child, join_key(&key, field), emit);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, format!("{key}[{index}]"), emit);
            }
        }
    }
}

/// `prefix.field`, or just `field` at the top level.
pub(crate) fn join_key(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Largest magnitude an integral float is still printed in full.
const PLAIN_FLOAT_LIMIT: f64 = 1e21;

/// Integral values render without a fraction. Other floats use the
/// shortest form, switching to an exponent for very large or small ones.
pub fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < PLAIN_FLOAT_LIMIT => f.to_string(),
            _ => n.to_string(),
        }
    }
}
