//! Cell values and rows as returned by a data source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric reading of the value, if it has one.
    ///
    /// Text is parsed after trimming. Unparseable text and non-finite readings
    /// such as `NaN` or `inf` have no numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Null or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// A value summed from numbers, kept integral when it is whole.
    pub fn from_sum(sum: f64) -> Self {
        if sum.fract() == 0.0 && sum.abs() < i64::MAX as f64 {
            Value::Int(sum as i64)
        } else {
            Value::Float(sum)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// One result row: column key to value, in the order the source produced them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Set a column, replacing an existing value in place.
    pub fn insert(&mut self, key: &str, value: Value) {
        match self.cells.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.cells.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(&k.into(), v);
        }
        row
    }
}

// =============================================================================
// Display formats
// =============================================================================

/// Per-field display format applied when a report is rendered.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValueFormat {
    /// Grouped thousands with a fixed number of decimals.
    Number {
        #[serde(default)]
        decimals: usize,
    },
    /// A number prefixed with a currency symbol.
    Currency {
        #[serde(default = "default_currency_symbol")]
        symbol: String,
        #[serde(default = "default_currency_decimals")]
        decimals: usize,
    },
    Upper,
    Lower,
    /// Cut to at most `len` characters, marking the cut with an ellipsis.
    Truncate { len: usize },
}

fn default_currency_symbol() -> String {
    "$".into()
}

fn default_currency_decimals() -> usize {
    2
}

impl ValueFormat {
    /// Render a value. Numeric formats leave non-numeric values untouched.
    pub fn apply(&self, value: &Value) -> String {
        match self {
            ValueFormat::Number { decimals } => match value.as_f64() {
                Some(n) => group_thousands(n, *decimals),
                None => value.to_string(),
            },
            ValueFormat::Currency { symbol, decimals } => match value.as_f64() {
                Some(n) if n < 0.0 => format!("-{}{}", symbol, group_thousands(-n, *decimals)),
                Some(n) => format!("{}{}", symbol, group_thousands(n, *decimals)),
                None => value.to_string(),
            },
            ValueFormat::Upper => value.to_string().to_uppercase(),
            ValueFormat::Lower => value.to_string().to_lowercase(),
            ValueFormat::Truncate { len } => {
                let text = value.to_string();
                if text.chars().count() <= *len {
                    text
                } else {
                    let mut cut: String = text.chars().take(*len).collect();
                    cut.push('…');
                    cut
                }
            }
        }
    }
}

fn group_thousands(n: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, n);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
