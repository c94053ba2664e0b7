use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use thiserror::Error;

pub mod column;
pub mod export;
pub mod operations;
pub mod reader;
pub mod reducers;
pub mod table;

use reducers::AggregateOp;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Input unavailable: {0}")]
    InputUnavailable(#[from] std::io::Error),

    #[error("Invalid UTF-8 on line {line}")]
    InvalidUtf8 { line: usize },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row index {index} out of range for {num_rows} rows")]
    OutOfRange { index: usize, num_rows: usize },

    #[error("Column {column} has no value at row {index}")]
    ColumnTooShort { column: String, index: usize },

    #[error("Column {column} has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Line {line} has {found} fields, header has {expected}")]
    RowLengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Cannot {op} non-numeric value {value:?}")]
    NonNumeric { op: AggregateOp, value: Value },

    #[error("Cannot {0} an empty column")]
    EmptyColumn(AggregateOp),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow2::error::Error),
}

pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// A single typed cell
///
/// Equality is tag sensitive: `Int(1)`, `Float(1.0)` and `Text("1")` are three
/// different values. Floats compare and hash by bit pattern so they can serve
/// as group keys.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer cell
    Int(i64),
    /// Float cell
    Float(f64),
    /// Anything that did not parse as a number, including the empty field
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::Text(_) => 2,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}
