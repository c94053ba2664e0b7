use crate::frame::Value;

/// Physical type a column maps to when exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Str,
}

/// One named sequence of values, one per row
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub(crate) fn set_values(&mut self, values: Vec<Value>) {
        self.values = values;
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Narrowest type holding every value: all integers stay `Int64`, any float
    /// among numbers widens to `Float64`, any text (or no values) is `Str`.
    pub fn column_type(&self) -> ColumnType {
        if self.values.is_empty() {
            return ColumnType::Str;
        }

        let mut ty = ColumnType::Int64;
        for value in &self.values {
            match value {
                Value::Int(_) => {}
                Value::Float(_) => ty = ColumnType::Float64,
                Value::Text(_) => return ColumnType::Str,
            }
        }
        ty
    }
}
