use arrow2::{
    array::{Array, Float64Array, Int64Array, MutableUtf8Array, Utf8Array},
    chunk::Chunk,
    datatypes::{DataType, Field, Schema},
};
use std::sync::Arc;

use crate::frame::{
    Result, Value,
    column::{Column, ColumnType},
    table::Table,
};

impl Table {
    /// Converts the table into an Arrow schema and a chunk of arrays.
    ///
    /// Each column becomes the narrowest of `Int64`, `Float64` or `Utf8` that
    /// holds all its values; mixed columns are rendered as text.
    ///
    /// # Errors
    /// Fails with [`crate::TableError::Arrow`] when the columns have unequal lengths.
    pub fn to_arrow(&self) -> Result<(Schema, Chunk<Arc<dyn Array>>)> {
        let fields: Vec<Field> = self
            .columns()
            .iter()
            .map(|col| {
                let dtype = match col.column_type() {
                    ColumnType::Int64 => DataType::Int64,
                    ColumnType::Float64 => DataType::Float64,
                    ColumnType::Str => DataType::Utf8,
                };
                Field::new(col.name(), dtype, false)
            })
            .collect();

        let arrays: Vec<Arc<dyn Array>> = self.columns().iter().map(column_to_array).collect();

        Ok((Schema::from(fields), Chunk::try_new(arrays)?))
    }
}

fn column_to_array(col: &Column) -> Arc<dyn Array> {
    match col.column_type() {
        ColumnType::Int64 => {
            let values = col.values().iter().filter_map(Value::as_i64).collect();
            Arc::new(Int64Array::from_vec(values)) as Arc<dyn Array>
        }
        ColumnType::Float64 => {
            let values = col.values().iter().filter_map(Value::as_f64).collect();
            Arc::new(Float64Array::from_vec(values)) as Arc<dyn Array>
        }
        ColumnType::Str => {
            let mut arr = MutableUtf8Array::<i32>::with_capacity(col.len());
            for value in col.values() {
                match value {
                    Value::Text(s) => arr.push(Some(s.as_str())),
                    other => arr.push(Some(other.to_string())),
                }
            }
            let array: Utf8Array<i32> = arr.into();
            Arc::new(array) as Arc<dyn Array>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_types() {
        let table = Table::new([
            ("id", vec![Value::Int(1), Value::Int(2)]),
            ("score", vec![Value::Int(3), Value::Float(4.5)]),
            ("label", vec![Value::Float(1.0), Value::from("x")]),
        ]);
        let (schema, chunk) = table.to_arrow().unwrap();

        let types: Vec<&DataType> = schema.fields.iter().map(|f| &f.data_type).collect();
        assert_eq!(
            types,
            vec![&DataType::Int64, &DataType::Float64, &DataType::Utf8]
        );
        assert_eq!(chunk.len(), 2);

        let labels = chunk.arrays()[2]
            .as_any()
            .downcast_ref::<Utf8Array<i32>>()
            .unwrap();
        assert_eq!(labels.value(0), "1.0");
        assert_eq!(labels.value(1), "x");

        let scores = chunk.arrays()[1]
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(scores.value(0), 3.0);
    }

    #[test]
    fn test_misaligned_table_is_rejected() {
        let table = Table::new([
            ("a", vec![Value::Int(1), Value::Int(2)]),
            ("b", vec![Value::Int(1)]),
        ]);
        assert!(table.to_arrow().is_err());
    }
}
