use std::collections::HashMap;

use tracing::debug;

use crate::frame::{
    Result, TableError, Value,
    column::Column,
    reducers::AggregateOp,
    table::{Row, Table},
};

impl Table {
    /// Keeps the rows for which `predicate` returns true.
    ///
    /// The predicate runs exactly once per row, in row order. Column order and
    /// relative row order are preserved.
    ///
    /// # Example
    /// ```rust
    /// # use columnar_frame::{Table, Value};
    /// let table = Table::new([("v", vec![Value::Int(5), Value::Int(50)])]);
    /// let big = table
    ///     .filter(|row| row.get("v").and_then(Value::as_i64) > Some(10))
    ///     .unwrap();
    /// assert_eq!(big.column("v").unwrap(), &[Value::Int(50)]);
    /// ```
    pub fn filter<P>(&self, mut predicate: P) -> Result<Table>
    where
        P: FnMut(&Row<'_>) -> bool,
    {
        let mut keep = Vec::with_capacity(self.num_rows());
        for i in 0..self.num_rows() {
            if predicate(&self.row(i)?) {
                keep.push(i);
            }
        }

        debug!(
            rows_in = self.num_rows(),
            rows_out = keep.len(),
            "filtered table"
        );
        self.take(&keep)
    }

    /// Projects the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| {
                let col = self.get_col(name.as_ref())?;
                Ok((col.name().to_string(), col.values().to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Table::new(columns))
    }

    /// Partitions rows by the value of `name`.
    ///
    /// Groups come out in the order their key is first seen. Every sub-table
    /// keeps all columns.
    pub fn group_by(&self, name: &str) -> Result<GroupedTables> {
        let keys = self.column(name)?;
        if keys.len() < self.num_rows() {
            return Err(TableError::ColumnTooShort {
                column: name.to_string(),
                index: keys.len(),
            });
        }

        let mut index: HashMap<Value, usize> = HashMap::new();
        let mut members: Vec<(Value, Vec<usize>)> = Vec::new();
        for (i, key) in keys[..self.num_rows()].iter().enumerate() {
            match index.get(key) {
                Some(&slot) => members[slot].1.push(i),
                None => {
                    index.insert(key.clone(), members.len());
                    members.push((key.clone(), vec![i]));
                }
            }
        }

        let groups = members
            .into_iter()
            .map(|(key, rows)| Ok((key, self.take(&rows)?)))
            .collect::<Result<Vec<_>>>()?;

        debug!(column = name, groups = groups.len(), "grouped table");
        Ok(GroupedTables { groups, index })
    }

    /// Hands the whole column to `reducer` and returns its result unchanged.
    ///
    /// # Example
    /// ```rust
    /// # use columnar_frame::{Table, Value};
    /// let table = Table::new([("v", vec![Value::Int(1), Value::Int(2)])]);
    /// let n = table.aggregate("v", |values| values.len()).unwrap();
    /// assert_eq!(n, 2);
    /// ```
    pub fn aggregate<R, F>(&self, name: &str, reducer: F) -> Result<R>
    where
        F: FnOnce(&[Value]) -> R,
    {
        Ok(reducer(self.column(name)?))
    }

    /// [`Table::aggregate`] with one of the built-in reducers
    pub fn aggregate_op(&self, name: &str, op: AggregateOp) -> Result<Value> {
        self.aggregate(name, |values| op.apply(values))?
    }

    /// New table holding the given rows of every column
    pub(crate) fn take(&self, rows: &[usize]) -> Result<Table> {
        let columns = self
            .columns()
            .iter()
            .map(|col| {
                let values = rows
                    .iter()
                    .map(|&i| {
                        col.get(i).cloned().ok_or_else(|| TableError::ColumnTooShort {
                            column: col.name().to_string(),
                            index: i,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Column::new(col.name(), values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Table::from_columns(columns))
    }
}

/// Result of [`Table::group_by`]: sub-tables keyed by group value, in
/// first-seen order
#[derive(Debug, Clone, Default)]
pub struct GroupedTables {
    groups: Vec<(Value, Table)>,
    index: HashMap<Value, usize>,
}

impl GroupedTables {
    pub fn get(&self, key: &Value) -> Option<&Table> {
        self.index.get(key).map(|&i| &self.groups[i].1)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.groups.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Table)> + '_ {
        self.groups.iter().map(|(k, t)| (k, t))
    }
}

impl IntoIterator for GroupedTables {
    type Item = (Value, Table);
    type IntoIter = std::vec::IntoIter<(Value, Table)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Table {
        Table::new([
            (
                "category",
                vec![
                    Value::from("A"),
                    Value::from("B"),
                    Value::from("A"),
                    Value::from("C"),
                ],
            ),
            (
                "value",
                vec![Value::Int(10), Value::Int(20), Value::Int(30), Value::Float(0.5)],
            ),
        ])
    }

    #[test]
    fn test_filter_greater_than() {
        let table = sales();
        let out = table
            .filter(|row| matches!(row.get("value"), Some(Value::Int(v)) if *v > 15))
            .unwrap();
        assert_eq!(out.num_rows(), 2);
        assert_eq!(out.column("value").unwrap(), &[Value::Int(20), Value::Int(30)]);
        assert_eq!(
            out.column("category").unwrap(),
            &[Value::from("B"), Value::from("A")]
        );
    }

    #[test]
    fn test_filter_calls_predicate_once_per_row_in_order() {
        let table = sales();
        let mut seen = Vec::new();
        let out = table
            .filter(|row| {
                seen.push(row.index());
                false
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 2);
    }

    #[test]
    fn test_select_order_and_missing() {
        let table = sales();
        let out = table.select(&["value", "category"]).unwrap();
        assert_eq!(out.column_names().collect::<Vec<_>>(), vec!["value", "category"]);
        assert_eq!(out.num_rows(), 4);

        assert!(matches!(
            table.select(&["category", "region"]),
            Err(TableError::MissingColumn(name)) if name == "region"
        ));
    }

    #[test]
    fn test_group_by_first_seen_order() {
        let table = sales();
        let groups = table.group_by("category").unwrap();
        let keys: Vec<&Value> = groups.keys().collect();
        assert_eq!(keys, vec![&Value::from("A"), &Value::from("B"), &Value::from("C")]);

        let a = groups.get(&Value::from("A")).unwrap();
        assert_eq!(a.num_columns(), 2);
        assert_eq!(a.column("value").unwrap(), &[Value::Int(10), Value::Int(30)]);
        assert!(groups.get(&Value::from("Z")).is_none());
    }

    #[test]
    fn test_group_keys_are_type_sensitive() {
        let table = Table::new([(
            "k",
            vec![Value::Int(1), Value::from("1"), Value::Float(1.0), Value::Int(1)],
        )]);
        let groups = table.group_by("k").unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.get(&Value::Int(1)).unwrap().num_rows(), 2);
    }

    #[test]
    fn test_group_by_empty_table() {
        let table = Table::new([("k", Vec::new())]);
        assert!(table.group_by("k").unwrap().is_empty());
        assert!(table.group_by("missing").is_err());
    }

    #[test]
    fn test_aggregate_passes_column_through() {
        let table = sales();
        let first = table.aggregate("category", |v| v[0].clone()).unwrap();
        assert_eq!(first, Value::from("A"));
        assert!(table.aggregate("nope", |v| v.len()).is_err());
    }

    #[test]
    fn test_aggregate_op() {
        let table = sales();
        assert_eq!(
            table.aggregate_op("value", AggregateOp::Sum).unwrap(),
            Value::Float(60.5)
        );
        assert!(matches!(
            table.aggregate_op("category", AggregateOp::Sum),
            Err(TableError::NonNumeric { .. })
        ));
    }

    #[test]
    fn test_operations_leave_source_untouched() {
        let table = sales();
        let before = table.clone();
        let _ = table.filter(|_| true).unwrap();
        let _ = table.select(&["value"]).unwrap();
        let _ = table.group_by("category").unwrap();
        assert_eq!(table, before);
    }
}
