use std::fmt;

use crate::frame::{Result, TableError, Value, column::Column};

const PREVIEW_ROWS: usize = 5;

/// In-memory columnar table
///
/// Columns keep the order they were supplied in and every operation returns a
/// new table; a `Table` is never mutated after construction.
///
/// # Examples
///
/// ```rust
/// # use columnar_frame::{Table, Value};
/// let table = Table::new([
///     ("id", vec![Value::Int(1), Value::Int(2)]),
///     ("name", vec![Value::from("a"), Value::from("b")]),
/// ]);
/// assert_eq!(table.num_rows(), 2);
/// assert_eq!(table.row(1).unwrap().get("name"), Some(&Value::from("b")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Builds a table from `(name, values)` pairs.
    ///
    /// The row count comes from the first column. Lengths are not checked, use
    /// [`Table::try_new`] for that. A repeated name keeps its first position and
    /// takes the last values.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut out: Vec<Column> = Vec::new();
        for (name, values) in columns {
            let name = name.into();
            match out.iter_mut().find(|c| c.name() == name) {
                Some(existing) => existing.set_values(values),
                None => out.push(Column::new(name, values)),
            }
        }
        Self::from_columns(out)
    }

    /// Like [`Table::new`] but rejects columns whose length differs from the first.
    pub fn try_new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let table = Self::new(columns);
        if let Some(col) = table.columns.iter().find(|c| c.len() != table.num_rows) {
            return Err(TableError::LengthMismatch {
                column: col.name().to_string(),
                expected: table.num_rows,
                found: col.len(),
            });
        }
        Ok(table)
    }

    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        let num_rows = columns.first().map_or(0, Column::len);
        Table { columns, num_rows }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// True when every column holds exactly `num_rows` values
    pub fn is_aligned(&self) -> bool {
        self.columns.iter().all(|c| c.len() == self.num_rows)
    }

    pub fn get_col(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Values of the named column
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        Ok(self.get_col(name)?.values())
    }

    /// Materializes row `index` as a borrowed name → value view.
    ///
    /// # Errors
    /// [`TableError::OutOfRange`] when `index >= num_rows`, and
    /// [`TableError::ColumnTooShort`] when a column of a misaligned table has
    /// no value at `index`.
    pub fn row(&self, index: usize) -> Result<Row<'_>> {
        if index >= self.num_rows {
            return Err(TableError::OutOfRange {
                index,
                num_rows: self.num_rows,
            });
        }

        let cells = self
            .columns
            .iter()
            .map(|col| {
                col.get(index)
                    .map(|v| (col.name(), v))
                    .ok_or_else(|| TableError::ColumnTooShort {
                        column: col.name().to_string(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Row { index, cells })
    }

    /// First rows of every column, for display
    pub fn preview(&self) -> Preview<'_> {
        let rows = self.num_rows.min(PREVIEW_ROWS);
        Preview {
            columns: self
                .columns
                .iter()
                .map(|c| (c.name(), &c.values()[..rows.min(c.len())]))
                .collect(),
            num_rows: self.num_rows,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.preview(), f)
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    index: usize,
    cells: Vec<(&'a str, &'a Value)>,
}

impl<'a> Row<'a> {
    /// Position of this row in its table
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.cells.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + '_ {
        self.cells.iter().copied()
    }
}

/// Display-only snapshot of the leading rows
#[derive(Debug, Clone, PartialEq)]
pub struct Preview<'a> {
    pub columns: Vec<(&'a str, &'a [Value])>,
    pub num_rows: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Table({")?;
        for (i, (name, values)) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name:?}: [")?;
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                match value {
                    Value::Text(s) => write!(f, "{s:?}")?,
                    other => write!(f, "{other}")?,
                }
            }
            f.write_str("]")?;
        }
        f.write_str("})")
    }
}
