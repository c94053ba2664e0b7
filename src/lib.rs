//! # columnar-frame
//!
//! `columnar-frame` loads delimited text into an in-memory columnar [`Table`]
//! and transforms it with relational-style operations. It supports:
//!
//! - Quote-aware field tokenizing (`""` escapes, configurable separator)
//! - Per-value type inference (integer, float, text)
//! - Memory-mapped file loading
//! - Filter, select, group-by and aggregate, each returning a new table
//! - Export to Arrow arrays
//!
//! # Example
//!
//! ```rust
//! use columnar_frame::{AggregateOp, ParseOptions, Table, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lines = ["category,value", "A,10", "B,20", "A,30"];
//!     let table = Table::from_lines(lines, &ParseOptions::default())?;
//!
//!     // Filter rows
//!     let big = table.filter(|row| row.get("value") > Some(&Value::Int(15)))?;
//!     assert_eq!(big.num_rows(), 2);
//!
//!     // Group by category and average each group
//!     for (key, group) in table.group_by("category")? {
//!         let avg = group.aggregate_op("value", AggregateOp::Avg)?;
//!         println!("Category {} => {}", key, avg);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod helpers;
pub mod frame;

pub use frame::{
    Result, TableError, Value,
    column::{Column, ColumnType},
    operations::GroupedTables,
    reader::{ParseOptions, RowLengthPolicy, parse_table},
    reducers::AggregateOp,
    table::{Preview, Row, Table},
};
pub use helpers::{inference::infer_value, tokenizer::tokenize_line};
