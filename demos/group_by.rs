use crate::utils::sample_csv_path;
use columnar_frame::{AggregateOp, ParseOptions, Table};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let table = Table::from_path(path.as_path(), &ParseOptions::default())?;

    // Group by category and compute average of 'value'
    for (key, group) in table.group_by("category")? {
        let avg = group.aggregate_op("value", AggregateOp::Avg)?;
        println!("Category {} => {} ({} rows)", key, avg, group.num_rows());
    }

    Ok(())
}
