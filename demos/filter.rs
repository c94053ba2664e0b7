use crate::utils::sample_csv_path;
use columnar_frame::{ParseOptions, Table, Value};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let table = Table::from_path(path.as_path(), &ParseOptions::default())?;

    // Rows where value > 15, keeping two columns
    let filtered = table
        .filter(|row| row.get("value").and_then(Value::as_f64) > Some(15.0))?
        .select(&["id", "note"])?;
    println!("Rows with value > 15: {}", filtered);

    Ok(())
}
