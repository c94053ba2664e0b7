use std::path::Path;

use columnar_frame::{AggregateOp, ParseOptions, Table};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _profiler = dhat::Profiler::new_heap();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/data.csv".to_string());
    let table = Table::from_path(Path::new(&path), &ParseOptions::default())?;

    // Run aggregation
    let _res = table.aggregate_op("value", AggregateOp::Sum)?;
    let _groups = table.group_by("category")?;

    println!("Memory benchmark finished. See dhat-heap.json for details");
    Ok(())
}
