use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes a sample file with integer, float, quoted and empty fields
fn main() -> std::io::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/data.csv".to_string());
    let rows: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(1_000_000);

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "id,value,price,category,region,note")?;

    let mut rng = rand::rng();
    for i in 0..rows {
        let value = rng.random_range(1..1000);
        let price: f64 = rng.random_range(0.0..500.0);
        let category = ['A', 'B', 'C', 'D'][rng.random_range(0..4)];
        let region =
            ["US", "EU", "ASIA", "AFRICA", "AUSTRALIA", "SOUTH AMERICA"][rng.random_range(0..6)];
        let note = match rng.random_range(0..4) {
            0 => "",
            1 => "\"said \"\"hi\"\"\"",
            2 => "\"a, b\"",
            _ => "plain",
        };
        writeln!(
            writer,
            "{},{},{:.2},{},{},{}",
            i, value, price, category, region, note
        )?;
    }

    writer.flush()?;
    println!("Sample CSV generated: {} ({} rows)", path, rows);
    Ok(())
}
