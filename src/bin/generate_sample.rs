use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// (name, tipo_entidad, emissions in 1940, yearly growth rate)
const ENTITIES: &[(&str, &str, f64, f64)] = &[
    ("Afghanistan", "Pais", 2.0e5, 0.045),
    ("Albania", "Pais", 1.5e5, 0.030),
    ("Algeria", "Pais", 1.2e6, 0.050),
    ("Brazil", "Pais", 8.0e6, 0.055),
    ("China", "Pais", 4.0e7, 0.065),
    ("France", "Pais", 6.0e7, 0.008),
    ("Germany", "Pais", 2.2e8, 0.004),
    ("India", "Pais", 3.5e7, 0.060),
    ("Japan", "Pais", 9.0e7, 0.020),
    ("United Kingdom", "Pais", 2.4e8, -0.003),
    ("United States", "Pais", 1.3e9, 0.012),
    ("Democratic Republic of Congo", "Pais", 3.0e5, 0.035),
    ("Africa", "Region", 4.0e7, 0.040),
    ("Europe", "Region", 1.1e9, 0.006),
    ("World", "Region", 4.8e9, 0.022),
    ("Asia (GCP)", "Region", 3.0e8, 0.050),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[-1, 1)`.
    fn jitter(&mut self) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        unit * 2.0 - 1.0
    }
}

/// One CSV line; field names become the header.
#[derive(Serialize)]
struct CsvRow<'a> {
    entity: &'a str,
    year: i32,
    annual_co2_emissions: f64,
    tipo_entidad: &'a str,
}

struct Rows {
    entity: Vec<String>,
    year: Vec<i32>,
    emissions: Vec<f64>,
    tipo_entidad: Vec<String>,
}

fn generate(years: std::ops::RangeInclusive<i32>, rng: &mut SimpleRng) -> Rows {
    let mut rows = Rows {
        entity: Vec::new(),
        year: Vec::new(),
        emissions: Vec::new(),
        tipo_entidad: Vec::new(),
    };
    for &(name, kind, base, growth) in ENTITIES {
        for year in years.clone() {
            let t = (year - years.start()) as f64;
            // +-5 % noise around exponential growth.
            let value = base * (1.0 + growth).powf(t) * (1.0 + 0.05 * rng.jitter());
            rows.entity.push(name.to_string());
            rows.year.push(year);
            rows.emissions.push(value.max(0.0).round());
            rows.tipo_entidad.push(kind.to_string());
        }
    }
    rows
}

fn write_csv(rows: &Rows, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for i in 0..rows.entity.len() {
        writer
            .serialize(CsvRow {
                entity: &rows.entity[i],
                year: rows.year[i],
                annual_co2_emissions: rows.emissions[i],
                tipo_entidad: &rows.tipo_entidad[i],
            })
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &Rows, path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("entity", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("annual_co2_emissions", DataType::Float64, false),
        Field::new("tipo_entidad", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.entity.clone())),
            Arc::new(Int32Array::from(rows.year.clone())),
            Arc::new(Float64Array::from(rows.emissions.clone())),
            Arc::new(StringArray::from(rows.tipo_entidad.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    let preview = arrow::util::pretty::pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("formatting preview")?;
    log::debug!("First rows:\n{preview}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let rows = generate(1940..=2024, &mut rng);

    std::fs::create_dir_all("data").context("creating data directory")?;
    let csv_path = Path::new("data/co2_emissions_sample.csv");
    let parquet_path = Path::new("data/co2_emissions_sample.parquet");
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    log::info!(
        "Wrote {} rows for {} entities to {} and {}",
        rows.entity.len(),
        ENTITIES.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
