use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record};

const ENTITY: &str = "entity";
const YEAR: &str = "year";
const EMISSIONS: &str = "annual_co2_emissions";
const ENTITY_TYPE: &str = "tipo_entidad";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an emissions dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `entity`, `year`, `annual_co2_emissions`,
///   `tipo_entidad` (the primary format)
/// * `.json`    – `[{ "entity": ..., "year": ..., ... }, ...]`
/// * `.parquet` – one column per field
///
/// Rows without an entity or a usable year are dropped silently.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::info!(
        "Loaded {} records ({} entities, {} years) from {}",
        dataset.len(),
        dataset.entities().len(),
        dataset.years().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row ingestion shared by all formats
// ---------------------------------------------------------------------------

/// Loosely-typed fields of one source row, before validation.
#[derive(Debug, Default)]
struct RawRow {
    entity: Option<String>,
    year: Option<f64>,
    emissions: Option<f64>,
    tipo_entidad: Option<String>,
}

impl RawRow {
    /// Turn the row into a [`Record`], or `None` if entity or year is missing.
    fn into_record(self) -> Option<Record> {
        let entity = self.entity.map(|e| e.trim().to_string())?;
        if entity.is_empty() {
            return None;
        }
        let year = self.year.and_then(integral_year)?;
        let emissions = self.emissions.filter(|v| v.is_finite()).unwrap_or(0.0);
        Some(Record::new(
            entity,
            year,
            emissions,
            self.tipo_entidad.unwrap_or_default(),
        ))
    }
}

fn integral_year(v: f64) -> Option<i32> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

/// Validate raw rows, log how many were dropped and build the dataset.
fn collect_rows(rows: impl IntoIterator<Item = RawRow>) -> Dataset {
    let mut dropped = 0usize;
    let records: Vec<Record> = rows
        .into_iter()
        .filter_map(|row| {
            let rec = row.into_record();
            if rec.is_none() {
                dropped += 1;
            }
            rec
        })
        .collect();
    if dropped > 0 {
        log::debug!("Dropped {dropped} rows without entity or year");
    }
    Dataset::from_records(records)
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; `entity` and `year` columns are
/// required, `annual_co2_emissions` and `tipo_entidad` optional.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let entity_idx = headers
        .iter()
        .position(|h| h == ENTITY)
        .context("CSV missing 'entity' column")?;
    let year_idx = headers
        .iter()
        .position(|h| h == YEAR)
        .context("CSV missing 'year' column")?;
    let emissions_idx = headers.iter().position(|h| h == EMISSIONS);
    let type_idx = headers.iter().position(|h| h == ENTITY_TYPE);

    let mut rows = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let bytes = result.with_context(|| format!("CSV row {row_no}"))?;
        // A row that is not valid UTF-8 is dropped like any other bad row.
        let Ok(record) = csv::StringRecord::from_byte_record(bytes) else {
            rows.push(RawRow::default());
            continue;
        };
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        rows.push(RawRow {
            entity: non_empty(field(Some(entity_idx))),
            year: parse_number(field(Some(year_idx))),
            emissions: parse_number(field(emissions_idx)),
            tipo_entidad: non_empty(field(type_idx)),
        });
    }

    Ok(collect_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "entity": "Albania", "year": 1940, "annual_co2_emissions": 12.5, "tipo_entidad": "Pais" },
///   ...
/// ]
/// ```
///
/// Numbers given as strings are accepted, mirroring the CSV path.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let items = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            log::debug!("JSON row {i} is not an object");
            rows.push(RawRow::default());
            continue;
        };

        rows.push(RawRow {
            entity: obj.get(ENTITY).and_then(json_to_string),
            year: obj.get(YEAR).and_then(json_to_f64),
            emissions: obj.get(EMISSIONS).and_then(json_to_f64),
            tipo_entidad: obj.get(ENTITY_TYPE).and_then(json_to_string),
        });
    }

    Ok(collect_rows(rows))
}

fn json_to_f64(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

fn json_to_string(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => non_empty(s),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// `year` and `annual_co2_emissions` may be any numeric type (they are cast to
/// Float64); `entity` and `tipo_entidad` any type castable to Utf8. Works with
/// files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let entity_col = batch
            .column_by_name(ENTITY)
            .context("Parquet file missing 'entity' column")
            .and_then(|c| as_utf8(c, ENTITY))?;
        let year_col = batch
            .column_by_name(YEAR)
            .context("Parquet file missing 'year' column")
            .and_then(|c| as_float64(c, YEAR))?;
        let emissions_col = batch
            .column_by_name(EMISSIONS)
            .map(|c| as_float64(c, EMISSIONS))
            .transpose()?;
        let type_col = batch
            .column_by_name(ENTITY_TYPE)
            .map(|c| as_utf8(c, ENTITY_TYPE))
            .transpose()?;

        for row in 0..batch.num_rows() {
            rows.push(RawRow {
                entity: string_at(&entity_col, row),
                year: float_at(&year_col, row),
                emissions: emissions_col.as_ref().and_then(|c| float_at(c, row)),
                tipo_entidad: type_col.as_ref().and_then(|c| string_at(c, row)),
            });
        }
    }

    Ok(collect_rows(rows))
}

// -- Parquet / Arrow helpers --

fn as_float64(col: &ArrayRef, name: &str) -> Result<ArrayRef> {
    cast(col, &DataType::Float64)
        .with_context(|| format!("column '{name}' is not numeric ({:?})", col.data_type()))
}

fn as_utf8(col: &ArrayRef, name: &str) -> Result<ArrayRef> {
    cast(col, &DataType::Utf8)
        .with_context(|| format!("column '{name}' is not text ({:?})", col.data_type()))
}

fn float_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_primitive::<Float64Type>().value(row))
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    non_empty(col.as_string::<i32>().value(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    #[test]
    fn csv_drops_rows_without_entity_or_year() {
        let text = "\
entity,year,annual_co2_emissions,tipo_entidad
Afghanistan,1940,100,Pais
,1940,5,Pais
Albania,,50,Pais
Albania,1941.0,50.5,Pais
World,1940,,Region
";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0], Record::new("Afghanistan", 1940, 100.0, "Pais"));
        assert_eq!(ds.records()[1].year, 1941);
        assert_eq!(ds.records()[1].annual_co2_emissions, 50.5);
        assert_eq!(ds.records()[2].annual_co2_emissions, 0.0);
        assert_eq!(ds.records()[2].tipo_entidad, "Region");
    }

    #[test]
    fn csv_rejects_fractional_years_and_tolerates_short_rows() {
        let text = "entity,year,annual_co2_emissions,tipo_entidad\nA,1940.5,1,Pais\nB,1950\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].entity, "B");
        assert_eq!(ds.records()[0].tipo_entidad, "");
    }

    #[test]
    fn csv_without_year_header_is_an_error() {
        let err = read_csv("entity,value\nA,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'year'"));
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let ds = read_json(
            r#"[
                {"entity": "Chad", "year": 1990, "annual_co2_emissions": 7.5, "tipo_entidad": "Pais"},
                {"entity": "Chile", "year": "1991", "annual_co2_emissions": "8"},
                {"entity": null, "year": 1992}
            ]"#,
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].year, 1991);
        assert_eq!(ds.records()[1].annual_co2_emissions, 8.0);
    }

    #[test]
    fn csv_row_with_invalid_utf8_is_dropped() {
        let mut text = b"entity,year,annual_co2_emissions,tipo_entidad\nPeru,2000,3,Pais\n".to_vec();
        text.extend_from_slice(b"Bad\xff\xfe,2001,4,Pais\n");
        text.extend_from_slice(b"Chad,2000,5,Pais\n");

        let ds = read_csv(text.as_slice()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.entities(), ["Chad", "Peru"]);
    }

    #[test]
    fn json_non_object_rows_are_dropped() {
        let ds = read_json(
            r#"[
                {"entity": "Chad", "year": 1990},
                42,
                {"entity": "Peru", "year": 1991}
            ]"#,
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.entities(), ["Chad", "Peru"]);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(read_json(r#"{"entity": "Chad"}"#).is_err());
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            csv_file,
            "entity,year,annual_co2_emissions,tipo_entidad\nPeru,2000,3,Pais\n"
        )
        .unwrap();
        let ds = load_file(csv_file.path()).unwrap();
        assert_eq!(ds.entities(), ["Peru"]);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(load_file(other.path()).is_err());
    }

    #[test]
    fn parquet_columns_are_cast() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(ENTITY, DataType::Utf8, true),
            Field::new(YEAR, DataType::Int64, true),
            Field::new(EMISSIONS, DataType::Float64, true),
            Field::new(ENTITY_TYPE, DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Spain"), None, Some("Italy")])),
                Arc::new(Int64Array::from(vec![Some(2001), Some(2001), None])),
                Arc::new(Float64Array::from(vec![Some(9.0), Some(1.0), Some(2.0)])),
                Arc::new(StringArray::from(vec![Some("Pais"), Some("Pais"), Some("Pais")])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0], Record::new("Spain", 2001, 9.0, "Pais"));
    }
}
