use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct YieldRow {
    crop: &'static str,
    year: i64,
    season: &'static str,
    area: f64,
    fertilizer: f64,
    pesticide: f64,
    carbon_footprint: Option<f64>,
}

/// (crop, typical footprint per hectare). `None` means no footprint history.
const CROPS: [(&str, Option<f64>); 5] = [
    ("Rice", Some(2.1)),
    ("Wheat", Some(1.4)),
    ("Maize", Some(1.1)),
    ("Sugarcane", Some(3.2)),
    ("Millet", None),
];

const SEASONS: [&str; 2] = ["Kharif", "Rabi"];

const MEASURES: [(&str, &str); 9] = [
    ("Rice", "Adopt alternate wetting and drying irrigation"),
    ("Rice", "Use drip irrigation"),
    ("Rice", "Adopt alternate wetting and drying irrigation"),
    ("Wheat", "Use drip irrigation"),
    ("Wheat", "Rotate crops with legumes"),
    ("Maize", "Apply split doses of nitrogen fertilizer"),
    ("Sugarcane", "Mulch with crop residue instead of burning"),
    ("Sugarcane", "Use drip fertigation"),
    ("Millet", "Intercrop with pulses"),
];

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut rows = Vec::new();
    for year in 2018..2022 {
        for &(crop, typical) in &CROPS {
            for &season in &SEASONS {
                let area = rng.uniform(50.0, 5000.0).round();
                rows.push(YieldRow {
                    crop,
                    year,
                    season,
                    area,
                    fertilizer: (area * rng.uniform(80.0, 160.0)).round(),
                    pesticide: (area * rng.uniform(0.2, 0.6)).round(),
                    carbon_footprint: typical.map(|cf| cf * rng.uniform(0.8, 1.2)),
                });
            }
        }
    }
    // a divide-by-zero artefact of the upstream export; readers must skip it
    rows[0].carbon_footprint = Some(f64::INFINITY);

    let yield_csv = out_dir.join("crop_yield_with_carbon_footprint.csv");
    write_yield_csv(&yield_csv, &rows)?;
    let yield_parquet = out_dir.join("crop_yield_with_carbon_footprint.parquet");
    write_yield_parquet(&yield_parquet, &rows)?;
    let measures_csv = out_dir.join("crop_measures.csv");
    write_measures_csv(&measures_csv)?;

    info!("sample data written to {}", out_dir.display());
    println!(
        "Wrote {} yield rows to {} and {}, {} measures to {}",
        rows.len(),
        yield_csv.display(),
        yield_parquet.display(),
        MEASURES.len(),
        measures_csv.display()
    );
    Ok(())
}

fn write_yield_csv(path: &Path, rows: &[YieldRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating yield CSV")?;
    writer.write_record([
        "Crop",
        "Crop_Year",
        "Season",
        "Area",
        "Fertilizer",
        "Pesticide",
        "Carbon_Footprint",
    ])?;
    for row in rows {
        let cf = row.carbon_footprint.map(|v| format!("{v:.4}")).unwrap_or_default();
        writer.write_record([
            row.crop.to_string(),
            row.year.to_string(),
            row.season.to_string(),
            row.area.to_string(),
            row.fertilizer.to_string(),
            row.pesticide.to_string(),
            cf,
        ])?;
    }
    writer.flush().context("flushing yield CSV")?;
    Ok(())
}

fn write_measures_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating measures CSV")?;
    writer.write_record(["Crop", "Necessary_Measures"])?;
    for (crop, measure) in MEASURES {
        writer.write_record([crop, measure])?;
    }
    writer.flush().context("flushing measures CSV")?;
    Ok(())
}

fn write_yield_parquet(path: &Path, rows: &[YieldRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Crop", DataType::Utf8, false),
        Field::new("Crop_Year", DataType::Int64, false),
        Field::new("Season", DataType::Utf8, false),
        Field::new("Area", DataType::Float64, false),
        Field::new("Fertilizer", DataType::Float64, false),
        Field::new("Pesticide", DataType::Float64, false),
        Field::new("Carbon_Footprint", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.crop))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.season))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.area))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.fertilizer))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.pesticide))),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.carbon_footprint).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
