use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic startup funding dataset as CSV and Parquet.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct Args {
    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Number of funding rounds to generate.
    #[arg(long, default_value_t = 400)]
    rows: usize,

    /// PRNG seed; the same seed always yields the same file.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const STARTUPS: [&str; 14] = [
    "Byju's", "Flipkart", "Ola", "Paytm", "Swiggy", "Zomato", "Oyo", "Razorpay", "Meesho",
    "Cred", "Dream11", "PhonePe", "Udaan", "Lenskart",
];
const INVESTORS: [&str; 12] = [
    "Sequoia Capital", "Accel Partners", "Tiger Global", "SoftBank", "Kalaari Capital",
    "Blume Ventures", "Nexus Venture Partners", "Matrix Partners", "Lightspeed", "Naspers",
    "Y Combinator", "Chiratae Ventures",
];
const VERTICALS: [&str; 7] = [
    "Fintech", "Edtech", "E-Commerce", "Food Tech", "Transportation", "Healthcare", "SaaS",
];
const CITIES: [&str; 6] = ["Bengaluru", "Mumbai", "Gurugram", "New Delhi", "Pune", "Hyderabad"];
const ROUNDS: [&str; 6] = ["Seed", "Angel", "Series A", "Series B", "Series C", "Private Equity"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut x = seed;
        let state = std::array::from_fn(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            x
        });
        SimpleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        result
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One generated row, every cell already as text (as a scraped CSV would be).
struct Row {
    date: Option<String>,
    startup: String,
    investors: Option<String>,
    vertical: String,
    city: String,
    round: String,
    amount: Option<String>,
}

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    let first_day = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN);

    (0..n)
        .map(|_| {
            let date = first_day + chrono::Days::new(rng.below(6 * 365) as u64);

            let n_investors = 1 + rng.below(3);
            let mut investors: Vec<&str> = Vec::with_capacity(n_investors);
            while investors.len() < n_investors {
                let name = rng.pick(&INVESTORS);
                if !investors.contains(&name) {
                    investors.push(name);
                }
            }

            // Log-normal-ish amounts in crore, with a heavy tail.
            let amount = (rng.next_f64() * 6.0).exp().round();

            Row {
                // A few rows carry the dirt the loader has to cope with.
                date: if rng.chance(0.02) {
                    Some("unknown".to_string())
                } else {
                    Some(date.format("%d/%m/%Y").to_string())
                },
                startup: rng.pick(&STARTUPS).to_string(),
                investors: (!rng.chance(0.05)).then(|| investors.join(", ")),
                vertical: rng.pick(&VERTICALS).to_string(),
                city: rng.pick(&CITIES).to_string(),
                round: rng.pick(&ROUNDS).to_string(),
                amount: if rng.chance(0.04) {
                    Some("undisclosed".to_string())
                } else {
                    Some(format!("{amount}"))
                },
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &PathBuf) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["date", "startup", "investors", "vertical", "city", "round", "amount"])?;
    for row in rows {
        writer.write_record([
            row.date.as_deref().unwrap_or(""),
            row.startup.as_str(),
            row.investors.as_deref().unwrap_or(""),
            row.vertical.as_str(),
            row.city.as_str(),
            row.round.as_str(),
            row.amount.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &PathBuf) -> Result<()> {
    let text = |f: fn(&Row) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    // Parquet gets a real numeric amount column; unparseable amounts become null.
    let amounts: ArrayRef = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.amount.as_deref().and_then(|a| a.parse::<f64>().ok()))
            .collect::<Vec<_>>(),
    ));

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, true),
        Field::new("startup", DataType::Utf8, true),
        Field::new("investors", DataType::Utf8, true),
        Field::new("vertical", DataType::Utf8, true),
        Field::new("city", DataType::Utf8, true),
        Field::new("round", DataType::Utf8, true),
        Field::new("amount", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.date.as_deref()),
            text(|r| Some(r.startup.as_str())),
            text(|r| r.investors.as_deref()),
            text(|r| Some(r.vertical.as_str())),
            text(|r| Some(r.city.as_str())),
            text(|r| Some(r.round.as_str())),
            amounts,
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let rows = generate_rows(&mut rng, args.rows);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let csv_path = args.out.join("sample_funding.csv");
    let parquet_path = args.out.join("sample_funding.parquet");

    write_csv(&rows, &csv_path)?;
    write_parquet(&rows, &parquet_path)?;

    log::info!("seed {} produced {} rows", args.seed, rows.len());
    println!(
        "Wrote {} funding rounds to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = generate_rows(&mut SimpleRng::new(7), 20);
        let b = generate_rows(&mut SimpleRng::new(7), 20);
        let key = |rows: &[Row]| -> Vec<(String, Option<String>)> {
            rows.iter().map(|r| (r.startup.clone(), r.amount.clone())).collect()
        };
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn investors_are_distinct_within_a_round() {
        let rows = generate_rows(&mut SimpleRng::new(1), 200);
        for row in rows.iter().filter_map(|r| r.investors.as_deref()) {
            let names: Vec<&str> = row.split(", ").collect();
            let mut deduped = names.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(names.len(), deduped.len());
        }
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let rows = generate_rows(&mut SimpleRng::new(3), 10);
        let csv_path = dir.path().join("s.csv");
        let pq_path = dir.path().join("s.parquet");
        write_csv(&rows, &csv_path).unwrap();
        write_parquet(&rows, &pq_path).unwrap();

        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text.lines().count(), 11);
        assert!(std::fs::metadata(&pq_path).unwrap().len() > 0);
    }
}
