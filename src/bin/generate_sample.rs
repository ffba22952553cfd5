//! Writes `sample_data.csv` and `sample_data.parquet`: a noisy Lorenz
//! trajectory sampled on a fixed step, one column per coordinate.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STEPS: usize = 2000;
const DT: f64 = 0.01;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One explicit Euler step of the Lorenz system (sigma 10, rho 28, beta 8/3).
fn lorenz_step([x, y, z]: [f64; 3], dt: f64) -> [f64; 3] {
    let dx = 10.0 * (y - x);
    let dy = x * (28.0 - z) - y;
    let dz = x * y - (8.0 / 3.0) * z;
    [x + dx * dt, y + dy * dt, z + dz * dt]
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut state = [1.0, 1.0, 1.0];
    let mut times = Vec::with_capacity(STEPS);
    let mut columns: [Vec<f64>; 3] = Default::default();

    for step in 0..STEPS {
        state = lorenz_step(state, DT);
        times.push(format!("{:.2}", step as f64 * DT));
        for (col, &v) in columns.iter_mut().zip(&state) {
            col.push(v + rng.gauss(0.0, 0.1));
        }
    }

    // CSV
    let csv_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record(["Time", "x", "y", "z"])?;
    for (i, t) in times.iter().enumerate() {
        writer.write_record([
            t.clone(),
            format!("{:.4}", columns[0][i]),
            format!("{:.4}", columns[1][i]),
            format!("{:.4}", columns[2][i]),
        ])?;
    }
    writer.flush()?;

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("Time", DataType::Utf8, false),
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("z", DataType::Float64, false),
    ]));
    let [xs, ys, zs] = columns;
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(times)),
            Arc::new(Float64Array::from(xs)),
            Arc::new(Float64Array::from(ys)),
            Arc::new(Float64Array::from(zs)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;

    println!("Wrote {STEPS} Lorenz samples to {csv_path} and {parquet_path}");
    Ok(())
}
