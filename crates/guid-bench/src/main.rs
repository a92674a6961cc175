//! Benchmark for GUID generation, text encoding and signing.
//!
//! Usage: `bench-guid [ITERATIONS]` (default 1,000,000).

use std::hint::black_box;
use std::time::{Duration, Instant};

use guid::Guid;

const DEFAULT_ITERS: u32 = 1_000_000;
const WARMUP_ITERS: u32 = 1_000;

const SAMPLE: &str = "xokp8l85n201pq00dw00rs6rgq";
const SAMPLE_DATA: &[u8] = b"music television";

fn bench<T>(name: &str, iters: u32, mut f: impl FnMut() -> T) -> Duration {
    for _ in 0..WARMUP_ITERS {
        black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iters {
        black_box(f());
    }
    let per_op = start.elapsed() / iters;

    println!("{:<12} {:>10?}/op", name, per_op);
    per_op
}

fn main() {
    let iters = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .filter(|&n: &u32| n > 0)
        .unwrap_or(DEFAULT_ITERS);

    let sample: Guid = SAMPLE.parse().expect("sample guid must parse");
    let digest = sample
        .sign(SAMPLE_DATA)
        .expect("sample data is non-empty");

    println!("=== GUID ({} iterations) ===", iters);
    let new = bench("new", iters, Guid::new);
    let format = bench("to_string", iters, || black_box(sample).to_string());
    let parse = bench("parse", iters, || Guid::parse(black_box(SAMPLE.as_bytes())));
    bench("slug", iters, || black_box(sample).slug());
    let sign = bench("sign", iters, || black_box(sample).sign(SAMPLE_DATA));
    bench("did_sign", iters, || black_box(sample).did_sign(&digest));

    println!("\n=== Summary ===");
    println!(
        "Generate + format: {:.1} M/s",
        1.0 / (new + format).as_secs_f64() / 1_000_000.0
    );
    println!(
        "Parse throughput:  {:.2} MB/s",
        (SAMPLE.len() as f64 / 1_000_000.0) / parse.as_secs_f64()
    );
    println!(
        "Sign throughput:   {:.2} MB/s",
        (SAMPLE_DATA.len() as f64 / 1_000_000.0) / sign.as_secs_f64()
    );
}
