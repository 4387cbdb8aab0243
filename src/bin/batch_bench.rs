use num_traits::AsPrimitive;
use serde::Serialize;
use simd_batch::config::{BuildConfig, Extension, BUILD};
use simd_batch::dispatch::{self, KernelOf, NATIVE_F32_LANES, NATIVE_I32_LANES};
use simd_batch::kernel::Kernel;
use simd_batch::types::Element;
use std::error::Error;
use std::hint::black_box;
use std::time::Instant;

#[derive(Debug)]
struct Args {
    iterations: usize,
    repeats: usize,
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            repeats: 7,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Measurement {
    element: &'static str,
    lanes: usize,
    kernel: Extension,
    workload: &'static str,
    min_ns_per_batch: f64,
}

#[derive(Debug, Serialize)]
struct BenchmarkReport {
    build: BuildConfig,
    host_best: Extension,
    iterations: usize,
    repeats: usize,
    measurements: Vec<Measurement>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;

    BUILD.log_summary();
    dispatch::verify_host()?;

    let mut measurements = Vec::new();
    bench_kernel::<f32, KernelOf<f32, { NATIVE_F32_LANES }>, { NATIVE_F32_LANES }>(
        &args,
        &mut measurements,
    );
    bench_kernel::<i32, KernelOf<i32, { NATIVE_I32_LANES }>, { NATIVE_I32_LANES }>(
        &args,
        &mut measurements,
    );
    #[cfg(not(feature = "native-only"))]
    {
        use simd_batch::kernel::Fallback;
        bench_kernel::<f32, Fallback, { NATIVE_F32_LANES }>(&args, &mut measurements);
        bench_kernel::<i32, Fallback, { NATIVE_I32_LANES }>(&args, &mut measurements);
    }

    let report = BenchmarkReport {
        build: BUILD,
        host_best: dispatch::best_host_extension(),
        iterations: args.iterations,
        repeats: args.repeats,
        measurements,
    };

    println!("=== batch kernel report ===");
    println!("build best: {}", report.build.best());
    println!("host best: {}", report.host_best);
    println!("iterations: {} x {} repeats", report.iterations, report.repeats);
    println!();
    println!(
        "{:<8} {:>5}  {:<9} {:<8} {:>14}",
        "element", "lanes", "kernel", "workload", "min ns/batch"
    );
    for m in &report.measurements {
        println!(
            "{:<8} {:>5}  {:<9} {:<8} {:>14.3}",
            m.element,
            m.lanes,
            m.kernel.to_string(),
            m.workload,
            m.min_ns_per_batch
        );
    }
    if args.json {
        println!("json: {}", serde_json::to_string(&report)?);
    }

    Ok(())
}

/// Time each workload on kernel `K` and append one measurement per workload.
fn bench_kernel<T, K, const N: usize>(args: &Args, out: &mut Vec<Measurement>)
where
    T: Element,
    K: Kernel<T, N>,
    f64: AsPrimitive<T>,
{
    let a = K::from_array(std::array::from_fn(|i| (1.0 + (i % 7) as f64).as_()));
    let b = K::from_array(std::array::from_fn(|i| (2.0 + (i % 5) as f64).as_()));
    let rows = [a; N];

    let mut record = |workload: &'static str, ns: f64| {
        out.push(Measurement {
            element: T::NAME,
            lanes: N,
            kernel: K::EXTENSION,
            workload,
            min_ns_per_batch: ns,
        })
    };

    record("add", min_latency(args, || K::add(black_box(a), black_box(b))));
    record("mul", min_latency(args, || K::mul(black_box(a), black_box(b))));
    record(
        "fma",
        min_latency(args, || K::fma(black_box(a), black_box(b), black_box(a))),
    );
    record("div", min_latency(args, || K::div(black_box(a), black_box(b))));
    record("hadd", min_latency(args, || K::hadd(black_box(a))));
    record("haddp", min_latency(args, || K::haddp(black_box(rows))));

    log::debug!("timed {} x {} on {}", T::NAME, N, K::EXTENSION);
}

/// Fastest of `repeats` runs, in nanoseconds per call of `op`.
fn min_latency<R>(args: &Args, mut op: impl FnMut() -> R) -> f64 {
    let iterations = args.iterations.max(1);
    let mut best = f64::INFINITY;
    for _ in 0..args.repeats.max(1) {
        let start = Instant::now();
        for _ in 0..iterations {
            black_box(op());
        }
        let ns = start.elapsed().as_nanos() as f64 / iterations as f64;
        best = best.min(ns);
    }
    best
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);

    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--iterations" => {
                let v = required_value(&flag, it.next())?;
                args.iterations = v.parse()?;
            }
            "--repeats" => {
                let v = required_value(&flag, it.next())?;
                args.repeats = v.parse()?;
            }
            "--json" => {
                args.json = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {flag}").into());
            }
        }
    }

    Ok(args)
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, Box<dyn Error>> {
    value.ok_or_else(|| format!("missing value for {flag}").into())
}

fn print_help() {
    println!(
        "batch_bench\n\
        Times batch workloads on the selected kernels and on the fallback.\n\n\
        Usage:\n\
          cargo run --release --bin batch_bench -- [options]\n\n\
        Options:\n\
          --iterations <int>   calls per timed run (default: 100000)\n\
          --repeats <int>      timed runs per workload; the minimum is reported (default: 7)\n\
          --json               also print the report as one JSON line\n\
          --help               print this help\n\n\
        Logging is controlled with RUST_LOG (default: info).\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_kernel_records_every_workload() {
        let args = Args {
            iterations: 10,
            repeats: 2,
            json: false,
        };
        let mut out = Vec::new();
        bench_kernel::<f32, KernelOf<f32, 4>, 4>(&args, &mut out);
        let names: Vec<_> = out.iter().map(|m| m.workload).collect();
        assert_eq!(names, ["add", "mul", "fma", "div", "hadd", "haddp"]);
        assert!(out.iter().all(|m| m.lanes == 4 && m.min_ns_per_batch.is_finite()));
    }

    #[test]
    fn report_serializes() {
        let report = BenchmarkReport {
            build: BUILD,
            host_best: Extension::Fallback,
            iterations: 1,
            repeats: 1,
            measurements: Vec::new(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"measurements\":[]"));
    }
}
