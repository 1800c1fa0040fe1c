//! spsc_bench - Producer/Consumer Throughput Benchmark
//!
//! Menjalankan satu producer thread dan satu consumer thread di atas satu
//! ring buffer, dengan ukuran chunk acak per panggilan, lalu memverifikasi
//! bahwa setiap elemen sampai tepat sekali dan berurutan.
//!
//! Usage:
//!   cargo run --release --bin spsc_bench -- [OPTIONS]
//!
//! Options:
//!   --elements <N>   Jumlah elemen yang ditransfer (default: 10000000)
//!   --capacity <N>   Capacity yang diminta (default: 4096)
//!   --chunk <N>      Ukuran chunk maksimum per write/read (default: 256)
//!   --pin            Pin producer ke CPU 0 dan consumer ke CPU 1 (Linux)

use std::thread;
use std::time::{Duration, Instant};

use spsc_ring::{init_tracing, RingBuffer, RingError};

/// Benchmark configuration
struct BenchConfig {
    elements: u64,
    capacity: usize,
    chunk: usize,
    pin: bool,
    verbose: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            elements: 10_000_000,
            capacity: 4096,
            chunk: 256,
            pin: false,
            verbose: false,
        }
    }
}

/// Statistik satu sisi (producer atau consumer)
#[derive(Default)]
struct SideStats {
    elements: u64,
    calls: u64,
    stalled_calls: u64,
    pinned: bool,
}

/// Hasil akhir benchmark
struct BenchReport {
    capacity: usize,
    producer: SideStats,
    consumer: SideStats,
    corrupted: u64,
    max_observed_len: usize,
    duration: Duration,
}

/// LCG yang sama dengan generator data di test
#[inline(always)]
fn next_random(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    *state >> 33
}

#[cfg(target_os = "linux")]
fn pin_to_cpu(cpu: usize) -> bool {
    // SAFETY: cpu_set_t boleh zero-initialized; pid 0 berarti thread pemanggil
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
    }
}

#[cfg(not(target_os = "linux"))]
fn pin_to_cpu(_cpu: usize) -> bool {
    false
}

fn run_single_thread_latency(config: &BenchConfig) {
    println!("📊 Single-Thread Batch Latency (write/read)");
    println!("-------------------------------------------");

    const ROUNDS: usize = 200_000;
    let mut rb = RingBuffer::<u64>::new(config.capacity);
    let batch = config.chunk.clamp(1, rb.capacity());
    let src: Vec<u64> = (0..batch as u64).collect();
    let mut dst = vec![0u64; batch];

    // Cursor dimulai di tengah storage supaya sebagian batch kena wraparound
    let offset = rb.capacity() / 2 + 1;
    let mut moved = 0;
    while moved < offset {
        let n = rb.write(&src[..batch.min(offset - moved)]);
        moved += rb.read(&mut dst[..n]);
    }

    let mut transferred = 0usize;
    let start = Instant::now();
    for _ in 0..ROUNDS {
        let n = rb.write(&src);
        transferred += rb.read(&mut dst[..n]);
    }
    let duration = start.elapsed();

    let batch_ns = duration.as_nanos() as f64 / ROUNDS as f64;
    println!("  Batch size:   {}", batch);
    println!("  Rounds:       {}", ROUNDS);
    println!("  Write+read:   {:.2} ns/batch ({:.2} ns/element)", batch_ns, batch_ns / batch as f64);
    println!(
        "  Throughput:   {:.2} M elements/sec\n",
        transferred as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

fn run_transfer(config: &BenchConfig) -> Result<BenchReport, RingError> {
    let rb = RingBuffer::<u64>::try_new(config.capacity)?;
    let capacity = rb.capacity();
    let (mut producer, mut consumer) = rb.split();

    let total = config.elements;
    let max_chunk = config.chunk.max(1);
    let pin = config.pin;

    let start = Instant::now();

    let producer_thread = thread::Builder::new()
        .name("producer".to_string())
        .spawn(move || {
            let mut stats = SideStats {
                pinned: pin && pin_to_cpu(0),
                ..SideStats::default()
            };
            let mut buf = vec![0u64; max_chunk];
            let mut rng = 0x2545_F491_4F6C_DD1D_u64;
            let mut next = 0u64;

            while next < total {
                let want = (next_random(&mut rng) as usize % max_chunk + 1)
                    .min((total - next) as usize);
                for (i, slot) in buf[..want].iter_mut().enumerate() {
                    *slot = next + i as u64;
                }

                let n = producer.write(&buf[..want]);
                stats.calls += 1;
                if n == 0 {
                    stats.stalled_calls += 1;
                    std::hint::spin_loop();
                }
                next += n as u64;
            }

            stats.elements = next;
            stats
        })
        .expect("failed to spawn producer thread");

    let mut stats = SideStats {
        pinned: pin && pin_to_cpu(1),
        ..SideStats::default()
    };
    let mut buf = vec![0u64; max_chunk];
    let mut rng = 0x9E37_79B9_7F4A_7C15_u64;
    let mut expected = 0u64;
    let mut corrupted = 0u64;
    let mut max_observed_len = 0usize;

    while expected < total {
        let want = next_random(&mut rng) as usize % max_chunk + 1;
        let n = consumer.read(&mut buf[..want]);
        stats.calls += 1;
        if n == 0 {
            stats.stalled_calls += 1;
            max_observed_len = max_observed_len.max(consumer.len());
            std::hint::spin_loop();
            continue;
        }

        for &v in &buf[..n] {
            if v != expected {
                corrupted += 1;
            }
            expected += 1;
        }
    }
    stats.elements = expected;

    let producer_stats = producer_thread.join().expect("producer thread panicked");
    let duration = start.elapsed();

    Ok(BenchReport {
        capacity,
        producer: producer_stats,
        consumer: stats,
        corrupted,
        max_observed_len,
        duration,
    })
}

fn print_report(config: &BenchConfig, report: &BenchReport) {
    println!("📊 SPSC Transfer (1 producer, 1 consumer)");
    println!("-----------------------------------------");
    println!("  Capacity:      {} (requested {})", report.capacity, config.capacity);
    println!("  Max chunk:     {}", config.chunk.max(1));
    println!("  Elements:      {}", report.consumer.elements);
    println!("  Duration:      {:.3}s", report.duration.as_secs_f64());
    println!(
        "  Throughput:    {:.2} M elements/sec",
        report.consumer.elements as f64 / report.duration.as_secs_f64() / 1_000_000.0
    );
    println!(
        "  Bandwidth:     {:.2} MB/sec",
        (report.consumer.elements * 8) as f64 / report.duration.as_secs_f64() / 1_000_000.0
    );

    if config.verbose {
        println!("\nProducer:");
        println!("  Calls:         {}", report.producer.calls);
        println!("  Full stalls:   {}", report.producer.stalled_calls);
        println!("  Pinned:        {}", report.producer.pinned);
        println!("\nConsumer:");
        println!("  Calls:         {}", report.consumer.calls);
        println!("  Empty stalls:  {}", report.consumer.stalled_calls);
        println!("  Pinned:        {}", report.consumer.pinned);
        println!("  Max len seen:  {}", report.max_observed_len);
    }

    if report.corrupted == 0 && report.producer.elements == report.consumer.elements {
        println!("\n✅ No dropped, duplicated or corrupted elements");
    } else {
        println!(
            "\n⚠️  {} corrupted elements (written {}, read {})",
            report.corrupted, report.producer.elements, report.consumer.elements
        );
    }
}

/// Parse command line arguments
fn parse_args() -> BenchConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = BenchConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--elements" | "-n" => {
                if i + 1 < args.len() {
                    config.elements = args[i + 1].parse().unwrap_or(10_000_000);
                    i += 1;
                }
            }
            "--capacity" | "-c" => {
                if i + 1 < args.len() {
                    config.capacity = args[i + 1].parse().unwrap_or(4096);
                    i += 1;
                }
            }
            "--chunk" | "-k" => {
                if i + 1 < args.len() {
                    config.chunk = args[i + 1].parse().unwrap_or(256);
                    i += 1;
                }
            }
            "--pin" => {
                config.pin = true;
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("spsc_bench - SPSC ring buffer throughput benchmark\n");
                println!("Usage: spsc_bench [OPTIONS]\n");
                println!("Options:");
                println!("  -n, --elements <N>  Elements to transfer (default: 10000000)");
                println!("  -c, --capacity <N>  Requested capacity (default: 4096)");
                println!("  -k, --chunk <N>     Max elements per write/read (default: 256)");
                println!("      --pin           Pin producer/consumer to CPU 0/1 (Linux)");
                println!("  -v, --verbose       Show per-side statistics");
                println!("  -h, --help          Show this help message");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    init_tracing();
    let config = parse_args();

    println!("🚀 spsc-ring benchmark");
    println!("======================\n");

    run_single_thread_latency(&config);

    match run_transfer(&config) {
        Ok(report) => {
            print_report(&config, &report);
            if report.corrupted != 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Benchmark failed: {}", e);
            std::process::exit(1);
        }
    }
}
