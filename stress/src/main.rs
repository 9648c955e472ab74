use std::{sync::Arc, time::Instant};

use clap::{Parser, ValueEnum};
use hdrhistogram::Histogram;

use tollgate::{
    AccountId, CreditGate, Interval, MemoryCounterStore, RedisCounterStore,
    RedisCounterStoreOptions, TollgateError, WindowSeconds,
};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Provider {
    Memory,
    Redis,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tollgate-stress",
    about = "Load test / benchmark harness for tollgate"
)]
struct Args {
    #[arg(long, value_enum, default_value_t = Provider::Memory)]
    provider: Provider,

    /// Redis connection URL (redis provider only).
    #[arg(long, default_value = "redis://127.0.0.1:6379/")]
    redis_url: String,

    /// Number of distinct accounts to spread calls over.
    #[arg(long, default_value_t = 100)]
    accounts: u64,

    /// Total number of allow() calls to issue.
    #[arg(long, default_value_t = 100_000)]
    calls: u64,

    /// Cost paid by each call.
    #[arg(long, default_value_t = 1)]
    cost: u64,

    /// Window length handed out by the interval supplier.
    #[arg(long, default_value_t = 60)]
    window_seconds: u64,

    /// Credit budget handed out by the interval supplier.
    #[arg(long, default_value_t = 10_000)]
    credits: u64,

    /// Number of concurrent workers.
    #[arg(long, default_value_t = 8)]
    concurrency: u64,
}

enum AnyGate {
    Memory(CreditGate<MemoryCounterStore>),
    Redis(CreditGate<RedisCounterStore>),
}

impl AnyGate {
    async fn allow(
        &self,
        account: &AccountId,
        cost: u64,
        interval: Interval,
    ) -> Result<bool, TollgateError> {
        match self {
            AnyGate::Memory(gate) => gate.allow(account, cost, || async move { Ok(interval) }).await,
            AnyGate::Redis(gate) => gate.allow(account, cost, || async move { Ok(interval) }).await,
        }
    }
}

struct WorkerReport {
    latencies_us: Histogram<u64>,
    allowed: u64,
    throttled: u64,
    errors: u64,
}

async fn run_worker(gate: Arc<AnyGate>, args: Args, calls: u64) -> WorkerReport {
    let mut report = WorkerReport {
        latencies_us: Histogram::new(3).unwrap(),
        allowed: 0,
        throttled: 0,
        errors: 0,
    };

    let window = WindowSeconds::try_from(args.window_seconds).expect("invalid window");
    let interval = Interval::new(window, args.credits);

    for _ in 0..calls {
        let n: u64 = rand::random();
        let account = AccountId::try_from(format!("a{}", n % args.accounts)).unwrap();

        let started = Instant::now();
        let verdict = gate.allow(&account, args.cost, interval).await;
        let elapsed_us = started.elapsed().as_micros().max(1) as u64;
        report.latencies_us.record(elapsed_us).unwrap();

        match verdict {
            Ok(true) => report.allowed += 1,
            Ok(false) => report.throttled += 1,
            Err(err) => {
                report.errors += 1;
                eprintln!("allow failed: {err}");
            }
        }
    }

    report
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let gate = match args.provider {
        Provider::Memory => Arc::new(AnyGate::Memory(CreditGate::new(MemoryCounterStore::new()))),
        Provider::Redis => {
            let client = redis::Client::open(args.redis_url.as_str()).expect("invalid redis url");
            let connection_manager = client
                .get_connection_manager()
                .await
                .expect("failed to connect to redis");

            Arc::new(AnyGate::Redis(CreditGate::new(RedisCounterStore::new(
                RedisCounterStoreOptions {
                    connection_manager,
                    prefix: None,
                },
            ))))
        }
    };

    let calls_per_worker = args.calls / args.concurrency;

    let started = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..args.concurrency {
        let gate = Arc::clone(&gate);
        let args = args.clone();
        handles.push(tokio::spawn(run_worker(gate, args, calls_per_worker)));
    }

    let mut latencies_us = Histogram::<u64>::new(3).unwrap();
    let mut allowed = 0_u64;
    let mut throttled = 0_u64;
    let mut errors = 0_u64;

    for handle in handles {
        let report = handle.await.expect("worker panicked");
        latencies_us.add(&report.latencies_us).unwrap();
        allowed += report.allowed;
        throttled += report.throttled;
        errors += report.errors;
    }

    let elapsed = started.elapsed();
    let total = allowed + throttled + errors;
    let qps = total as f64 / elapsed.as_secs_f64();

    println!("provider:    {:?}", args.provider);
    println!("calls:       {total}");
    println!("time:        {elapsed:?}");
    println!("throughput:  {qps:.0} calls/s");
    println!("allowed:     {allowed}");
    println!("throttled:   {throttled}");
    println!("errors:      {errors}");
    println!(
        "latency us:  p50={} p99={} p999={} max={}",
        latencies_us.value_at_quantile(0.5),
        latencies_us.value_at_quantile(0.99),
        latencies_us.value_at_quantile(0.999),
        latencies_us.max()
    );
}
