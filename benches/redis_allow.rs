use criterion::{Criterion, criterion_group, criterion_main};

#[cfg(feature = "redis-tokio")]
mod enabled {
    use std::{env, hint::black_box};

    use criterion::Criterion;

    use tollgate::{
        AccountId, CreditGate, Interval, KeyPrefix, RedisCounterStore, RedisCounterStoreOptions,
        WindowSeconds,
    };

    fn account(s: &str) -> AccountId {
        AccountId::try_from(s.to_string()).unwrap()
    }

    fn interval(seconds: u64, credits: u64) -> Interval {
        Interval::new(WindowSeconds::try_from(seconds).unwrap(), credits)
    }

    pub fn bench_hot_account_allowed(c: &mut Criterion) {
        let Ok(url) = env::var("REDIS_URL") else {
            eprintln!("skipping: REDIS_URL not set");
            return;
        };

        let mut group = c.benchmark_group("redis_allow/hot_account");
        group.sample_size(50);

        group.bench_function("allow/live_window", |b| {
            let rt = tokio::runtime::Runtime::new().unwrap();

            let gate = rt.block_on(async {
                let client = redis::Client::open(url.as_str()).unwrap();
                let connection_manager = client.get_connection_manager().await.unwrap();

                let n: u64 = rand::random();
                let prefix = KeyPrefix::try_from(format!("tollgate_bench_{n}")).unwrap();

                let gate = CreditGate::new(RedisCounterStore::new(RedisCounterStoreOptions {
                    connection_manager,
                    prefix: Some(prefix),
                }));

                let a = account("k");
                gate.allow(&a, 1, || async { Ok(interval(3600, 1_000_000_000)) })
                    .await
                    .unwrap();

                gate
            });

            let a = account("k");
            b.iter(|| {
                rt.block_on(async {
                    black_box(
                        gate.allow(black_box(&a), black_box(1), || async {
                            Ok(interval(3600, 1_000_000_000))
                        })
                        .await
                        .unwrap(),
                    );
                });
            });
        });

        group.finish();
    }
}

#[cfg(feature = "redis-tokio")]
fn bench_hot_account_allowed(c: &mut Criterion) {
    enabled::bench_hot_account_allowed(c)
}

#[cfg(not(feature = "redis-tokio"))]
fn bench_hot_account_allowed(_: &mut Criterion) {}

criterion_group!(benches, bench_hot_account_allowed);
criterion_main!(benches);
