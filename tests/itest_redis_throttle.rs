#![cfg(any(feature = "redis-tokio", feature = "redis-smol"))]

use std::{
    env,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use tollgate::{
    AccountId, Interval, IntervalError, KeyPrefix, RedisCounterStoreOptions, Tollgate,
    TollgateOptions, WindowSeconds,
};

fn redis_url() -> Option<String> {
    env::var("REDIS_URL").ok()
}

fn unique_prefix() -> KeyPrefix {
    let n: u64 = rand::random();
    KeyPrefix::try_from(format!("tollgate_itest_{n}")).unwrap()
}

fn account(s: &str) -> AccountId {
    AccountId::try_from(s.to_string()).unwrap()
}

fn interval(seconds: u64, credits: u64) -> Interval {
    Interval::new(WindowSeconds::try_from(seconds).unwrap(), credits)
}

async fn no_interval() -> Result<Interval, IntervalError> {
    panic!("interval supplier must not be invoked while a counter is live");
}

async fn build_gate(url: &str) -> Tollgate {
    let client = redis::Client::open(url).unwrap();
    let connection_manager = client.get_connection_manager().await.unwrap();

    Tollgate::new(TollgateOptions {
        redis: RedisCounterStoreOptions {
            connection_manager,
            prefix: Some(unique_prefix()),
        },
    })
}

#[test]
fn budget_is_spent_call_by_call_until_throttled() {
    let Some(url) = redis_url() else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let gate = build_gate(&url).await;
        let a = account("a");

        let mut verdicts = Vec::new();
        for _ in 0..4 {
            let allowed = gate
                .redis()
                .allow(&a, 3, || async { Ok(interval(60, 10)) })
                .await
                .unwrap();
            verdicts.push(allowed);
        }

        assert_eq!(verdicts, vec![true, true, true, false]);
    });
}

#[test]
fn oversized_request_is_denied_even_on_a_fresh_window() {
    let Some(url) = redis_url() else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let gate = build_gate(&url).await;
        let a = account("a");

        let allowed = gate
            .redis()
            .allow(&a, 10, || async { Ok(interval(30, 5)) })
            .await
            .unwrap();
        assert!(!allowed);

        // The window is open but spent: smaller calls stay throttled too.
        assert!(!gate.redis().allow(&a, 1, no_interval).await.unwrap());
    });
}

#[test]
fn window_expiry_reopens_the_account() {
    let Some(url) = redis_url() else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let gate = build_gate(&url).await;
        let a = account("a");
        let calls = AtomicUsize::new(0);

        let supplier = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(interval(1, 3)) }
        };
        assert!(gate.redis().allow(&a, 3, supplier).await.unwrap());
        assert!(!gate.redis().allow(&a, 1, no_interval).await.unwrap());

        thread::sleep(Duration::from_millis(1200));

        let supplier = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(interval(1, 3)) }
        };
        assert!(gate.redis().allow(&a, 1, supplier).await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    });
}

#[test]
fn per_account_budgets_are_independent() {
    let Some(url) = redis_url() else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let gate = build_gate(&url).await;

        let a = account("a");
        let b = account("b");

        assert!(
            gate.redis()
                .allow(&a, 2, || async { Ok(interval(60, 2)) })
                .await
                .unwrap()
        );
        assert!(!gate.redis().allow(&a, 1, no_interval).await.unwrap());

        assert!(
            gate.redis()
                .allow(&b, 1, || async { Ok(interval(60, 2)) })
                .await
                .unwrap()
        );
    });
}
