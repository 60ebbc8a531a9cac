use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tollbooth::{
    ManualClock, RateLimiter, RateLimiterBuilder, RateLimiterConfig, RateLimiterError,
    TokenBucket,
};

fn manual_limiter(capacity: u64, rate: f64) -> (RateLimiter<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let limiter =
        RateLimiter::with_clock(RateLimiterConfig::new(capacity, rate), clock.clone()).unwrap();
    (limiter, clock)
}

#[test]
fn test_burst_then_refill_after_wait() {
    let (limiter, clock) = manual_limiter(3, 1.0);

    let decisions: Vec<bool> = (0..5).map(|_| limiter.try_acquire()).collect();
    assert_eq!(decisions, [true, true, true, false, false]);

    clock.advance(Duration::from_millis(1100));
    assert!(limiter.try_acquire());
}

#[test]
fn test_fractional_accumulation() {
    let (limiter, clock) = manual_limiter(1, 2.0);

    assert!(limiter.try_acquire());

    clock.advance(Duration::from_millis(300));
    assert!(!limiter.try_acquire());

    clock.advance(Duration::from_millis(200));
    assert!(limiter.try_acquire());
}

#[test]
fn test_long_idle_admits_at_most_capacity() {
    let (limiter, clock) = manual_limiter(5, 100.0);
    assert!(limiter.try_acquire_n(5));

    clock.advance(Duration::from_secs(24 * 60 * 60));

    let admitted = (0..50).filter(|_| limiter.try_acquire()).count();
    assert_eq!(admitted, 5);
}

#[test]
fn test_steady_rate_over_simulated_minute() {
    // 2 tokens/s, capacity 4: over 60 simulated seconds with a call every
    // 100ms, admissions are the initial burst plus 120 refilled tokens.
    let (limiter, clock) = manual_limiter(4, 2.0);

    let mut admitted = 0;
    for _ in 0..600 {
        if limiter.try_acquire() {
            admitted += 1;
        }
        clock.advance(Duration::from_millis(100));
    }
    // The final 100ms advance is never observed by a call.
    assert!((122..=124).contains(&admitted), "admitted {admitted}");
}

#[test]
fn test_concurrent_callers_admit_exactly_capacity() {
    const THREADS: usize = 32;
    const CAPACITY: u64 = 64;

    for _ in 0..10 {
        let (limiter, _clock) = manual_limiter(CAPACITY, 1.0);
        let limiter = Arc::new(limiter);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let limiter = limiter.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    (0..10).filter(|_| limiter.try_acquire()).count()
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total as u64, CAPACITY);
    }
}

// Timing-dependent smoke test on the system clock: `cargo test -- --ignored`.
#[test]
#[ignore = "uses real sleeps"]
fn test_sustained_load_with_real_clock() {
    let limiter = Arc::new(RateLimiter::new(20, 100.0).unwrap());
    let mut handles = vec![];

    for _ in 0..8 {
        let limiter = limiter.clone();
        handles.push(thread::spawn(move || {
            let mut acquired = 0u64;
            let mut rejected = 0u64;
            let start = std::time::Instant::now();

            while start.elapsed() < Duration::from_millis(300) {
                if limiter.try_acquire() {
                    acquired += 1;
                } else {
                    rejected += 1;
                }
                thread::sleep(Duration::from_micros(200));
            }

            (acquired, rejected)
        }));
    }

    let results: Vec<(u64, u64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let total_acquired: u64 = results.iter().map(|(a, _)| a).sum();
    let total_rejected: u64 = results.iter().map(|(_, r)| r).sum();

    assert!(total_acquired >= 20);
    assert!(total_rejected > 0);

    let metrics = limiter.metrics();
    assert_eq!(metrics.total_acquired, total_acquired);
    assert_eq!(metrics.total_rejected, total_rejected);
}

#[test]
fn test_single_owner_bucket_in_struct() {
    struct Worker {
        gate: TokenBucket<ManualClock>,
        processed: u32,
    }

    impl Worker {
        fn handle(&mut self) -> bool {
            let admitted = self.gate.try_acquire();
            if admitted {
                self.processed += 1;
            }
            admitted
        }
    }

    let clock = ManualClock::new();
    let mut worker = Worker {
        gate: TokenBucket::with_clock(RateLimiterConfig::new(2, 1.0), clock.clone()).unwrap(),
        processed: 0,
    };

    for _ in 0..5 {
        worker.handle();
    }
    clock.advance(Duration::from_secs(1));
    worker.handle();

    assert_eq!(worker.processed, 3);
}

#[test]
fn test_independent_limiters_do_not_share_state() {
    let clock = ManualClock::new();
    let uploads = RateLimiterBuilder::new()
        .capacity(1)
        .refill_rate(1.0)
        .build_with_clock(clock.clone())
        .unwrap();
    let downloads = RateLimiterBuilder::new()
        .capacity(2)
        .refill_rate(1.0)
        .build_with_clock(clock.clone())
        .unwrap();

    assert!(uploads.try_acquire());
    assert!(!uploads.try_acquire());
    assert!(downloads.try_acquire());
    assert!(downloads.try_acquire());
    assert!(!downloads.try_acquire());
}

#[test]
fn test_invalid_configuration_is_reported() {
    let cases = [
        (RateLimiterConfig::new(0, 1.0), "capacity"),
        (RateLimiterConfig::new(1, 0.0), "refill_rate"),
        (RateLimiterConfig::new(1, -3.0), "refill_rate"),
        (RateLimiterConfig::new(1, f64::INFINITY), "refill_rate"),
    ];

    for (config, expected) in cases {
        match RateLimiter::with_config(config) {
            Err(RateLimiterError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, expected)
            }
            Ok(limiter) => panic!("accepted invalid configuration: {limiter:?}"),
        }
    }
}
