//! Basic usage example for the tollbooth crate.
//!
//! Run with: `cargo run --example basic`

use std::thread;
use std::time::Duration;
use tollbooth::{RateLimiter, RateLimiterError};

fn main() -> Result<(), RateLimiterError> {
    println!("=== Basic Rate Limiter Example ===\n");

    burst_example()?;

    println!("\n{}\n", "=".repeat(50));

    metrics_example()?;

    println!("\n{}\n", "=".repeat(50));

    invalid_config_example();

    Ok(())
}

fn burst_example() -> Result<(), RateLimiterError> {
    println!("1. Burst then refill:");

    // Capacity = 3 tokens, refill = 1 token/sec
    let limiter = RateLimiter::new(3, 1.0)?;

    for i in 1..=5 {
        println!("   call {} -> {}", i, limiter.try_acquire());
    }

    // Wait to let one token refill
    thread::sleep(Duration::from_millis(1100));
    println!("   after 1.1s -> {}", limiter.try_acquire());

    Ok(())
}

fn metrics_example() -> Result<(), RateLimiterError> {
    println!("2. Monitoring:");

    let limiter = RateLimiter::new(10, 2.0)?;
    for _ in 0..25 {
        limiter.try_acquire();
    }

    let metrics = limiter.metrics();
    println!("{}", metrics);
    println!(
        "   Health: {} ({})",
        metrics.health_status(),
        metrics.health_status().suggested_action()
    );
    println!(
        "   Next token in: {:?}",
        limiter.time_until_available()
    );

    Ok(())
}

fn invalid_config_example() {
    println!("3. Invalid configuration:");

    match RateLimiter::new(0, 1.0) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(err) => println!("   rejected: {}", err),
    }
}
