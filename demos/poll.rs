// SPDX-License-Identifier: MPL-2.0

//! Demo program: poll a miner and print what it reports.
//!
//! Prints the full snapshot as JSON, then a short human summary. With a
//! work mode argument, switches to it afterwards.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example poll -- <host> [low|mid|high]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=avalon_lib=debug cargo run --example poll -- 192.168.1.50
//! ```

use std::env;

use avalon_lib::types::WorkMode;
use avalon_lib::{MinerConfig, Scalar};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <host> [low|mid|high]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example poll -- 192.168.1.50");
        std::process::exit(1);
    }

    let config = MinerConfig::new(&args[1]);
    config.validate()?;
    let miner = config.into_builder().build()?;

    println!("Polling {}...", args[1]);
    let snapshot = miner.snapshot().await;

    if !snapshot.is_reachable() {
        eprintln!("Miner did not answer");
        std::process::exit(2);
    }

    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(summary) = snapshot.summary.as_ref().and_then(|s| s.first("SUMMARY")) {
        let hashrate = summary.get("MHS av").and_then(Scalar::as_f64);
        println!("Hashrate: {:.2} TH/s", hashrate.unwrap_or_default() / 1_000_000.0);
    }
    for (key, value) in &snapshot.estats.temperatures {
        match value {
            Some(celsius) => println!("{key}: {celsius} °C"),
            None => println!("{key}: unreadable"),
        }
    }
    if let Some(mode) = snapshot.estats.selected_work_mode() {
        println!("Work mode: {mode}");
    }
    if let Some(led) = snapshot.estats.led.user_setting() {
        let effect = led
            .led_effect()
            .map_or_else(|| led.effect.to_string(), |e| e.to_string());
        println!("LED: {effect}, brightness {}%, color {}", led.brightness, led.color());
        if let Some(base) = led.base_color() {
            println!("LED base color: {base}");
        }
    }
    if let Some(pools) = &snapshot.pools {
        for (slot, pool) in pools {
            let url = pool.get("URL").map(ToString::to_string).unwrap_or_default();
            println!("{slot}: {url}");
        }
    }

    if let Some(mode) = args.get(2) {
        let mode: WorkMode = mode.parse()?;
        println!("Switching work mode to {mode}...");
        let result = miner.set_work_mode(mode).await.into_result()?;
        println!("Done: {}", result.message);
    }

    Ok(())
}
