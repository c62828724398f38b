//! Benchmark utilities for the rusty_bus registry.
//!
//! This crate provides benchmarking infrastructure for registration and dispatch:
//!
//! - **Microbenchmarks**: Single-event fire cost by listener count, registration churn
//! - **Scenario benchmarks**: Seeded random event mixes across several contracts
//! - **Memory tracking**: Heap allocation profiling via dhat
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_bus_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_bus_bench -- fire
//!
//! # Run with memory profiling (slower)
//! cargo bench -p rusty_bus_bench --features memory_profiling
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod fixtures;
pub mod memory;
pub mod scenarios;
