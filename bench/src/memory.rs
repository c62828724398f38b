//! Heap accounting for registry workloads, backed by dhat.
//!
//! Registration allocates a subscriber per offered contract and, the first time an event
//! type is seen, a binding. Dispatch should allocate only the listener snapshot. The
//! [`Footprint`] of a closure makes both visible per listener or per fired event.
//!
//! ```bash
//! cargo bench -p rusty_bus_bench --features memory_profiling
//! ```
//!
//! Without the feature every footprint is zero and the closure runs untouched.

use std::fmt;

/// Heap activity observed while a closure ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footprint {
    pub bytes: u64,
    pub blocks: u64,
    pub peak: u64,
}

impl Footprint {
    /// Bytes allocated per item (listener registered, event fired).
    pub fn bytes_per(&self, items: usize) -> f64 {
        ratio(self.bytes, items)
    }

    /// Allocations per item (listener registered, event fired).
    pub fn blocks_per(&self, items: usize) -> f64 {
        ratio(self.blocks, items)
    }

    /// `true` when nothing was recorded, either because the closure did not allocate or
    /// because profiling is off.
    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes in {} blocks, peak {} bytes",
            self.bytes, self.blocks, self.peak
        )
    }
}

fn ratio(total: u64, items: usize) -> f64 {
    match items {
        0 => 0.0,
        n => total as f64 / n as f64,
    }
}

#[cfg(feature = "memory_profiling")]
fn profiled<R>(f: impl FnOnce() -> R) -> (R, Footprint) {
    let profiler = dhat::Profiler::new_heap();
    let before = dhat::HeapStats::get();
    let result = f();
    let after = dhat::HeapStats::get();
    drop(profiler);
    let footprint = Footprint {
        bytes: after.total_bytes.saturating_sub(before.total_bytes),
        blocks: after.total_blocks.saturating_sub(before.total_blocks),
        peak: after.max_bytes as u64,
    };
    (result, footprint)
}

#[cfg(not(feature = "memory_profiling"))]
fn profiled<R>(f: impl FnOnce() -> R) -> (R, Footprint) {
    (f(), Footprint::default())
}

/// Run `f` and report what it allocated.
pub fn measure_memory<R>(f: impl FnOnce() -> R) -> (R, Footprint) {
    profiled(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_item_ratios() {
        let footprint = Footprint {
            bytes: 4096,
            blocks: 64,
            peak: 2048,
        };
        assert!((footprint.bytes_per(16) - 256.0).abs() < f64::EPSILON);
        assert!((footprint.blocks_per(16) - 4.0).abs() < f64::EPSILON);
        assert_eq!(footprint.bytes_per(0), 0.0);
        assert_eq!(
            footprint.to_string(),
            "4096 bytes in 64 blocks, peak 2048 bytes"
        );
    }

    #[test]
    fn measured_closure_still_runs() {
        let ((registry, tickers), _footprint) =
            measure_memory(|| crate::fixtures::tickers(8).unwrap());
        assert_eq!(registry.binding_count(), 1);
        assert_eq!(tickers.len(), 8);
    }
}
