//! Process heap accounting.
//!
//! The binary installs [`TrackingAllocator`] as the global allocator. It keeps
//! two counters, bytes handed out and bytes returned. How those counters turn
//! into a reading depends on the process-wide [`Reclamation`] mode, which is
//! installed once with [`configure`] before anything is measured.

use serde::{Deserialize, Serialize};
use std::alloc::{GlobalAlloc, Layout, System};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Bytes per megabyte used in every reading.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static FREED: AtomicUsize = AtomicUsize::new(0);
static MODE: OnceLock<Reclamation> = OnceLock::new();

/// Global allocator wrapper that counts heap traffic.
///
/// ```rust,ignore
/// #[global_allocator]
/// static GLOBAL: burnin::TrackingAllocator = burnin::TrackingAllocator;
/// ```
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        FREED.fetch_add(layout.size(), Ordering::Relaxed);
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, old_layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, old_layout, new_size) };
        // Counted as a fresh block plus a free of the old one, so cumulative
        // readings keep every block ever handed out.
        if !new_ptr.is_null() {
            ALLOCATED.fetch_add(new_size, Ordering::Relaxed);
            FREED.fetch_add(old_layout.size(), Ordering::Relaxed);
        }
        new_ptr
    }
}

/// Whether freed heap memory is credited back in readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reclamation {
    /// Readings are cumulative bytes allocated; frees are ignored.
    #[default]
    Disabled,
    /// Readings are live bytes (allocated minus freed).
    Enabled,
}

impl fmt::Display for Reclamation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reclamation::Disabled => f.write_str("disabled"),
            Reclamation::Enabled => f.write_str("enabled"),
        }
    }
}

impl FromStr for Reclamation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" | "0" | "false" => Ok(Reclamation::Disabled),
            "enabled" | "on" | "1" | "true" => Ok(Reclamation::Enabled),
            other => Err(format!("Unknown reclamation mode: {}", other)),
        }
    }
}

/// Returned by [`configure`] when a different mode is already installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclamationAlreadySet {
    pub active: Reclamation,
    pub requested: Reclamation,
}

impl fmt::Display for ReclamationAlreadySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reclamation already {}, cannot switch to {}",
            self.active, self.requested
        )
    }
}

impl std::error::Error for ReclamationAlreadySet {}

/// Install the process-wide reclamation mode.
///
/// Only the first call takes effect. Repeating the same mode is a no-op;
/// asking for a different one fails and leaves the first mode in force.
pub fn configure(mode: Reclamation) -> Result<(), ReclamationAlreadySet> {
    let active = *MODE.get_or_init(|| mode);
    if active == mode {
        Ok(())
    } else {
        Err(ReclamationAlreadySet {
            active,
            requested: mode,
        })
    }
}

/// Mode currently in force. Defaults to [`Reclamation::Disabled`] until configured.
pub fn reclamation() -> Reclamation {
    MODE.get().copied().unwrap_or_default()
}

/// Total bytes handed out by the tracking allocator since process start.
pub fn allocated_bytes() -> usize {
    ALLOCATED.load(Ordering::Relaxed)
}

/// Total bytes returned to the tracking allocator since process start.
pub fn freed_bytes() -> usize {
    FREED.load(Ordering::Relaxed)
}

/// Bytes currently held (handed out minus returned).
pub fn live_bytes() -> usize {
    allocated_bytes().saturating_sub(freed_bytes())
}

fn reading(mode: Reclamation, allocated: usize, freed: usize) -> usize {
    match mode {
        Reclamation::Disabled => allocated,
        Reclamation::Enabled => allocated.saturating_sub(freed),
    }
}

/// Source of memory readings for the sampler.
pub trait MemoryProbe: Send + Sync {
    /// Current reading in bytes.
    fn bytes(&self) -> usize;

    fn megabytes(&self) -> f64 {
        self.bytes() as f64 / BYTES_PER_MB
    }
}

/// Reads the tracking allocator counters according to the active mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapProbe;

impl MemoryProbe for HeapProbe {
    fn bytes(&self) -> usize {
        reading(reclamation(), allocated_bytes(), freed_bytes())
    }
}

/// Always reports the same value. Used by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub usize);

impl MemoryProbe for FixedProbe {
    fn bytes(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;
