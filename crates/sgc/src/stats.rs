//! GC Statistics
//!
//! Counters describing collector activity since context creation. The
//! runtime is single-threaded, so these are plain integers updated inline
//! by the collector and read through [`crate::Gc::stats`].

/// Collector activity counters
#[derive(Debug, Clone, Copy, Default)]
pub struct GcStats {
    /// Minor (copying) collections run
    pub minor_collections: u64,

    /// Major (mark-compact) collections run
    pub major_collections: u64,

    /// Times the heap regions were grown
    pub heap_growths: u64,

    /// Total bytes handed out by the allocator, headers included
    pub bytes_allocated: u64,

    /// Bytes moved into the old generation by tenuring
    pub bytes_promoted: u64,

    /// Objects moved into the old generation by tenuring
    pub objects_promoted: u64,

    /// Bytes reclaimed by major collections
    pub bytes_reclaimed: u64,
}

impl GcStats {
    /// Total collections of either kind.
    pub fn total_collections(&self) -> u64 {
        self.minor_collections + self.major_collections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = GcStats::default();
        assert_eq!(stats.minor_collections, 0);
        assert_eq!(stats.major_collections, 0);
        assert_eq!(stats.total_collections(), 0);
        assert_eq!(stats.bytes_allocated, 0);
    }
}
