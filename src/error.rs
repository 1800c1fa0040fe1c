//! Error types untuk konstruksi ring buffer.
//!
//! Write/read yang tidak penuh bukan error: shortfall dilaporkan lewat count.

use std::collections::TryReserveError;

use thiserror::Error;

/// Kegagalan saat membuat [`RingBuffer`](crate::RingBuffer) lewat `try_new`.
#[derive(Debug, Error)]
pub enum RingError {
    /// Requested capacity tidak bisa dibulatkan ke power of two yang valid.
    #[error("requested capacity {requested} exceeds maximum ring capacity {max}")]
    CapacityOverflow {
        /// Capacity yang diminta caller
        requested: usize,
        /// Capacity terbesar yang didukung
        max: usize,
    },

    /// Allocator menolak alokasi storage.
    #[error("failed to allocate storage for {capacity} slots")]
    Alloc {
        /// Capacity setelah normalisasi
        capacity: usize,
        /// Error dari allocator
        #[source]
        source: TryReserveError,
    },
}
