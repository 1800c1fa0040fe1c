//! Normalisasi capacity ke power of two.
//!
//! Index slot dihitung dengan `cursor & (capacity - 1)`, jadi capacity
//! HARUS power of two. Semua konstruksi ring buffer lewat sini.

/// Capacity terbesar yang didukung.
///
/// Cursor memakai wrapping arithmetic; selisih `write - read` hanya
/// benar selama capacity tidak melebihi setengah range `usize`.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 1);

/// Power of two terkecil yang `>= requested`, atau `None` jika melebihi
/// [`MAX_CAPACITY`]. `0` dan `1` menjadi `1`.
#[inline]
pub const fn checked_normalize(requested: usize) -> Option<usize> {
    requested.checked_next_power_of_two()
}

/// Power of two terkecil yang `>= requested`. `0` dan `1` menjadi `1`.
///
/// # Panics
/// Panic jika `requested > MAX_CAPACITY`
#[inline]
pub fn normalize(requested: usize) -> usize {
    match checked_normalize(requested) {
        Some(capacity) => capacity,
        None => panic!(
            "requested capacity {} exceeds maximum ring capacity {}",
            requested, MAX_CAPACITY
        ),
    }
}
