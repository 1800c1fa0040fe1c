//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Dua cursor yang terus naik (tidak pernah di-reset ke nol):
//! - `write_cursor`: hanya dimajukan producer
//! - `read_cursor`: hanya dimajukan consumer
//!
//! Selisih `write - read` (wrapping) adalah jumlah elemen yang belum dibaca.
//! Slot fisik untuk posisi logis `p` adalah `p & (capacity - 1)`.
//!
//! Invariant: `read <= write <= read + capacity`.

use std::fmt;

use crossbeam_utils::CachePadded;

use super::capacity::{checked_normalize, normalize, MAX_CAPACITY};
use super::handle::{self, Consumer, Producer};
use super::slot::{alloc_slots, copy_in, copy_out, try_alloc_slots, AtomicUsize, Ordering, Slot};
use crate::error::RingError;
use crate::trace::{debug, warn};

/// Storage dan cursor bersama, dipakai oleh [`RingBuffer`] dan oleh
/// pasangan [`Producer`]/[`Consumer`] setelah `split()`.
#[repr(C)]
pub(crate) struct Ring<T> {
    // Producer side - cache line sendiri untuk menghindari false sharing
    write_cursor: CachePadded<AtomicUsize>,
    // Consumer side
    read_cursor: CachePadded<AtomicUsize>,
    slots: Box<[Slot<T>]>,
    mask: usize,
}

// SAFETY: Ring aman di-share antar thread karena:
// - Hanya satu producer yang menulis slot di [write_old, write_new)
// - Hanya satu consumer yang membaca slot di [read_old, read_new)
// - Invariant menjamin kedua range tidak pernah overlap
// - Release/Acquire pada cursor mempublish isi slot
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T: Copy> Ring<T> {
    fn with_slots(slots: Box<[Slot<T>]>) -> Self {
        let capacity = slots.len();
        debug_assert!(capacity.is_power_of_two());

        Self {
            write_cursor: CachePadded::new(AtomicUsize::new(0)),
            read_cursor: CachePadded::new(AtomicUsize::new(0)),
            slots,
            mask: capacity - 1,
        }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Copy sebanyak mungkin elemen `data` ke buffer (Producer side).
    ///
    /// # Safety
    /// Tidak boleh ada dua pemanggil `write` secara bersamaan.
    #[inline]
    pub(crate) unsafe fn write(&self, data: &[T]) -> usize {
        // Cursor sendiri: hanya thread ini yang pernah menulisnya
        let write = self.write_cursor.load(Ordering::Relaxed);
        // Acquire: progress consumer harus terlihat sebelum slot ditimpa
        let read = self.read_cursor.load(Ordering::Acquire);

        let capacity = self.capacity();
        let free = capacity - write.wrapping_sub(read);
        let n = data.len().min(free);
        if n == 0 {
            return 0;
        }

        // Wraparound split: run pertama sampai ujung fisik storage,
        // sisanya mulai dari slot 0
        let start = write & self.mask;
        let first_run = n.min(capacity - start);
        copy_in(&self.slots[start..start + first_run], &data[..first_run]);
        copy_in(&self.slots[..n - first_run], &data[first_run..n]);

        // Release: copy selesai sebelum consumer melihat cursor baru
        self.write_cursor
            .store(write.wrapping_add(n), Ordering::Release);

        n
    }

    /// Copy sebanyak mungkin elemen dari buffer ke `out` (Consumer side).
    ///
    /// # Safety
    /// Tidak boleh ada dua pemanggil `read`/`pop` secara bersamaan.
    #[inline]
    pub(crate) unsafe fn read(&self, out: &mut [T]) -> usize {
        let read = self.read_cursor.load(Ordering::Relaxed);
        // Acquire: elemen yang dipublish producer harus terlihat utuh
        let write = self.write_cursor.load(Ordering::Acquire);

        let available = write.wrapping_sub(read);
        let n = out.len().min(available);
        if n == 0 {
            return 0;
        }

        let start = read & self.mask;
        let first_run = n.min(self.capacity() - start);
        let (head, tail) = out[..n].split_at_mut(first_run);
        copy_out(&self.slots[start..start + first_run], head);
        copy_out(&self.slots[..n - first_run], tail);

        // Release: copy-out selesai sebelum producer boleh menimpa slot
        self.read_cursor
            .store(read.wrapping_add(n), Ordering::Release);

        n
    }

    /// Pop satu elemen tanpa buffer perantara.
    ///
    /// # Safety
    /// Tidak boleh ada dua pemanggil `read`/`pop` secara bersamaan.
    #[inline]
    pub(crate) unsafe fn pop(&self) -> Option<T> {
        let read = self.read_cursor.load(Ordering::Relaxed);
        let write = self.write_cursor.load(Ordering::Acquire);
        if write == read {
            return None;
        }

        let value = self.slots[read & self.mask].read();
        self.read_cursor
            .store(read.wrapping_add(1), Ordering::Release);

        Some(value)
    }

    /// Snapshot jumlah elemen yang belum dibaca, selalu di `[0, capacity]`.
    ///
    /// Racy jika dipanggil bersamaan dengan write/read: untuk diagnostik saja.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        // read dulu, lalu write: write yang dibaca belakangan tidak pernah
        // lebih kecil dari read, jadi selisihnya tidak underflow
        let read = self.read_cursor.load(Ordering::Acquire);
        let write = self.write_cursor.load(Ordering::Acquire);
        write.wrapping_sub(read).min(self.capacity())
    }

    #[cfg(all(test, not(loom)))]
    pub(crate) fn slot(&self, index: usize) -> T {
        // SAFETY: hanya dipakai test single-thread pada slot yang sudah ditulis
        unsafe { self.slots[index].read() }
    }
}

impl<T> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &(self.mask + 1))
            .field("write_cursor", &self.write_cursor.load(Ordering::Relaxed))
            .field("read_cursor", &self.read_cursor.load(Ordering::Relaxed))
            .finish()
    }
}

/// Lock-Free SPSC Ring Buffer
///
/// Selama dimiliki satu owner, `write` dan `read` bisa dipanggil langsung
/// lewat `&mut self`. Untuk dua thread, pecah dengan [`RingBuffer::split`].
///
/// Storage dialokasikan sekali di konstruksi dan dilepas otomatis saat
/// owner terakhir di-drop.
pub struct RingBuffer<T> {
    ring: Ring<T>,
}

impl<T: Copy> RingBuffer<T> {
    /// Membuat ring buffer dengan capacity `requested` dibulatkan ke
    /// power of two berikutnya (minimal 1).
    ///
    /// Kegagalan alokasi bersifat fatal dan ditangani global allocator.
    ///
    /// # Panics
    /// Panic jika `requested > MAX_CAPACITY`
    pub fn new(requested: usize) -> Self {
        let capacity = normalize(requested);
        debug!(requested, capacity, "ring buffer allocated");

        Self {
            ring: Ring::with_slots(alloc_slots(capacity)),
        }
    }

    /// Seperti [`RingBuffer::new`], tapi capacity overflow dan kegagalan
    /// alokasi dikembalikan sebagai [`RingError`].
    pub fn try_new(requested: usize) -> Result<Self, RingError> {
        let Some(capacity) = checked_normalize(requested) else {
            warn!(requested, "requested capacity overflows");
            return Err(RingError::CapacityOverflow {
                requested,
                max: MAX_CAPACITY,
            });
        };

        let slots = match try_alloc_slots(capacity) {
            Ok(slots) => slots,
            Err(source) => {
                warn!(capacity, error = %source, "ring buffer allocation failed");
                return Err(RingError::Alloc { capacity, source });
            }
        };
        debug!(requested, capacity, "ring buffer allocated");

        Ok(Self {
            ring: Ring::with_slots(slots),
        })
    }

    /// Copy sebanyak mungkin elemen `data` ke buffer.
    ///
    /// Returns jumlah elemen yang benar-benar di-copy; bisa kurang dari
    /// `data.len()` jika ruang tidak cukup, `0` jika buffer penuh.
    #[inline]
    pub fn write(&mut self, data: &[T]) -> usize {
        // SAFETY: &mut self menjamin tidak ada writer lain
        unsafe { self.ring.write(data) }
    }

    /// Copy sebanyak mungkin elemen ke `out`.
    ///
    /// Returns jumlah elemen yang benar-benar di-copy; `0` jika buffer kosong.
    #[inline]
    pub fn read(&mut self, out: &mut [T]) -> usize {
        // SAFETY: &mut self menjamin tidak ada reader lain
        unsafe { self.ring.read(out) }
    }

    /// Push satu elemen. Returns `false` jika buffer penuh.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.write(std::slice::from_ref(&value)) == 1
    }

    /// Pop satu elemen. Returns `None` jika buffer kosong.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: &mut self menjamin tidak ada reader lain
        unsafe { self.ring.pop() }
    }

    /// Kapasitas buffer, tetap sepanjang umur instance
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Jumlah elemen yang belum dibaca
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Cek apakah buffer kosong
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cek apakah buffer penuh
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Ruang kosong yang tersedia untuk write berikutnya
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Memecah buffer menjadi satu [`Producer`] dan satu [`Consumer`].
    ///
    /// Elemen yang sudah ada di buffer tetap bisa dibaca consumer.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        debug!(
            capacity = self.ring.capacity(),
            len = self.ring.len(),
            "ring buffer split"
        );
        handle::split(self.ring)
    }

    #[cfg(all(test, not(loom)))]
    fn slot(&self, index: usize) -> T {
        self.ring.slot(index)
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer").field("ring", &self.ring).finish()
    }
}
