//! Producer dan Consumer: dua sisi ring buffer untuk dua thread.
//!
//! Masing-masing handle tidak bisa di-clone, jadi paling banyak ada satu
//! producer dan satu consumer per buffer. Keduanya `Send`, sehingga bisa
//! dipindahkan ke thread lain, dan semua operasi transfer memakai
//! `&mut self`. `&Producer`/`&Consumer` boleh di-share (`Sync`) karena
//! lewat `&self` hanya ada query snapshot.

use std::fmt;

use super::ring_buffer::Ring;
use super::slot::Arc;

pub(crate) fn split<T: Copy>(ring: Ring<T>) -> (Producer<T>, Consumer<T>) {
    let ring = Arc::new(ring);
    (
        Producer {
            ring: Arc::clone(&ring),
        },
        Consumer { ring },
    )
}

/// Write end dari ring buffer.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
}

/// Read end dari ring buffer.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T: Copy> Producer<T> {
    /// Copy sebanyak mungkin elemen `data` ke buffer.
    ///
    /// Returns jumlah elemen yang di-copy, `0` jika buffer penuh.
    /// Tidak pernah block; retry diserahkan ke caller.
    #[inline]
    pub fn write(&mut self, data: &[T]) -> usize {
        // SAFETY: Producer tidak bisa di-clone dan write butuh &mut self
        unsafe { self.ring.write(data) }
    }

    /// Push satu elemen. Returns `false` jika buffer penuh.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.write(std::slice::from_ref(&value)) == 1
    }

    /// Kapasitas buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Snapshot jumlah elemen yang belum dibaca consumer
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Snapshot: buffer kosong?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot: buffer penuh?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Ruang kosong minimal untuk write berikutnya.
    ///
    /// Consumer hanya bisa menambah ruang, jadi nilai ini batas bawah.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }
}

impl<T: Copy> Consumer<T> {
    /// Copy sebanyak mungkin elemen ke `out`.
    ///
    /// Returns jumlah elemen yang di-copy, `0` jika buffer kosong.
    #[inline]
    pub fn read(&mut self, out: &mut [T]) -> usize {
        // SAFETY: Consumer tidak bisa di-clone dan read butuh &mut self
        unsafe { self.ring.read(out) }
    }

    /// Pop satu elemen. Returns `None` jika buffer kosong.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: sama dengan read()
        unsafe { self.ring.pop() }
    }

    /// Kapasitas buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Snapshot jumlah elemen yang siap dibaca.
    ///
    /// Producer hanya bisa menambah data, jadi nilai ini batas bawah.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Snapshot: buffer kosong?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot: buffer penuh?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("ring", &self.ring).finish()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("ring", &self.ring).finish()
    }
}
