//! Slot storage dan primitive atomic yang bisa ditukar ke loom.
//!
//! Build normal memakai `std`. Dengan `RUSTFLAGS="--cfg loom"` semua atomic,
//! `Arc`, dan cell berasal dari loom supaya model checker bisa melihat setiap
//! akses ke storage dan setiap load/store cursor.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(loom)]
pub(crate) use loom::sync::Arc;

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(loom))]
pub(crate) use std::sync::Arc;

use std::collections::TryReserveError;
use std::mem::MaybeUninit;

#[cfg(loom)]
use loom::cell::UnsafeCell;
#[cfg(not(loom))]
use std::cell::UnsafeCell;

/// Satu slot ring buffer. Isinya hanya valid di range `[read, write)`.
#[repr(transparent)]
pub(crate) struct Slot<T>(UnsafeCell<MaybeUninit<T>>);

impl<T> Slot<T> {
    fn uninit() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }

    /// Baca isi slot.
    ///
    /// # Safety
    /// Slot harus sudah ditulis dan tidak sedang ditulis thread lain.
    #[cfg(not(loom))]
    #[inline(always)]
    pub(crate) unsafe fn read(&self) -> T
    where
        T: Copy,
    {
        (*self.0.get()).assume_init_read()
    }

    /// Baca isi slot.
    ///
    /// # Safety
    /// Slot harus sudah ditulis dan tidak sedang ditulis thread lain.
    #[cfg(loom)]
    pub(crate) unsafe fn read(&self) -> T
    where
        T: Copy,
    {
        self.0.with(|p| (*p).assume_init_read())
    }
}

/// Alokasi `capacity` slot. Kegagalan alokasi abort lewat global allocator.
pub(crate) fn alloc_slots<T>(capacity: usize) -> Box<[Slot<T>]> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, Slot::uninit);
    slots.into_boxed_slice()
}

/// Seperti [`alloc_slots`], tapi kegagalan alokasi dikembalikan ke caller.
pub(crate) fn try_alloc_slots<T>(capacity: usize) -> Result<Box<[Slot<T>]>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, Slot::uninit);
    Ok(slots.into_boxed_slice())
}

/// Copy `src` ke `slots` dalam satu run kontigu.
///
/// # Safety
/// Caller adalah satu-satunya producer dan `slots` berada di luar range
/// `[read, write)` yang sedang dibaca consumer. `slots.len() == src.len()`.
#[cfg(not(loom))]
#[inline(always)]
pub(crate) unsafe fn copy_in<T: Copy>(slots: &[Slot<T>], src: &[T]) {
    debug_assert_eq!(slots.len(), src.len());
    // Slot<T> -> UnsafeCell<MaybeUninit<T>> -> T, semuanya repr(transparent)
    let dst = UnsafeCell::raw_get(slots.as_ptr().cast::<UnsafeCell<MaybeUninit<T>>>());
    std::ptr::copy_nonoverlapping(src.as_ptr(), dst.cast::<T>(), src.len());
}

/// Copy isi `slots` ke `dst` dalam satu run kontigu.
///
/// # Safety
/// Caller adalah satu-satunya consumer dan semua `slots` sudah
/// dipublish producer lewat release-store cursor. `slots.len() == dst.len()`.
#[cfg(not(loom))]
#[inline(always)]
pub(crate) unsafe fn copy_out<T: Copy>(slots: &[Slot<T>], dst: &mut [T]) {
    debug_assert_eq!(slots.len(), dst.len());
    let src = UnsafeCell::raw_get(slots.as_ptr().cast::<UnsafeCell<MaybeUninit<T>>>());
    std::ptr::copy_nonoverlapping(src.cast::<T>(), dst.as_mut_ptr(), dst.len());
}

/// Versi loom: per-slot supaya setiap akses tercatat oleh model checker.
///
/// # Safety
/// Sama dengan versi non-loom.
#[cfg(loom)]
pub(crate) unsafe fn copy_in<T: Copy>(slots: &[Slot<T>], src: &[T]) {
    debug_assert_eq!(slots.len(), src.len());
    for (slot, value) in slots.iter().zip(src) {
        slot.0.with_mut(|p| {
            (*p).write(*value);
        });
    }
}

/// Versi loom: per-slot supaya setiap akses tercatat oleh model checker.
///
/// # Safety
/// Sama dengan versi non-loom.
#[cfg(loom)]
pub(crate) unsafe fn copy_out<T: Copy>(slots: &[Slot<T>], dst: &mut [T]) {
    debug_assert_eq!(slots.len(), dst.len());
    for (slot, out) in slots.iter().zip(dst.iter_mut()) {
        *out = slot.read();
    }
}
