//! Model checking memory ordering dengan loom.
//!
//! Loom menjelajahi semua interleaving dan semua hasil load yang diizinkan
//! memory model C++11. Setiap model di sini membuat satu thread menunggu
//! (retry + `yield_now`) sampai thread lain mempublish cursor, lalu
//! mengakses slot yang baru saja disentuh thread lain. Jika release-store
//! cursor diturunkan ke Relaxed, loom melaporkan akses slot yang race
//! ("Causality violation").
//!
//! - write cursor (`Ring::write`): `loom_write_publishes_elements`,
//!   `loom_write_publishes_wraparound_split`
//! - read cursor (`Ring::read`): `loom_read_frees_slot_for_producer`
//! - read cursor (`Ring::pop`): `loom_pop_frees_slot_for_producer`
//!
//! Usage:
//!   RUSTFLAGS="--cfg loom" cargo test --release --test loom_ordering

#![cfg(loom)]

use loom::thread;
use spsc_ring::{Consumer, RingBuffer};

/// Baca sampai `want` elemen terkumpul, yield saat buffer kosong
fn read_until(rx: &mut Consumer<u32>, want: usize) -> Vec<u32> {
    let mut got = Vec::with_capacity(want);
    let mut buf = [0u32; 4];
    while got.len() < want {
        let n = rx.read(&mut buf[..want - got.len()]);
        if n == 0 {
            thread::yield_now();
        }
        got.extend_from_slice(&buf[..n]);
    }
    got
}

#[test]
fn loom_write_publishes_elements() {
    loom::model(|| {
        let (mut tx, mut rx) = RingBuffer::<u32>::new(2).split();

        let producer = thread::spawn(move || {
            assert_eq!(tx.write(&[1, 2]), 2);
        });

        // Slot dibaca begitu cursor terlihat: harus sudah berisi data utuh
        assert_eq!(read_until(&mut rx, 2), vec![1, 2]);

        producer.join().unwrap();
        assert!(rx.is_empty());
    });
}

#[test]
fn loom_write_publishes_wraparound_split() {
    loom::model(|| {
        let mut rb = RingBuffer::<u32>::new(2);
        // write=1, read=1: write berikutnya mulai di slot 1 lalu wrap ke slot 0
        assert!(rb.push(0));
        assert_eq!(rb.pop(), Some(0));
        let (mut tx, mut rx) = rb.split();

        let producer = thread::spawn(move || {
            assert_eq!(tx.write(&[10, 11]), 2);
        });

        let mut seen = Vec::new();
        while seen.len() < 2 {
            match rx.pop() {
                Some(v) => seen.push(v),
                None => thread::yield_now(),
            }
        }
        assert_eq!(seen, vec![10, 11]);

        producer.join().unwrap();
    });
}

#[test]
fn loom_read_frees_slot_for_producer() {
    loom::model(|| {
        let mut rb = RingBuffer::<u32>::new(1);
        assert_eq!(rb.write(&[1]), 1);
        let (mut tx, mut rx) = rb.split();

        let consumer = thread::spawn(move || {
            let mut out = [0u32; 1];
            assert_eq!(rx.read(&mut out), 1);
            assert_eq!(out[0], 1);
            rx
        });

        // Slot 0 hanya boleh ditimpa setelah copy-out consumer selesai
        while tx.write(&[2]) == 0 {
            thread::yield_now();
        }

        let mut rx = consumer.join().unwrap();
        assert_eq!(rx.pop(), Some(2));
        assert_eq!(rx.pop(), None);
    });
}

#[test]
fn loom_pop_frees_slot_for_producer() {
    loom::model(|| {
        let mut rb = RingBuffer::<u32>::new(2);
        assert_eq!(rb.write(&[1, 2]), 2);
        let (mut tx, mut rx) = rb.split();

        let consumer = thread::spawn(move || {
            assert_eq!(rx.pop(), Some(1));
            rx
        });

        while !tx.push(3) {
            thread::yield_now();
        }

        let mut rx = consumer.join().unwrap();
        let mut rest = [0u32; 2];
        assert_eq!(rx.read(&mut rest), 2);
        assert_eq!(rest, [2, 3]);
    });
}

#[test]
fn loom_len_stays_within_capacity() {
    loom::model(|| {
        let (mut tx, mut rx) = RingBuffer::<u8>::new(1).split();

        let producer = thread::spawn(move || {
            for v in [7u8, 8] {
                while tx.write(&[v]) == 0 {
                    assert!(tx.len() <= 1);
                    thread::yield_now();
                }
                assert!(tx.len() <= 1);
            }
        });

        let mut seen = Vec::new();
        while seen.len() < 2 {
            match rx.pop() {
                Some(v) => seen.push(v),
                None => thread::yield_now(),
            }
            assert!(rx.len() <= 1);
        }
        assert_eq!(seen, vec![7, 8]);

        producer.join().unwrap();
        assert!(rx.is_empty());
    });
}
