//! Concurrency Stress Test - satu producer, satu consumer
//!
//! Producer menulis urutan 0..N dengan ukuran chunk acak, consumer membaca
//! dengan ukuran chunk acak lain. Setelah keduanya selesai:
//! total written == total read == N, tanpa duplikasi atau korupsi.
//!
//! Usage:
//!   cargo test --release --test spsc_stress

#![cfg(not(loom))]

use std::thread;

use spsc_ring::RingBuffer;

fn next_random(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    *state >> 33
}

/// Jalankan transfer 0..total, returns (written, read)
fn run_transfer(requested_capacity: usize, total: u64, max_chunk: usize) -> (u64, u64) {
    let (mut tx, mut rx) = RingBuffer::<u64>::new(requested_capacity).split();
    let capacity = tx.capacity();

    let producer = thread::spawn(move || {
        let mut rng = 0x2545_F491_4F6C_DD1D_u64 ^ total;
        let mut buf = vec![0u64; max_chunk];
        let mut next = 0u64;

        while next < total {
            let want = (next_random(&mut rng) as usize % max_chunk + 1)
                .min((total - next) as usize);
            for (i, slot) in buf[..want].iter_mut().enumerate() {
                *slot = next + i as u64;
            }

            let n = tx.write(&buf[..want]);
            assert!(n <= want);
            if n == 0 {
                thread::yield_now();
            }
            next += n as u64;
        }
        next
    });

    let mut rng = 0x9E37_79B9_7F4A_7C15_u64;
    let mut buf = vec![0u64; max_chunk];
    let mut expected = 0u64;

    while expected < total {
        let want = next_random(&mut rng) as usize % max_chunk + 1;
        let n = rx.read(&mut buf[..want]);
        assert!(n <= want);
        assert!(rx.len() <= capacity);

        if n == 0 {
            thread::yield_now();
            continue;
        }
        for &v in &buf[..n] {
            assert_eq!(v, expected, "element out of order or corrupted");
            expected += 1;
        }
    }

    let written = producer.join().unwrap();
    assert!(rx.is_empty());
    assert_eq!(rx.pop(), None);
    (written, expected)
}

#[test]
fn test_stress_large_capacity() {
    let (written, read) = run_transfer(1024, 1_000_000, 300);
    assert_eq!(written, 1_000_000);
    assert_eq!(read, 1_000_000);
}

#[test]
fn test_stress_non_power_of_two_request() {
    // 7 -> 8: chunk sering lebih besar dari capacity, banyak partial transfer
    let (written, read) = run_transfer(7, 200_000, 13);
    assert_eq!(written, 200_000);
    assert_eq!(read, 200_000);
}

#[test]
fn test_stress_capacity_one() {
    let (written, read) = run_transfer(0, 50_000, 4);
    assert_eq!(written, 50_000);
    assert_eq!(read, 50_000);
}

#[test]
fn test_stress_single_element_chunks() {
    let (written, read) = run_transfer(64, 200_000, 1);
    assert_eq!((written, read), (200_000, 200_000));
}

/// Elemen non-trivial: korupsi parsial (torn write) terdeteksi lewat checksum
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
struct Record {
    sequence: u64,
    payload: [u32; 6],
    checksum: u64,
}

impl Record {
    fn new(sequence: u64) -> Self {
        let mut payload = [0u32; 6];
        let mut hash = sequence;
        for slot in payload.iter_mut() {
            *slot = next_random(&mut hash) as u32;
        }
        let checksum = payload
            .iter()
            .fold(sequence, |acc, &p| acc.rotate_left(7) ^ p as u64);
        Self {
            sequence,
            payload,
            checksum,
        }
    }

    fn is_valid(&self) -> bool {
        *self == Record::new(self.sequence)
    }
}

#[test]
fn test_stress_struct_records() {
    const TOTAL: u64 = 100_000;
    let (mut tx, mut rx) = RingBuffer::<Record>::new(100).split();

    let producer = thread::spawn(move || {
        let mut rng = 42u64;
        let mut next = 0u64;
        let mut batch = Vec::with_capacity(32);

        while next < TOTAL {
            let want = (next_random(&mut rng) % 32 + 1).min(TOTAL - next);
            batch.clear();
            batch.extend((next..next + want).map(Record::new));

            let mut sent = 0;
            while sent < batch.len() {
                let n = tx.write(&batch[sent..]);
                if n == 0 {
                    thread::yield_now();
                }
                sent += n;
            }
            next += want;
        }
    });

    let mut expected = 0u64;
    let mut buf = [Record::new(0); 17];
    while expected < TOTAL {
        let n = rx.read(&mut buf);
        if n == 0 {
            thread::yield_now();
            continue;
        }
        for record in &buf[..n] {
            assert_eq!(record.sequence, expected);
            assert!(record.is_valid(), "torn record {:?}", record);
            expected += 1;
        }
    }

    producer.join().unwrap();
    assert_eq!(expected, TOTAL);
}

#[test]
fn test_stress_push_pop() {
    const TOTAL: u64 = 500_000;
    let (mut tx, mut rx) = RingBuffer::<u64>::new(32).split();

    let producer = thread::spawn(move || {
        for i in 0..TOTAL {
            while !tx.push(i) {
                std::hint::spin_loop();
            }
        }
    });

    let mut expected = 0u64;
    while expected < TOTAL {
        if let Some(v) = rx.pop() {
            assert_eq!(v, expected);
            expected += 1;
        } else {
            std::hint::spin_loop();
        }
    }

    producer.join().unwrap();
    assert!(rx.is_empty());
}
