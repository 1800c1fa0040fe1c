//! spsc-ring - Bounded Lock-Free SPSC Ring Buffer
//!
//! Arsitektur:
//! - Lock-Free: hanya atomic load/store dengan pasangan Acquire/Release
//! - No-Allocation: storage di-alokasi sekali saat konstruksi, tidak pernah resize
//! - Power-of-two capacity: index slot dihitung dengan bitmask, bukan modulo
//! - Typed roles: `split()` menghasilkan satu [`Producer`] dan satu [`Consumer`]
//!
//! ## Example
//!
//! ```
//! use spsc_ring::RingBuffer;
//!
//! // Capacity dibulatkan ke power of two berikutnya: 10 -> 16
//! let rb = RingBuffer::<u64>::new(10);
//! assert_eq!(rb.capacity(), 16);
//!
//! let (mut producer, mut consumer) = rb.split();
//!
//! let producer_thread = std::thread::spawn(move || {
//!     let data: Vec<u64> = (0..100).collect();
//!     let mut sent = 0;
//!     while sent < data.len() {
//!         sent += producer.write(&data[sent..]);
//!     }
//! });
//!
//! let mut received = Vec::new();
//! let mut buf = [0u64; 8];
//! while received.len() < 100 {
//!     let n = consumer.read(&mut buf);
//!     received.extend_from_slice(&buf[..n]);
//! }
//! producer_thread.join().unwrap();
//!
//! assert_eq!(received, (0..100).collect::<Vec<u64>>());
//! ```

pub mod core;
mod error;
mod trace;

pub use crate::core::{checked_normalize, normalize, Consumer, Producer, RingBuffer, MAX_CAPACITY};
pub use error::RingError;
pub use trace::init_tracing;
