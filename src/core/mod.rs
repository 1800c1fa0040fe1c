//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: hanya atomic load/store, tidak ada Mutex/RwLock
//! - No-Allocation: storage pre-allocated saat init, tidak pernah resize
//! - Non-Blocking: write/read selalu return segera dengan jumlah yang ditransfer

mod capacity;
mod handle;
mod ring_buffer;
mod slot;
mod stream;

pub use capacity::{checked_normalize, normalize, MAX_CAPACITY};
pub use handle::{Consumer, Producer};
pub use ring_buffer::RingBuffer;
