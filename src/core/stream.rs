//! Adapter `std::io` untuk ring buffer byte.
//!
//! Ring buffer tidak pernah block, jadi buffer penuh (write) atau kosong
//! (read) dilaporkan sebagai `ErrorKind::WouldBlock`, sama seperti socket
//! non-blocking. `Ok(0)` hanya untuk slice kosong: `Ok(0)` dari `read`
//! berarti EOF dan dari `write` membuat `write_all` gagal dengan `WriteZero`.

use std::io;

use super::handle::{Consumer, Producer};
use super::ring_buffer::RingBuffer;

#[inline]
fn would_block_if_zero(n: usize, requested: usize) -> io::Result<usize> {
    if n == 0 && requested > 0 {
        Err(io::ErrorKind::WouldBlock.into())
    } else {
        Ok(n)
    }
}

impl io::Write for Producer<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = Producer::write(self, buf);
        would_block_if_zero(n, buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Data sudah terlihat consumer begitu write() selesai
        Ok(())
    }
}

impl io::Read for Consumer<u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = Consumer::read(self, buf);
        would_block_if_zero(n, buf.len())
    }
}

impl io::Write for RingBuffer<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = RingBuffer::write(self, buf);
        would_block_if_zero(n, buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for RingBuffer<u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = RingBuffer::read(self, buf);
        would_block_if_zero(n, buf.len())
    }
}
