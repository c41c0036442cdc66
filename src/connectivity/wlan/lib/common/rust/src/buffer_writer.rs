// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::appendable::{Appendable, BufferTooSmall},
    zerocopy::ByteSliceMut,
};

/// Writes into a fixed-size buffer. Every append is checked against the space left in the
/// buffer; a failed append leaves the writer unchanged.
pub struct BufferWriter<B> {
    buffer: B,
    written: usize,
}

impl<B: ByteSliceMut> BufferWriter<B> {
    pub fn new(buffer: B) -> Self {
        Self { buffer, written: 0 }
    }

    /// Consumes the writer and returns the prefix of the buffer which was written to.
    pub fn into_written(self) -> B {
        let (written, _) = self.buffer.split_at(self.written);
        written
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }
}

impl<B: ByteSliceMut> Appendable for BufferWriter<B> {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall> {
        let dst = self.append_bytes_zeroed(bytes.len())?;
        dst.copy_from_slice(bytes);
        Ok(())
    }

    fn append_bytes_zeroed(&mut self, len: usize) -> Result<&mut [u8], BufferTooSmall> {
        if !self.can_append(len) {
            return Err(BufferTooSmall);
        }
        let start = self.written;
        self.written += len;
        let bytes = &mut self.buffer[start..start + len];
        for b in bytes.iter_mut() {
            *b = 0;
        }
        Ok(bytes)
    }

    fn bytes_written(&self) -> usize {
        self.written
    }

    fn can_append(&self, bytes: usize) -> bool {
        self.remaining() >= bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_within_bounds() {
        let mut buf = [0xffu8; 5];
        let mut w = BufferWriter::new(&mut buf[..]);
        w.append_bytes(&[1, 2]).unwrap();
        w.append_bytes_zeroed(1).unwrap();
        assert_eq!(3, w.bytes_written());
        assert_eq!(2, w.remaining());
        assert_eq!(&w.into_written()[..], &[1, 2, 0]);
    }

    #[test]
    fn write_past_end_fails_without_side_effects() {
        let mut buf = [0u8; 3];
        let mut w = BufferWriter::new(&mut buf[..]);
        w.append_bytes(&[1, 2]).unwrap();
        assert_eq!(Err(BufferTooSmall), w.append_bytes(&[3, 4]));
        assert_eq!(2, w.bytes_written());
        w.append_byte(3).unwrap();
        assert!(!w.can_append(1));
        assert_eq!(&w.into_written()[..], &[1, 2, 3]);
    }

    #[test]
    fn write_value_zeroed() {
        let mut buf = [0xffu8; 4];
        let mut w = BufferWriter::new(&mut buf[..]);
        {
            let mut value = w.append_value_zeroed::<[u8; 2]>().unwrap();
            value[1] = 5;
        }
        assert_eq!(&w.into_written()[..], &[0, 5]);
    }
}
