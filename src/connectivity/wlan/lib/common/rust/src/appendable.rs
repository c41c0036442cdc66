// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::mem::size_of,
    thiserror::Error,
    zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned},
};

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("buffer is too small")]
pub struct BufferTooSmall;

/// A sink for bytes which grows as values are appended to it. Frames are written through this
/// trait so that the same writer code works on a growable `Vec<u8>` and on a fixed-size buffer.
pub trait Appendable {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall>;

    fn append_bytes_zeroed(&mut self, len: usize) -> Result<&mut [u8], BufferTooSmall>;

    fn bytes_written(&self) -> usize;

    fn can_append(&self, bytes: usize) -> bool;

    fn append_value<T: AsBytes + ?Sized>(&mut self, value: &T) -> Result<(), BufferTooSmall> {
        self.append_bytes(value.as_bytes())
    }

    fn append_byte(&mut self, byte: u8) -> Result<(), BufferTooSmall> {
        self.append_bytes(&[byte])
    }

    fn append_value_zeroed<T: FromBytes + Unaligned>(
        &mut self,
    ) -> Result<LayoutVerified<&mut [u8], T>, BufferTooSmall> {
        let bytes = self.append_bytes_zeroed(size_of::<T>())?;
        LayoutVerified::new_unaligned(bytes).ok_or(BufferTooSmall)
    }
}

impl Appendable for Vec<u8> {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn append_bytes_zeroed(&mut self, len: usize) -> Result<&mut [u8], BufferTooSmall> {
        let old_len = self.len();
        self.resize(old_len + len, 0);
        Ok(&mut self[old_len..])
    }

    fn bytes_written(&self) -> usize {
        self.len()
    }

    fn can_append(&self, _bytes: usize) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, packed)]
    #[derive(AsBytes, FromBytes, Unaligned)]
    struct Foo {
        x: u8,
        y: u16,
    }

    #[test]
    fn append_to_vec() {
        let mut buf = vec![];
        buf.append_bytes(&[1, 2, 3]).unwrap();
        buf.append_byte(4).unwrap();
        buf.append_value(&0x0605u16).unwrap();
        assert_eq!(6, buf.bytes_written());
        assert_eq!(&[1, 2, 3, 4, 5, 6], &buf[..]);
    }

    #[test]
    fn append_zeroed_value_to_vec() {
        let mut buf = vec![9];
        {
            let mut foo = buf.append_value_zeroed::<Foo>().unwrap();
            foo.x = 7;
            foo.y = 0x0201;
        }
        assert_eq!(&[9, 7, 1, 2], &buf[..]);
    }
}
