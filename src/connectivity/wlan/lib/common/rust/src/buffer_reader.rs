// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    byteorder::{ByteOrder, LittleEndian},
    std::mem::size_of,
    zerocopy::{ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

/// Reads typed headers and raw byte runs off the front of a byte slice. Nothing is consumed
/// unless the whole requested value fits into the remaining bytes.
pub struct BufferReader<B> {
    // Taken out only while a read splits it.
    buffer: Option<B>,
    bytes_read: usize,
}

impl<B: ByteSlice> BufferReader<B> {
    pub fn new(bytes: B) -> Self {
        BufferReader { buffer: Some(bytes), bytes_read: 0 }
    }

    pub fn peek<T: Unaligned>(&self) -> Option<LayoutVerified<&[u8], T>> {
        let bytes = self.buffer.as_ref()?;
        LayoutVerified::new_unaligned_from_prefix(&bytes[..]).map(|(value, _)| value)
    }

    pub fn peek_bytes(&self, len: usize) -> Option<&[u8]> {
        let bytes = self.buffer.as_ref()?;
        if bytes.len() < len {
            None
        } else {
            Some(&bytes[..len])
        }
    }

    pub fn peek_le_u16(&self) -> Option<u16> {
        self.peek_bytes(size_of::<u16>()).map(LittleEndian::read_u16)
    }

    pub fn read<T: Unaligned>(&mut self) -> Option<LayoutVerified<B, T>> {
        if self.bytes_remaining() < size_of::<T>() {
            return None;
        }
        let (value, remaining) = LayoutVerified::new_unaligned_from_prefix(self.buffer.take()?)?;
        self.bytes_read += size_of::<T>();
        self.buffer = Some(remaining);
        Some(value)
    }

    pub fn read_value<T: Unaligned + FromBytes + Copy>(&mut self) -> Option<T> {
        self.read::<T>().map(|value| *value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Option<B> {
        if self.bytes_remaining() < len {
            return None;
        }
        let (bytes, remaining) = self.buffer.take()?.split_at(len);
        self.bytes_read += len;
        self.buffer = Some(remaining);
        Some(bytes)
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|bytes| bytes[0])
    }

    pub fn read_le_u16(&mut self) -> Option<u16> {
        self.read_bytes(size_of::<u16>()).map(|bytes| LittleEndian::read_u16(&bytes[..]))
    }

    pub fn read_le_u32(&mut self) -> Option<u32> {
        self.read_bytes(size_of::<u32>()).map(|bytes| LittleEndian::read_u32(&bytes[..]))
    }

    pub fn into_remaining(self) -> B {
        match self.buffer {
            Some(bytes) => bytes,
            // Reads check the length before taking the buffer, so it is always put back.
            None => unreachable!("BufferReader lost its buffer"),
        }
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buffer.as_ref().map_or(0, |bytes| bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, packed)]
    #[derive(FromBytes, Unaligned, Clone, Copy)]
    struct Foo {
        x: u8,
        y: u16,
    }

    #[test]
    fn read_and_peek() {
        let data = [1u8, 2, 3, 4, 5, 6, 7];
        let mut reader = BufferReader::new(&data[..]);
        assert_eq!(Some(0x0201), reader.peek_le_u16());
        let foo = reader.peek::<Foo>().expect("expected Foo");
        assert_eq!(1, foo.x);
        assert_eq!(0, reader.bytes_read());

        let foo = reader.read_value::<Foo>().expect("expected Foo");
        assert_eq!(1, foo.x);
        assert_eq!(0x0302, { foo.y });
        assert_eq!(3, reader.bytes_read());
        assert_eq!(4, reader.bytes_remaining());

        assert_eq!(Some(4), reader.read_byte());
        assert_eq!(Some(0x0605), reader.read_le_u16());
        assert_eq!(&[7], reader.into_remaining());
    }

    #[test]
    fn read_too_large_consumes_nothing() {
        let data = [1u8, 2];
        let mut reader = BufferReader::new(&data[..]);
        assert!(reader.read::<Foo>().is_none());
        assert!(reader.read_bytes(3).is_none());
        assert!(reader.read_le_u32().is_none());
        assert_eq!(0, reader.bytes_read());
        assert_eq!(2, reader.bytes_remaining());
        assert_eq!(Some(&[1u8, 2][..]), reader.read_bytes(2));
        assert_eq!(0, reader.bytes_remaining());
        assert!(reader.read_byte().is_none());
    }
}
