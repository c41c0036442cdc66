// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{Header, Id},
    crate::buffer_reader::BufferReader,
    std::mem::size_of,
    zerocopy::ByteSlice,
};

/// Walks a chain of information elements, yielding each element's ID and body. Iteration stops
/// at the first element whose header or body does not fit into the remaining bytes.
pub struct Reader<B>(BufferReader<B>);

impl<B: ByteSlice> Reader<B> {
    pub fn new(bytes: B) -> Self {
        Reader(BufferReader::new(bytes))
    }
}

impl<B: ByteSlice> Iterator for Reader<B> {
    type Item = (Id, B);

    fn next(&mut self) -> Option<Self::Item> {
        let body_len = self.0.peek::<Header>()?.body_len as usize;
        if self.0.bytes_remaining() < size_of::<Header>() + body_len {
            return None;
        }
        let header = self.0.read::<Header>()?;
        let body = self.0.read_bytes(body_len)?;
        Some((header.id, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn empty() {
        assert_eq!(None, Reader::new(&[0u8; 0][..]).next());
    }

    #[test]
    pub fn less_than_header() {
        assert_eq!(None, Reader::new(&[0u8][..]).next());
    }

    #[test]
    pub fn body_too_short() {
        assert_eq!(None, Reader::new(&[0u8, 2, 10][..]).next());
    }

    #[test]
    pub fn empty_body() {
        let elems: Vec<_> = Reader::new(&[0u8, 0][..]).collect();
        assert_eq!(&[(Id::SSID, &[][..])], &elems[..]);
    }

    #[test]
    pub fn two_elements() {
        let bytes = vec![0, 2, 10, 20, 1, 3, 11, 22, 33];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(
            &[(Id::SSID, &[10, 20][..]), (Id::SUPPORTED_RATES, &[11, 22, 33][..])],
            &elems[..]
        );
    }

    #[test]
    pub fn stops_at_truncated_element() {
        // The TIM element claims 200 bytes of body but only three follow.
        let bytes = vec![0, 1, 7, 5, 200, 1, 2, 3];
        let mut reader = Reader::new(&bytes[..]);
        assert_eq!(Some((Id::SSID, &[7][..])), reader.next());
        assert_eq!(None, reader.next());
        assert_eq!(None, reader.next());
    }

    #[test]
    pub fn trailing_byte_is_ignored() {
        let bytes = vec![1, 1, 0x82, 50];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(&[(Id::SUPPORTED_RATES, &[0x82][..])], &elems[..]);
    }
}
