// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{appendable::Appendable, big_endian::BigEndianU16, error::FrameWriteError, mac::MacAddr},
    zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

// https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml
pub const ETHER_TYPE_EAPOL: u16 = 0x888E;
pub const ETHER_TYPE_IPV4: u16 = 0x0800;
pub const ETHER_TYPE_IPV6: u16 = 0x86DD;

pub const MAX_ETH_FRAME_LEN: usize = 2048;

// IEEE Std 802.3-2015, 3.1.1
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct EthernetIIHdr {
    pub da: MacAddr,
    pub sa: MacAddr,
    pub ether_type: BigEndianU16,
}

/// An Ethernet II frame as exchanged with the host side of the bridge.
pub struct EthernetFrame<B: ByteSlice> {
    pub hdr: LayoutVerified<B, EthernetIIHdr>,
    pub body: B,
}

impl<B: ByteSlice> EthernetFrame<B> {
    /// Returns None if `bytes` cannot hold an Ethernet II header.
    pub fn parse(bytes: B) -> Option<Self> {
        let (hdr, body) = LayoutVerified::new_unaligned_from_prefix(bytes)?;
        Some(Self { hdr, body })
    }
}

/// Writes a complete Ethernet II frame. Used when an MSDU received over the air is handed to the
/// host.
pub fn write_eth_frame<A: Appendable>(
    buf: &mut A,
    da: MacAddr,
    sa: MacAddr,
    ether_type: u16,
    body: &[u8],
) -> Result<(), FrameWriteError> {
    buf.append_value(&EthernetIIHdr { da, sa, ether_type: BigEndianU16::from_native(ether_type) })?;
    buf.append_bytes(body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, crate::buffer_writer::BufferWriter};

    #[test]
    fn parse_eth_frame() {
        #[rustfmt::skip]
        let bytes = [
            1, 2, 3, 4, 5, 6, // da
            7, 8, 9, 10, 11, 12, // sa
            0x88, 0x8E, // ether_type
            99, 98, // body
        ];
        let frame = EthernetFrame::parse(&bytes[..]).expect("valid ethernet frame");
        assert_eq!([1, 2, 3, 4, 5, 6], frame.hdr.da);
        assert_eq!([7, 8, 9, 10, 11, 12], frame.hdr.sa);
        assert_eq!(ETHER_TYPE_EAPOL, frame.hdr.ether_type.to_native());
        assert_eq!(&[99, 98], &frame.body[..]);
    }

    #[test]
    fn parse_eth_frame_too_short() {
        assert!(EthernetFrame::parse(&[0u8; 13][..]).is_none());
        let frame = EthernetFrame::parse(&[0u8; 14][..]).expect("header only frame");
        assert!(frame.body.is_empty());
    }

    #[test]
    fn write_frame() {
        let mut buf = vec![];
        write_eth_frame(&mut buf, [1; 6], [2; 6], ETHER_TYPE_IPV4, &[5, 6, 7])
            .expect("failed writing ethernet frame");
        #[rustfmt::skip]
        assert_eq!(&[
            1, 1, 1, 1, 1, 1,
            2, 2, 2, 2, 2, 2,
            0x08, 0x00,
            5, 6, 7,
        ][..], &buf[..]);
    }

    #[test]
    fn write_frame_buffer_too_small() {
        let mut buf = [0u8; 16];
        let mut w = BufferWriter::new(&mut buf[..]);
        assert_eq!(
            Err(FrameWriteError::BufferTooSmall),
            write_eth_frame(&mut w, [1; 6], [2; 6], ETHER_TYPE_IPV6, &[5, 6, 7])
        );
    }
}
