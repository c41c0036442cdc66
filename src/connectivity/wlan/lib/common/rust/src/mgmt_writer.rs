// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::{
    appendable::Appendable,
    error::FrameWriteError,
    mac::{FrameControl, HtControl, MacAddr, MgmtHdr, OptionalField, SequenceControl},
};

/// Builds the header of a management frame sent by a client to the AP of its BSS.
pub fn mgmt_hdr_to_ap(
    frame_ctrl: FrameControl,
    bssid: MacAddr,
    client_addr: MacAddr,
    seq_ctrl: SequenceControl,
) -> MgmtHdr {
    MgmtHdr { frame_ctrl, duration: 0, addr1: bssid, addr2: client_addr, addr3: bssid, seq_ctrl }
}

/// Writes a management header, followed by an HT Control field if one is given. The frame
/// control's +HTC/Order bit must not be set unless an HT Control field is written.
pub fn write_mgmt_hdr<B: Appendable>(
    buf: &mut B,
    mut mgmt_hdr: MgmtHdr,
    ht_ctrl: Option<HtControl>,
) -> Result<(), FrameWriteError> {
    let mut frame_ctrl = { mgmt_hdr.frame_ctrl };
    match ht_ctrl {
        Some(_) => frame_ctrl.set_htc_order(true),
        None if frame_ctrl.htc_order() => {
            return Err(FrameWriteError::new_invalid_data(
                "htc_order bit set while HT-Control is absent",
            ));
        }
        None => (),
    }
    mgmt_hdr.frame_ctrl = frame_ctrl;

    let len = MgmtHdr::len(HtControl::presence(ht_ctrl.is_some()));
    if !buf.can_append(len) {
        return Err(FrameWriteError::BufferTooSmall);
    }
    buf.append_value(&mgmt_hdr)?;
    if let Some(ht_ctrl) = ht_ctrl {
        buf.append_value(&ht_ctrl.0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, crate::buffer_writer::BufferWriter, zerocopy::AsBytes};

    #[test]
    fn hdr_to_ap() {
        let got = mgmt_hdr_to_ap(
            FrameControl(0b00110001_00110000),
            [1; 6],
            [2; 6],
            SequenceControl(0b11000000_10010000),
        );
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b00110000, 0b00110001, // Frame Control
                0, 0, // duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                1, 1, 1, 1, 1, 1, // addr3
                0b10010000, 0b11000000, // Sequence Control
            ][..],
            got.as_bytes()
        );
    }

    #[test]
    fn too_small_buffer() {
        let mut bytes = [0u8; 20];
        let mut w = BufferWriter::new(&mut bytes[..]);
        let hdr = mgmt_hdr_to_ap(FrameControl(0), [1; 6], [2; 6], SequenceControl(0));
        assert_eq!(Err(FrameWriteError::BufferTooSmall), write_mgmt_hdr(&mut w, hdr, None));
        assert_eq!(0, w.bytes_written());
    }

    #[test]
    fn invalid_ht_configuration() {
        let mut buf = vec![];
        let fc = FrameControl(0b10110001_00110000);
        let hdr = mgmt_hdr_to_ap(fc, [1; 6], [2; 6], SequenceControl(0));
        assert!(write_mgmt_hdr(&mut buf, hdr, None).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn write_fixed_fields_only() {
        let mut buf = vec![];
        let hdr = MgmtHdr {
            frame_ctrl: FrameControl(0b00110001_00110000),
            duration: 0,
            addr1: [1; 6],
            addr2: [2; 6],
            addr3: [3; 6],
            seq_ctrl: SequenceControl(0b11000000_10010000),
        };
        write_mgmt_hdr(&mut buf, hdr, None).expect("Failed writing mgmt frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b00110000, 0b00110001, // Frame Control
                0, 0, // duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0b10010000, 0b11000000, // Sequence Control
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn write_ht_ctrl() {
        let mut buf = vec![];
        let hdr = MgmtHdr {
            frame_ctrl: FrameControl(0b00110001_00110000),
            duration: 0,
            addr1: [1; 6],
            addr2: [2; 6],
            addr3: [3; 6],
            seq_ctrl: SequenceControl(0b11000000_10010000),
        };
        write_mgmt_hdr(&mut buf, hdr, Some(HtControl(0b10101111_11000011_11110000_10101010)))
            .expect("Failed writing mgmt frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b00110000, 0b10110001, // Frame Control
                0, 0, // duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0b10010000, 0b11000000, // Sequence Control
                // Ht Control
                0b10101010, 0b11110000, 0b11000011, 0b10101111,
            ][..],
            &buf[..]
        );
    }
}
