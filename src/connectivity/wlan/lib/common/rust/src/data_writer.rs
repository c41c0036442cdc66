// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::{
    appendable::Appendable,
    big_endian::BigEndianU16,
    error::FrameWriteError,
    mac::{
        self, FixedDataHdrFields, FrameControl, FrameType, HtControl, MacAddr, OptionalDataHdrFields,
        OptionalField, QosControl, SequenceControl,
    },
};

/// Builds the fixed header fields of a data frame sent by a client to the AP of its BSS.
/// `dst_addr` is the final destination of the frame behind the AP.
pub fn data_hdr_client_to_ap(
    mut frame_ctrl: FrameControl,
    bssid: MacAddr,
    client_addr: MacAddr,
    dst_addr: MacAddr,
    seq_ctrl: SequenceControl,
) -> FixedDataHdrFields {
    frame_ctrl.set_to_ds(true);
    frame_ctrl.set_from_ds(false);
    FixedDataHdrFields {
        frame_ctrl,
        duration: 0,
        addr1: bssid,
        addr2: client_addr,
        addr3: dst_addr,
        seq_ctrl,
    }
}

pub fn make_snap_llc_hdr(protocol_id: u16) -> mac::LlcHdr {
    mac::LlcHdr {
        dsap: mac::LLC_SNAP_EXTENSION,
        ssap: mac::LLC_SNAP_EXTENSION,
        control: mac::LLC_SNAP_UNNUMBERED_INFO,
        oui: mac::LLC_SNAP_OUI,
        protocol_id: BigEndianU16::from_native(protocol_id),
    }
}

/// Writes a data header with its optional fields. The frame control must be consistent with
/// the optional fields given: addr4 iff both DS bits are set, QoS Control iff a QoS subtype and
/// HT Control iff the +HTC/Order bit is set.
pub fn write_data_hdr<B: Appendable>(
    buf: &mut B,
    fixed: FixedDataHdrFields,
    optional: OptionalDataHdrFields,
) -> Result<(), FrameWriteError> {
    let fc = { fixed.frame_ctrl };
    if fc.typ() != FrameType::DATA {
        return Err(FrameWriteError::new_invalid_data("frame is not a data frame"));
    }
    if (fc.to_ds() && fc.from_ds()) != optional.addr4.is_some() {
        return Err(FrameWriteError::new_invalid_data("addr4 does not match DS bits"));
    }
    if fc.data_subtype().qos() != optional.qos_ctrl.is_some() {
        return Err(FrameWriteError::new_invalid_data("QoS Control does not match subtype"));
    }
    if fc.htc_order() != optional.ht_ctrl.is_some() {
        return Err(FrameWriteError::new_invalid_data("HT Control does not match htc_order bit"));
    }

    let len = FixedDataHdrFields::len(
        mac::Addr4::presence(optional.addr4.is_some()),
        QosControl::presence(optional.qos_ctrl.is_some()),
        HtControl::presence(optional.ht_ctrl.is_some()),
    );
    if !buf.can_append(len) {
        return Err(FrameWriteError::BufferTooSmall);
    }

    buf.append_value(&fixed)?;
    if let Some(addr4) = optional.addr4 {
        buf.append_value(&addr4)?;
    }
    if let Some(qos_ctrl) = optional.qos_ctrl {
        buf.append_value(&qos_ctrl.0)?;
    }
    if let Some(ht_ctrl) = optional.ht_ctrl {
        buf.append_value(&ht_ctrl.0)?;
    }
    Ok(())
}

pub fn write_snap_llc_hdr<B: Appendable>(
    buf: &mut B,
    protocol_id: u16,
) -> Result<(), FrameWriteError> {
    buf.append_value(&make_snap_llc_hdr(protocol_id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{buffer_writer::BufferWriter, mac::DataSubtype},
        zerocopy::AsBytes,
    };

    #[test]
    fn client_to_ap() {
        let got = data_hdr_client_to_ap(
            FrameControl(0b00110000_00110000),
            [1; 6],
            [2; 6],
            [3; 6],
            SequenceControl(4321),
        );
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b00110000, 0b00110001, // Frame Control
                0, 0, // duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0xe1, 0x10, // Sequence Control
            ][..],
            got.as_bytes()
        );
    }

    #[test]
    fn snap_llc_hdr() {
        let mut buf = vec![];
        write_snap_llc_hdr(&mut buf, 0x888E).expect("failed writing LLC header");
        assert_eq!(&[0xAA, 0xAA, 0x03, 0, 0, 0, 0x88, 0x8E][..], &buf[..]);
    }

    #[test]
    fn write_qos_data_hdr() {
        let mut buf = vec![];
        let fixed = data_hdr_client_to_ap(
            FrameControl::data(DataSubtype::QOS_DATA),
            [1; 6],
            [2; 6],
            [3; 6],
            SequenceControl(0x10),
        );
        let optional = OptionalDataHdrFields { qos_ctrl: Some(QosControl(0)), ..Default::default() };
        write_data_hdr(&mut buf, fixed, optional).expect("failed writing data header");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b10001000, 0b00000001, // Frame Control
                0, 0, // duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0x10, 0, // Sequence Control
                0, 0, // QoS Control
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn write_addr4_and_ht_ctrl() {
        let mut buf = vec![];
        let mut fc = FrameControl::data(DataSubtype::DATA);
        fc.set_to_ds(true);
        fc.set_from_ds(true);
        fc.set_htc_order(true);
        let fixed = FixedDataHdrFields {
            frame_ctrl: fc,
            duration: 0,
            addr1: [1; 6],
            addr2: [2; 6],
            addr3: [3; 6],
            seq_ctrl: SequenceControl(0),
        };
        let optional = OptionalDataHdrFields {
            addr4: Some([4; 6]),
            qos_ctrl: None,
            ht_ctrl: Some(HtControl(0x04030201)),
        };
        write_data_hdr(&mut buf, fixed, optional).expect("failed writing data header");
        assert_eq!(24 + 6 + 4, buf.len());
        assert_eq!(&[4, 4, 4, 4, 4, 4, 1, 2, 3, 4][..], &buf[24..]);
    }

    #[test]
    fn inconsistent_optional_fields() {
        let mut buf = vec![];
        let fixed = data_hdr_client_to_ap(
            FrameControl::data(DataSubtype::QOS_DATA),
            [1; 6],
            [2; 6],
            [3; 6],
            SequenceControl(0),
        );
        assert!(write_data_hdr(&mut buf, fixed, OptionalDataHdrFields::none()).is_err());

        let fixed = data_hdr_client_to_ap(
            FrameControl::data(DataSubtype::DATA),
            [1; 6],
            [2; 6],
            [3; 6],
            SequenceControl(0),
        );
        let optional = OptionalDataHdrFields { addr4: Some([4; 6]), ..Default::default() };
        assert!(write_data_hdr(&mut buf, fixed, optional).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn data_hdr_buffer_too_small() {
        let mut bytes = [0u8; 25];
        let mut w = BufferWriter::new(&mut bytes[..]);
        let fixed = data_hdr_client_to_ap(
            FrameControl::data(DataSubtype::QOS_DATA),
            [1; 6],
            [2; 6],
            [3; 6],
            SequenceControl(0),
        );
        let optional = OptionalDataHdrFields { qos_ctrl: Some(QosControl(0)), ..Default::default() };
        assert_eq!(Err(FrameWriteError::BufferTooSmall), write_data_hdr(&mut w, fixed, optional));
        assert_eq!(0, w.bytes_written());
    }
}
