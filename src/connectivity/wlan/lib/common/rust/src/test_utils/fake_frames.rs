// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::mac::MacAddr;

pub const MSDU_1_PAYLOAD: &[u8] = &[0x45, 0x00, 0x00, 0x1c, 0x33];
pub const MSDU_2_PAYLOAD: &[u8] = &[0x45, 0x00, 0x00, 0x20, 0x11, 0x22, 0x44];

#[rustfmt::skip]
pub const FAKE_HT_CAPABILITIES: [u8; 26] = [
    0xef, 0x09, // HT capabilities info
    0x17, // A-MPDU parameters
    0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, // MCS set
    0x00, 0x00, // HT extended capabilities
    0x00, 0x00, 0x00, 0x00, // Transmit beamforming
    0x00, // Antenna selection capabilities
];

#[rustfmt::skip]
pub const FAKE_HT_OPERATION: [u8; 22] = [
    0x8c, // Primary channel: 140
    0x0d, // secondary channel above, any channel width, RIFS permitted
    0x16, 0x00, 0x00, 0x00, // HT info subsets
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, // Basic MCS set
];

#[rustfmt::skip]
pub const FAKE_VHT_CAPABILITIES: [u8; 12] = [
    0x91, 0x59, 0x82, 0x0f, // VHT capabilities info
    0xea, 0xff, 0x00, 0x00, 0xea, 0xff, 0x00, 0x00, // VHT supported MCS set
];

pub const FAKE_VHT_OPERATION: [u8; 5] = [0x00, 0x00, 0x00, 0x00, 0x00];

/// A management frame with an empty subtype and a three byte body of 9s.
pub fn make_mgmt_frame(ht_ctrl: bool) -> Vec<u8> {
    #[rustfmt::skip]
    let mut bytes = vec![
        1, if ht_ctrl { 128 } else { 1 }, // fc
        2, 2, // duration
        3, 3, 3, 3, 3, 3, // addr1
        4, 4, 4, 4, 4, 4, // addr2
        5, 5, 5, 5, 5, 5, // addr3
        6, 6, // sequence control
    ];
    if ht_ctrl {
        bytes.extend_from_slice(&[7, 7, 7, 8]);
    }
    bytes.extend_from_slice(&[9, 9, 9]);
    bytes
}

/// A QoS data frame from the distribution system carrying a single LLC frame. Setting `addr4`
/// marks the frame as relayed between distribution systems.
pub fn make_data_frame_single_llc(addr4: Option<MacAddr>, ht_ctrl: Option<[u8; 4]>) -> Vec<u8> {
    let mut fc_byte2 = 0b00000010;
    if addr4.is_some() {
        fc_byte2 |= 0b00000001;
    }
    if ht_ctrl.is_some() {
        fc_byte2 |= 0b10000000;
    }
    #[rustfmt::skip]
    let mut bytes = vec![
        // Data Header
        0b10001000, fc_byte2, // Frame Control
        2, 2, // duration
        3, 3, 3, 3, 3, 3, // addr1
        4, 4, 4, 4, 4, 4, // addr2
        5, 5, 5, 5, 5, 5, // addr3
        6, 6, // sequence control
    ];
    if let Some(addr4) = addr4 {
        bytes.extend_from_slice(&addr4);
    }
    // QoS Control
    bytes.extend_from_slice(&[1, 1]);
    if let Some(ht_ctrl) = ht_ctrl {
        bytes.extend_from_slice(&ht_ctrl);
    }
    #[rustfmt::skip]
    bytes.extend_from_slice(&[
        // LLC Header
        7, 7, 7, // DSAP, SSAP & control
        8, 8, 8, // OUI
        9, 10, // eth type
        // Trailing bytes
        11, 11, 11,
    ]);
    bytes
}

/// Same as `make_data_frame_single_llc` with two bytes of padding after the 26 byte header.
pub fn make_data_frame_with_padding() -> Vec<u8> {
    let mut bytes = make_data_frame_single_llc(None, None);
    let body = bytes.split_off(26);
    bytes.extend_from_slice(&[0, 0]);
    bytes.extend_from_slice(&body[..]);
    bytes
}

#[rustfmt::skip]
fn amsdu_data_hdr() -> Vec<u8> {
    vec![
        // Data header
        0x88, 0x02, // Frame Control: QoS data from DS
        0x2c, 0x00, // duration
        0x78, 0x8a, 0x20, 0x0d, 0x67, 0x03, // addr1
        0xb4, 0xf7, 0xa1, 0xbe, 0xb9, 0xab, // addr2
        0x78, 0x8a, 0x20, 0x0d, 0x67, 0x03, // addr3
        0x30, 0x00, // sequence control
        0x80, 0x00, // QoS Control: A-MSDU present
    ]
}

fn append_amsdu_subframe(
    bytes: &mut Vec<u8>,
    da: MacAddr,
    sa: MacAddr,
    protocol_id: [u8; 2],
    payload: &[u8],
) {
    let msdu_len = (8 + payload.len()) as u16;
    bytes.extend_from_slice(&da);
    bytes.extend_from_slice(&sa);
    bytes.extend_from_slice(&msdu_len.to_be_bytes());
    bytes.extend_from_slice(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&protocol_id);
    bytes.extend_from_slice(payload);
}

/// A QoS data frame carrying an A-MSDU made of two subframes. The first is padded to a 4 byte
/// boundary; the last is not.
pub fn make_data_frame_amsdu() -> Vec<u8> {
    let mut bytes = amsdu_data_hdr();
    append_amsdu_subframe(
        &mut bytes,
        [0x78, 0x8a, 0x20, 0x0d, 0x67, 0x03],
        [0xb4, 0xf7, 0xa1, 0xbe, 0xb9, 0xab],
        [0x08, 0x00],
        MSDU_1_PAYLOAD,
    );
    // 14 byte subframe header + 8 byte LLC header + 5 byte payload
    bytes.push(0);
    append_amsdu_subframe(
        &mut bytes,
        [0x78, 0x8a, 0x20, 0x0d, 0x67, 0x04],
        [0xb4, 0xf7, 0xa1, 0xbe, 0xb9, 0xac],
        [0x08, 0x01],
        MSDU_2_PAYLOAD,
    );
    bytes
}

/// Same as `make_data_frame_amsdu` but the second subframe is followed by a single byte which is
/// too short to be its padding, which invalidates that subframe.
pub fn make_data_frame_amsdu_padding_too_short() -> Vec<u8> {
    let mut bytes = make_data_frame_amsdu();
    bytes.push(0);
    bytes
}

/// A null data frame sent by an AP.
pub fn make_null_data_frame() -> Vec<u8> {
    #[rustfmt::skip]
    let bytes = vec![
        0b01001000, 0b00000010, // Frame Control
        0, 0, // duration
        3, 3, 3, 3, 3, 3, // addr1
        4, 4, 4, 4, 4, 4, // addr2
        5, 5, 5, 5, 5, 5, // addr3
        0x10, 0, // sequence control
    ];
    bytes
}
