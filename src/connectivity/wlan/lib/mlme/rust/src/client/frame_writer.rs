// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Writers for every frame a client sends to its AP.

use {
    crate::error::Error,
    std::mem::size_of,
    wlan_common::{
        appendable::Appendable,
        buffer_writer::BufferWriter,
        data_writer, frame_len,
        ie::{self, HtCapabilities, RatesWriter, SupportedRate},
        mac::{self, MacAddr},
        mgmt_writer,
        sequence::SequenceManager,
    },
};

/// Runs `write` against a buffer of exactly `max_len` bytes and returns the written prefix.
/// A frame which does not fit fails with `Error::BufferTooSmall` instead of growing the buffer.
pub fn write_frame_with_fixed_buf<F>(max_len: usize, write: F) -> Result<Vec<u8>, Error>
where
    F: FnOnce(&mut BufferWriter<&mut [u8]>) -> Result<(), Error>,
{
    let mut buf = vec![0u8; max_len];
    let written = {
        let mut w = BufferWriter::new(&mut buf[..]);
        write(&mut w)?;
        w.bytes_written()
    };
    buf.truncate(written);
    Ok(buf)
}

fn next_seq_ctrl(seq_mgr: &mut SequenceManager) -> mac::SequenceControl {
    let mut seq_ctrl = mac::SequenceControl(0);
    seq_ctrl.set_seq_num(seq_mgr.next_sns());
    seq_ctrl
}

fn write_mgmt_hdr_to_ap<B: Appendable>(
    buf: &mut B,
    subtype: mac::MgmtSubtype,
    bssid: MacAddr,
    client_addr: MacAddr,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    let frame_ctrl = mac::FrameControl::mgmt(subtype);
    let seq_ctrl = next_seq_ctrl(seq_mgr);
    mgmt_writer::write_mgmt_hdr(
        buf,
        mgmt_writer::mgmt_hdr_to_ap(frame_ctrl, bssid, client_addr, seq_ctrl),
        None,
    )?;
    Ok(())
}

/// Writes the first frame of an open system authentication.
pub fn write_open_auth_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    write_mgmt_hdr_to_ap(buf, mac::MgmtSubtype::AUTH, bssid, client_addr, seq_mgr)?;
    buf.append_value(&mac::AuthHdr {
        auth_alg_num: mac::AuthAlgorithmNumber::OPEN,
        auth_txn_seq_num: 1,
        status_code: mac::StatusCode::SUCCESS,
    })?;
    Ok(())
}

pub fn write_deauth_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    reason_code: mac::ReasonCode,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    write_mgmt_hdr_to_ap(buf, mac::MgmtSubtype::DEAUTH, bssid, client_addr, seq_mgr)?;
    buf.append_value(&mac::DeauthHdr { reason_code })?;
    Ok(())
}

/// Elements and fixed fields of an association request which depend on the BSS.
pub struct AssocReqBody<'a> {
    pub capabilities: mac::CapabilityInfo,
    pub ssid: &'a [u8],
    pub rates: &'a [SupportedRate],
    /// Full element, header included.
    pub rsne: Option<&'a [u8]>,
    pub ht_cap: Option<HtCapabilities>,
}

impl AssocReqBody<'_> {
    /// Length of the association request frame carrying this body.
    pub fn frame_len(&self) -> usize {
        let elem_hdr_len = size_of::<ie::Header>();
        let mut len = frame_len!(mac::MgmtHdr, mac::AssocReqHdr);
        len += elem_hdr_len + self.ssid.len();
        len += elem_hdr_len + std::cmp::min(self.rates.len(), ie::SUPPORTED_RATES_MAX_LEN);
        if self.rates.len() > ie::SUPPORTED_RATES_MAX_LEN {
            len += elem_hdr_len + self.rates.len() - ie::SUPPORTED_RATES_MAX_LEN;
        }
        len += self.rsne.map_or(0, |rsne| rsne.len());
        if self.ht_cap.is_some() {
            len += elem_hdr_len + size_of::<HtCapabilities>();
        }
        len
    }
}

/// Writes an association request. Rates exceeding the Supported Rates element spill over into
/// the Extended Supported Rates element.
pub fn write_assoc_req_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    body: &AssocReqBody<'_>,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    // Checked first so that nothing is written when the rates cannot be represented.
    let rates_writer = RatesWriter::try_new(body.rates)?;

    write_mgmt_hdr_to_ap(buf, mac::MgmtSubtype::ASSOC_REQ, bssid, client_addr, seq_mgr)?;
    buf.append_value(&mac::AssocReqHdr { capabilities: body.capabilities, listen_interval: 0 })?;
    ie::write_ssid(buf, body.ssid)?;
    rates_writer.write_supported_rates(buf)?;
    rates_writer.write_ext_supported_rates(buf)?;
    if let Some(rsne) = body.rsne {
        ie::write_rsne(buf, rsne)?;
    }
    if let Some(ht_cap) = body.ht_cap.as_ref() {
        ie::write_ht_capabilities(buf, ht_cap)?;
    }
    Ok(())
}

/// Writes an Action frame carrying the given body, category included.
pub fn write_action_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    body: &[u8],
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    write_mgmt_hdr_to_ap(buf, mac::MgmtSubtype::ACTION, bssid, client_addr, seq_mgr)?;
    buf.append_bytes(body)?;
    Ok(())
}

/// Writes a null-data frame. The power management bit tells the AP whether to buffer frames
/// for this client.
pub fn write_null_data_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    pwr_mgmt: bool,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    let mut frame_ctrl = mac::FrameControl::data(mac::DataSubtype::NULL);
    frame_ctrl.set_pwr_mgmt(pwr_mgmt);
    let seq_ctrl = next_seq_ctrl(seq_mgr);
    data_writer::write_data_hdr(
        buf,
        data_writer::data_hdr_client_to_ap(frame_ctrl, bssid, client_addr, bssid, seq_ctrl),
        mac::OptionalDataHdrFields::none(),
    )?;
    Ok(())
}

/// Fills a given buffer with a null-data frame.
pub fn write_keep_alive_resp_frame<B: Appendable>(
    buf: &mut B,
    bssid: MacAddr,
    client_addr: MacAddr,
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    write_null_data_frame(buf, bssid, client_addr, false, seq_mgr)
}

pub fn write_ps_poll_frame<B: Appendable>(
    buf: &mut B,
    aid: u16,
    bssid: MacAddr,
    client_addr: MacAddr,
) -> Result<(), Error> {
    buf.append_value(&mac::FrameControl::ctrl(mac::CtrlSubtype::PS_POLL))?;
    buf.append_value(&mac::PsPoll::new(aid, bssid, client_addr))?;
    Ok(())
}

/// Addressing and protection of an LLC/SNAP data frame sent to the DS.
pub struct DataFrameParams {
    pub addr1: MacAddr,
    pub src: MacAddr,
    pub dst: MacAddr,
    pub protected: bool,
    /// Writes a default, all zero QoS Control field. Full QoS is not supported, but HT and VHT
    /// rates mandate QoS data frames.
    pub qos_ctrl: bool,
}

pub fn write_data_frame<B: Appendable>(
    buf: &mut B,
    params: &DataFrameParams,
    ether_type: u16,
    payload: &[u8],
    seq_mgr: &mut SequenceManager,
) -> Result<(), Error> {
    let subtype =
        if params.qos_ctrl { mac::DataSubtype::QOS_DATA } else { mac::DataSubtype::DATA };
    let mut frame_ctrl = mac::FrameControl::data(subtype);
    frame_ctrl.set_to_ds(true);
    frame_ctrl.set_protected(params.protected);
    let qos_ctrl = if params.qos_ctrl { Some(mac::QosControl(0)) } else { None };
    let seq_ctrl = next_seq_ctrl(seq_mgr);
    data_writer::write_data_hdr(
        buf,
        mac::FixedDataHdrFields {
            frame_ctrl,
            duration: 0,
            addr1: params.addr1,
            addr2: params.src,
            addr3: params.dst,
            seq_ctrl,
        },
        mac::OptionalDataHdrFields { qos_ctrl, ..mac::OptionalDataHdrFields::none() },
    )?;
    data_writer::write_snap_llc_hdr(buf, ether_type)?;
    buf.append_bytes(payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        wlan_common::{assert_variant, test_utils::fake_frames::FAKE_HT_CAPABILITIES},
        zerocopy::LayoutVerified,
    };

    #[test]
    fn open_auth_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_open_auth_frame(&mut buf, [1; 6], [2; 6], &mut seq_mgr)
            .expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                // Mgmt header
                0b10110000, 0, // Frame Control
                0, 0, // Duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                1, 1, 1, 1, 1, 1, // addr3
                0x10, 0, // Sequence Control
                // Auth body
                0, 0, // Auth Algorithm Number
                1, 0, // Auth Txn Seq Number
                0, 0, // Status code
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn deauth_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_deauth_frame(
            &mut buf,
            [1; 6],
            [2; 6],
            mac::ReasonCode::LEAVING_NETWORK_DEAUTH,
            &mut seq_mgr,
        )
        .expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                // Mgmt header
                0b11000000, 0, // Frame Control
                0, 0, // Duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                1, 1, 1, 1, 1, 1, // addr3
                0x10, 0, // Sequence Control
                // Deauth body
                3, 0, // Reason code
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_deauth_frame(&mut buf, [1; 6], [2; 6], mac::ReasonCode(1), &mut seq_mgr)
            .expect("failed writing frame");
        buf.clear();
        write_deauth_frame(&mut buf, [1; 6], [2; 6], mac::ReasonCode(1), &mut seq_mgr)
            .expect("failed writing frame");
        assert_eq!(&[0x20, 0][..], &buf[22..24]);
    }

    #[test]
    fn assoc_req_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        let mut capabilities = mac::CapabilityInfo(0);
        capabilities.set_ess(true);
        capabilities.set_short_preamble(true);
        let rates = [2u8, 4, 11, 22, 12, 18, 24, 36, 48]
            .iter()
            .map(|r| SupportedRate::new(*r, *r == 2))
            .collect::<Vec<_>>();
        let ht_cap = *LayoutVerified::<_, HtCapabilities>::new_unaligned(&FAKE_HT_CAPABILITIES[..])
            .expect("valid HT capabilities");
        let body = AssocReqBody {
            capabilities,
            ssid: b"foo",
            rates: &rates[..],
            rsne: Some(&[48, 2, 1, 0][..]),
            ht_cap: Some(ht_cap),
        };
        write_assoc_req_frame(&mut buf, [1; 6], [2; 6], &body, &mut seq_mgr)
            .expect("failed writing frame");
        #[rustfmt::skip]
        let expected_prefix = [
            // Mgmt header
            0, 0, // Frame Control
            0, 0, // Duration
            1, 1, 1, 1, 1, 1, // addr1
            2, 2, 2, 2, 2, 2, // addr2
            1, 1, 1, 1, 1, 1, // addr3
            0x10, 0, // Sequence Control
            // Assoc req body
            0x21, 0, // Capability info
            0, 0, // Listen interval
            0, 3, b'f', b'o', b'o', // SSID
            1, 8, 0x82, 4, 11, 22, 12, 18, 24, 36, // Supported rates
            50, 1, 48, // Extended supported rates
            48, 2, 1, 0, // RSNE
            45, 26, // HT Capabilities header
        ];
        assert_eq!(&expected_prefix[..], &buf[..expected_prefix.len()]);
        assert_eq!(&FAKE_HT_CAPABILITIES[..], &buf[expected_prefix.len()..]);
    }

    #[test]
    fn assoc_req_frame_without_rates() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        let body = AssocReqBody {
            capabilities: mac::CapabilityInfo(0),
            ssid: b"foo",
            rates: &[],
            rsne: None,
            ht_cap: None,
        };
        assert!(write_assoc_req_frame(&mut buf, [1; 6], [2; 6], &body, &mut seq_mgr).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn action_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_action_frame(&mut buf, [1; 6], [2; 6], &[3, 2, 0, 8, 1, 0], &mut seq_mgr)
            .expect("failed writing frame");
        assert_eq!(&[0b11010000, 0][..], &buf[..2]);
        assert_eq!(&[3, 2, 0, 8, 1, 0][..], &buf[24..]);
    }

    #[test]
    fn keep_alive_resp_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_keep_alive_resp_frame(&mut buf, [1; 6], [2; 6], &mut seq_mgr)
            .expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b01001000, 0b1, // Frame Control
                0, 0, // Duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                1, 1, 1, 1, 1, 1, // addr3
                0x10, 0, // Sequence Control
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn power_mgmt_null_data_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        write_null_data_frame(&mut buf, [1; 6], [2; 6], true, &mut seq_mgr)
            .expect("failed writing frame");
        assert_eq!(&[0b01001000, 0b00010001][..], &buf[..2]);
        assert_eq!(24, buf.len());
    }

    #[test]
    fn ps_poll_frame() {
        let mut buf = vec![];
        write_ps_poll_frame(&mut buf, 5, [1; 6], [2; 6]).expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b10100100, 0, // Frame Control
                0x05, 0xc0, // AID
                1, 1, 1, 1, 1, 1, // BSSID
                2, 2, 2, 2, 2, 2, // TA
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn data_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        let params = DataFrameParams {
            addr1: [1; 6],
            src: [2; 6],
            dst: [3; 6],
            protected: false,
            qos_ctrl: false,
        };
        write_data_frame(&mut buf, &params, 0x0800, &[11, 12, 13], &mut seq_mgr)
            .expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                // Data header
                0b00001000, 0b00000001, // Frame Control
                0, 0, // Duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0x10, 0, // Sequence Control
                // LLC header
                0xAA, 0xAA, 0x03, // DSAP, SSAP, Control
                0, 0, 0, // OUI
                0x08, 0x00, // Protocol ID
                // Payload
                11, 12, 13,
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn protected_qos_data_frame() {
        let mut buf = vec![];
        let mut seq_mgr = SequenceManager::new();
        let params = DataFrameParams {
            addr1: [1; 6],
            src: [2; 6],
            dst: [3; 6],
            protected: true,
            qos_ctrl: true,
        };
        write_data_frame(&mut buf, &params, mac::ETHER_TYPE_EAPOL, &[11], &mut seq_mgr)
            .expect("failed writing frame");
        #[rustfmt::skip]
        assert_eq!(
            &[
                0b10001000, 0b01000001, // Frame Control
                0, 0, // Duration
                1, 1, 1, 1, 1, 1, // addr1
                2, 2, 2, 2, 2, 2, // addr2
                3, 3, 3, 3, 3, 3, // addr3
                0x10, 0, // Sequence Control
                0, 0, // QoS Control
                0xAA, 0xAA, 0x03, 0, 0, 0, 0x88, 0x8E, // LLC header
                11, // Payload
            ][..],
            &buf[..]
        );
    }

    #[test]
    fn data_frame_buffer_too_small() {
        let mut bytes = [0u8; 30];
        let mut w = BufferWriter::new(&mut bytes[..]);
        let mut seq_mgr = SequenceManager::new();
        let params = DataFrameParams {
            addr1: [1; 6],
            src: [2; 6],
            dst: [3; 6],
            protected: false,
            qos_ctrl: false,
        };
        assert!(write_data_frame(&mut w, &params, 0x0800, &[1, 2, 3], &mut seq_mgr).is_err());
    }

    #[test]
    fn fixed_buf_fits_frame() {
        let mut seq_mgr = SequenceManager::new();
        let frame = write_frame_with_fixed_buf(frame_len!(mac::MgmtHdr, mac::AuthHdr), |w| {
            write_open_auth_frame(w, [1; 6], [2; 6], &mut seq_mgr)
        })
        .expect("failed writing frame");
        assert_eq!(30, frame.len());
        assert_eq!(&[0b10110000, 0][..], &frame[..2]);
    }

    #[test]
    fn fixed_buf_truncates_to_written_len() {
        let frame = write_frame_with_fixed_buf(64, |w| {
            write_ps_poll_frame(w, 5, [1; 6], [2; 6])
        })
        .expect("failed writing frame");
        assert_eq!(frame_len!(mac::FrameControl, mac::PsPoll), frame.len());
    }

    #[test]
    fn fixed_buf_too_small() {
        let mut seq_mgr = SequenceManager::new();
        let result = write_frame_with_fixed_buf(4, |w| {
            write_open_auth_frame(w, [1; 6], [2; 6], &mut seq_mgr)
        });
        assert_variant!(result, Err(Error::BufferTooSmall));

        let result = write_frame_with_fixed_buf(frame_len!(mac::MgmtHdr), |w| {
            write_deauth_frame(w, [1; 6], [2; 6], mac::ReasonCode(1), &mut seq_mgr)
        });
        assert_variant!(result, Err(Error::BufferTooSmall));
    }

    #[test]
    fn assoc_req_frame_len_matches_written_frame() {
        let rates = (1..=12u8).map(|r| SupportedRate::new(r, false)).collect::<Vec<_>>();
        let ht_cap = *LayoutVerified::<_, HtCapabilities>::new_unaligned(&FAKE_HT_CAPABILITIES[..])
            .expect("valid HT capabilities");
        let bodies = [
            AssocReqBody {
                capabilities: mac::CapabilityInfo(0),
                ssid: b"foo",
                rates: &rates[..4],
                rsne: None,
                ht_cap: None,
            },
            AssocReqBody {
                capabilities: mac::CapabilityInfo(0),
                ssid: b"foobar",
                rates: &rates[..],
                rsne: Some(&[48, 2, 1, 0][..]),
                ht_cap: Some(ht_cap),
            },
        ];
        for body in &bodies {
            let mut seq_mgr = SequenceManager::new();
            let frame = write_frame_with_fixed_buf(body.frame_len(), |w| {
                write_assoc_req_frame(w, [1; 6], [2; 6], body, &mut seq_mgr)
            })
            .expect("failed writing frame");
            assert_eq!(body.frame_len(), frame.len());

            let result = write_frame_with_fixed_buf(body.frame_len() - 1, |w| {
                write_assoc_req_frame(w, [1; 6], [2; 6], body, &mut seq_mgr)
            });
            assert_variant!(result, Err(Error::BufferTooSmall));
        }
    }
}
