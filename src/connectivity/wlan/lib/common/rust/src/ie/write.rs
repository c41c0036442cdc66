// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::*,
    crate::{appendable::Appendable, error::FrameWriteError},
    std::mem::size_of,
    zerocopy::AsBytes,
};

macro_rules! validate {
    ( $condition:expr, $message:expr ) => {
        if !$condition {
            return Err(FrameWriteError::new_invalid_data($message));
        }
    };
}

/// Writes an element header and its body. Nothing is written if the whole element does not fit.
fn write_element<B: Appendable>(buf: &mut B, id: Id, body: &[u8]) -> Result<(), FrameWriteError> {
    validate!(body.len() <= IE_MAX_LEN, "element body is too long");
    if !buf.can_append(size_of::<Header>() + body.len()) {
        return Err(FrameWriteError::BufferTooSmall);
    }
    buf.append_value(&Header { id, body_len: body.len() as u8 })?;
    buf.append_bytes(body)?;
    Ok(())
}

pub fn write_ssid<B: Appendable>(buf: &mut B, ssid: &[u8]) -> Result<(), FrameWriteError> {
    validate!(ssid.len() <= SSID_MAX_LEN, "SSID is too long");
    write_element(buf, Id::SSID, ssid)
}

pub fn write_supported_rates<B: Appendable>(
    buf: &mut B,
    rates: &[SupportedRate],
) -> Result<(), FrameWriteError> {
    validate!(!rates.is_empty(), "List of Supported Rates is empty");
    validate!(
        rates.len() <= SUPPORTED_RATES_MAX_LEN,
        "Too many Supported Rates. Did you mean to write Extended Supported Rates?"
    );
    write_element(buf, Id::SUPPORTED_RATES, rates.as_bytes())
}

pub fn write_ext_supported_rates<B: Appendable>(
    buf: &mut B,
    rates: &[SupportedRate],
) -> Result<(), FrameWriteError> {
    validate!(!rates.is_empty(), "List of Extended Supported Rates is empty");
    validate!(rates.len() <= EXT_SUPPORTED_RATES_MAX_LEN, "Too many Extended Supported Rates");
    write_element(buf, Id::EXT_SUPPORTED_RATES, rates.as_bytes())
}

pub fn write_tim<B: Appendable>(
    buf: &mut B,
    header: &TimHeader,
    bitmap: &[u8],
) -> Result<(), FrameWriteError> {
    validate!(!bitmap.is_empty(), "Partial virtual bitmap in TIM is empty");
    validate!(bitmap.len() <= TIM_MAX_BITMAP_LEN, "Partial virtual bitmap in TIM too large");
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(bitmap);
    write_element(buf, Id::TIM, &body[..])
}

pub fn write_ht_capabilities<B: Appendable>(
    buf: &mut B,
    ht_cap: &HtCapabilities,
) -> Result<(), FrameWriteError> {
    write_element(buf, Id::HT_CAPABILITIES, ht_cap.as_bytes())
}

pub fn write_ht_operation<B: Appendable>(
    buf: &mut B,
    ht_op: &HtOperation,
) -> Result<(), FrameWriteError> {
    write_element(buf, Id::HT_OPERATION, ht_op.as_bytes())
}

pub fn write_vht_capabilities<B: Appendable>(
    buf: &mut B,
    vht_cap: &VhtCapabilities,
) -> Result<(), FrameWriteError> {
    write_element(buf, Id::VHT_CAPABILITIES, vht_cap.as_bytes())
}

pub fn write_vht_operation<B: Appendable>(
    buf: &mut B,
    vht_op: &VhtOperation,
) -> Result<(), FrameWriteError> {
    write_element(buf, Id::VHT_OPERATION, vht_op.as_bytes())
}

/// Writes an RSNE which is already serialized, header included. The element is not inspected
/// beyond its header.
pub fn write_rsne<B: Appendable>(buf: &mut B, rsne: &[u8]) -> Result<(), FrameWriteError> {
    let mut elements = Reader::new(rsne);
    let body_len = match elements.next() {
        Some((Id::RSNE, body)) => body.len(),
        _ => return Err(FrameWriteError::new_invalid_data("not an RSNE")),
    };
    validate!(size_of::<Header>() + body_len == rsne.len(), "trailing bytes after RSNE");
    if !buf.can_append(rsne.len()) {
        return Err(FrameWriteError::BufferTooSmall);
    }
    buf.append_bytes(rsne)?;
    Ok(())
}
