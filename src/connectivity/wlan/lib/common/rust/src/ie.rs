// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod fields;
mod intersect;
mod rates_writer;
mod reader;
mod write;

use {
    crate::error::{FrameParseError, FrameParseResult},
    zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

pub use {fields::*, intersect::*, rates_writer::*, reader::*, write::*};

#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Id(pub u8);

// IEEE Std 802.11-2016, 9.4.2.1, Table 9-77
impl Id {
    pub const SSID: Self = Self(0);
    pub const SUPPORTED_RATES: Self = Self(1);
    pub const DSSS_PARAM_SET: Self = Self(3);
    pub const TIM: Self = Self(5);
    pub const COUNTRY: Self = Self(7);
    pub const HT_CAPABILITIES: Self = Self(45);
    pub const RSNE: Self = Self(48);
    pub const EXT_SUPPORTED_RATES: Self = Self(50);
    pub const HT_OPERATION: Self = Self(61);
    pub const VHT_CAPABILITIES: Self = Self(191);
    pub const VHT_OPERATION: Self = Self(192);
    pub const VENDOR_SPECIFIC: Self = Self(221);
    pub const EXTENSION: Self = Self(255);
}

#[repr(C, packed)]
#[derive(AsBytes, FromBytes, Unaligned, Clone, Copy)]
pub struct Header {
    pub id: Id,
    pub body_len: u8,
}

pub const IE_MAX_LEN: usize = 255;
pub const SSID_MAX_LEN: usize = 32;
pub const SUPPORTED_RATES_MAX_LEN: usize = 8;
pub const EXT_SUPPORTED_RATES_MAX_LEN: usize = IE_MAX_LEN;

pub fn parse_ssid<B: ByteSlice>(raw_body: B) -> FrameParseResult<B> {
    if raw_body.len() > SSID_MAX_LEN {
        return Err(FrameParseError(format!("SSID is too long: {} bytes", raw_body.len())));
    }
    Ok(raw_body)
}

pub fn parse_supported_rates<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, [SupportedRate]>> {
    if raw_body.is_empty() {
        return Err(FrameParseError("Empty Supported Rates element".to_string()));
    }
    // Some APs advertise more rates than fit in the element, so the upper bound is not enforced.
    LayoutVerified::new_slice_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid Supported Rates element".to_string()))
}

pub fn parse_extended_supported_rates<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, [SupportedRate]>> {
    if raw_body.is_empty() {
        return Err(FrameParseError("Empty Extended Supported Rates element".to_string()));
    }
    LayoutVerified::new_slice_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid Extended Supported Rates element".to_string()))
}

pub fn parse_tim<B: ByteSlice>(raw_body: B) -> FrameParseResult<TimView<B>> {
    let (header, bitmap) = LayoutVerified::<B, TimHeader>::new_unaligned_from_prefix(raw_body)
        .ok_or_else(|| FrameParseError("TIM element is too short".to_string()))?;
    if bitmap.is_empty() {
        return Err(FrameParseError("Bitmap in TIM is empty".to_string()));
    }
    if bitmap.len() > TIM_MAX_BITMAP_LEN {
        return Err(FrameParseError("Bitmap in TIM is too long".to_string()));
    }
    Ok(TimView { header, bitmap })
}

pub fn parse_ht_capabilities<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, HtCapabilities>> {
    LayoutVerified::new_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid length of HT Capabilities element".to_string()))
}

pub fn parse_ht_operation<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, HtOperation>> {
    LayoutVerified::new_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid length of HT Operation element".to_string()))
}

pub fn parse_vht_capabilities<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, VhtCapabilities>> {
    LayoutVerified::new_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid length of VHT Capabilities element".to_string()))
}

pub fn parse_vht_operation<B: ByteSlice>(
    raw_body: B,
) -> FrameParseResult<LayoutVerified<B, VhtOperation>> {
    LayoutVerified::new_unaligned(raw_body)
        .ok_or_else(|| FrameParseError("Invalid length of VHT Operation element".to_string()))
}

#[cfg(test)]
mod tests {
    use {super::*, crate::test_utils::fake_frames::*};

    #[test]
    fn ssid_ok() {
        assert_eq!(Ok(&[0u8; 0][..]), parse_ssid(&[0u8; 0][..]));
        assert_eq!(Ok(&[1u8, 2, 3][..]), parse_ssid(&[1u8, 2, 3][..]));
    }

    #[test]
    fn ssid_too_long() {
        let err = parse_ssid(&[0u8; 33][..]).expect_err("expected SSID to be rejected");
        assert!(format!("{}", err).contains("SSID is too long"));
    }

    #[test]
    fn supported_rates() {
        let rates = parse_supported_rates(&[0x82u8, 0x84, 0x0b][..]).expect("expected valid rates");
        assert_eq!(3, rates.len());
        assert!(rates[0].basic());
        assert_eq!(2, rates[0].rate());
        assert!(!rates[2].basic());
        assert_eq!(11, rates[2].rate());
    }

    #[test]
    fn empty_supported_rates() {
        assert!(parse_supported_rates(&[0u8; 0][..]).is_err());
        assert!(parse_extended_supported_rates(&[0u8; 0][..]).is_err());
    }

    #[test]
    fn tim_ok() {
        let tim = parse_tim(&[1u8, 2, 3, 4, 5][..]).expect("expected valid TIM");
        assert_eq!(1, tim.header.dtim_count);
        assert_eq!(2, tim.header.dtim_period);
        assert_eq!(1, tim.header.bmp_ctrl.offset());
        assert!(tim.header.bmp_ctrl.group_traffic());
        assert_eq!(&[4, 5], &tim.bitmap[..]);
    }

    #[test]
    fn tim_invalid() {
        assert!(parse_tim(&[1u8, 2][..]).is_err());
        assert!(parse_tim(&[1u8, 2, 3][..]).is_err());
        assert!(parse_tim(&[0u8; 3 + TIM_MAX_BITMAP_LEN + 1][..]).is_err());
    }

    #[test]
    fn ht_capabilities() {
        let ht_cap = parse_ht_capabilities(&FAKE_HT_CAPABILITIES[..]).expect("expected HT caps");
        let ht_cap_info = { ht_cap.ht_cap_info };
        assert_eq!(ChanWidthSet::TWENTY_FORTY.0, ht_cap_info.chan_width_set());
        assert!(parse_ht_capabilities(&FAKE_HT_CAPABILITIES[..25]).is_err());
    }

    #[test]
    fn ht_operation() {
        let ht_op = parse_ht_operation(&FAKE_HT_OPERATION[..]).expect("expected HT operation");
        assert_eq!(FAKE_HT_OPERATION[0], ht_op.primary_chan);
        assert!(parse_ht_operation(&FAKE_HT_OPERATION[..21]).is_err());
    }

    #[test]
    fn vht_elements() {
        assert!(parse_vht_capabilities(&FAKE_VHT_CAPABILITIES[..]).is_ok());
        assert!(parse_vht_capabilities(&FAKE_VHT_CAPABILITIES[..11]).is_err());
        let vht_op = parse_vht_operation(&FAKE_VHT_OPERATION[..]).expect("expected VHT op");
        assert_eq!(FAKE_VHT_OPERATION[0], vht_op.vht_cbw);
        assert!(parse_vht_operation(&[0u8; 4][..]).is_err());
    }
}
