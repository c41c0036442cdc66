// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    bitfield::{bitfield_bitrange, bitfield_fields},
    zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

// IEEE Std 802.11-2016, 9.4.2.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsBytes, FromBytes, Unaligned, Default)]
#[repr(C)]
pub struct SupportedRate(pub u8);

bitfield_bitrange! {struct SupportedRate(u8)}

impl SupportedRate {
    bitfield_fields! {
        u8;
        pub rate, set_rate: 6, 0;
        pub basic, set_basic: 7;
    }
}

impl SupportedRate {
    pub fn new(rate: u8, basic: bool) -> Self {
        let mut supported_rate = SupportedRate(0);
        supported_rate.set_rate(rate);
        supported_rate.set_basic(basic);
        supported_rate
    }
}

// IEEE Std 802.11-2016, 9.4.2.6
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Unaligned, Default)]
#[repr(C)]
pub struct BitmapControl(pub u8);

bitfield_bitrange! {struct BitmapControl(u8)}

impl BitmapControl {
    bitfield_fields! {
        u8;
        pub group_traffic, set_group_traffic: 0;
        pub offset, set_offset: 7, 1;
    }
}

pub const TIM_MAX_BITMAP_LEN: usize = 251;

// IEEE Std 802.11-2016, 9.4.2.6
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct TimHeader {
    pub dtim_count: u8,
    pub dtim_period: u8,
    pub bmp_ctrl: BitmapControl,
}

pub struct TimView<B> {
    pub header: LayoutVerified<B, TimHeader>,
    pub bitmap: B,
}

impl<B: ByteSlice> TimView<B> {
    /// Whether the partial virtual bitmap announces buffered traffic for `aid`.
    pub fn is_traffic_buffered(&self, aid: u16) -> bool {
        let aid = aid as usize;
        if aid >= TIM_MAX_BITMAP_LEN * 8 || self.bitmap.is_empty() {
            return false;
        }

        // Octets n1 through n2 of the traffic indication virtual bitmap are present.
        let n1 = self.header.bmp_ctrl.offset() as usize * 2;
        let n2 = n1 + self.bitmap.len() - 1;
        if n2 > TIM_MAX_BITMAP_LEN {
            return false;
        }

        let octet = aid / 8;
        if octet < n1 || octet > n2 {
            return false;
        }
        self.bitmap[octet - n1] & (1 << (aid % 8)) != 0
    }
}

// IEEE Std 802.11-2016, 9.4.2.56
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct HtCapabilities {
    pub ht_cap_info: HtCapabilityInfo, // u16
    pub ampdu_params: AmpduParams,     // u8
    pub mcs_set: SupportedMcsSet,      // u128
    pub ht_ext_cap: HtExtCapabilities, // u16
    pub txbf_cap: TxBfCapability,      // u32
    pub asel_cap: AselCapability,      // u8
}

// IEEE Std 802.11-2016, 9.4.2.56.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct HtCapabilityInfo(pub u16);

bitfield_bitrange! {struct HtCapabilityInfo(u16)}

impl HtCapabilityInfo {
    bitfield_fields! {
        u8;
        pub ldpc_coding_cap, set_ldpc_coding_cap: 0;
        pub chan_width_set, set_chan_width_set: 1, 1; // IEEE name: Supported Channel Width Set
        pub sm_power_save, set_sm_power_save: 3, 2; // Spatial Multiplexing Power Save
        pub greenfield, set_greenfield: 4; // HT-Greenfield.
        pub short_gi_20, set_short_gi_20: 5; // Short Guard Interval for 20 MHz
        pub short_gi_40, set_short_gi_40: 6; // Short Guard Interval for 40 MHz
        pub tx_stbc, set_tx_stbc: 7;
        pub rx_stbc, set_rx_stbc: 9, 8; // maximum number of spatial streams. Up to 3.
        pub delayed_block_ack, set_delayed_block_ack: 10; // HT-delayed Block Ack
        pub max_amsdu_len, set_max_amsdu_len: 11, 11;
        pub dsss_in_40, set_dsss_in_40: 12; // DSSS/CCK Mode in 40 MHz
        // bit 13 reserved
        pub intolerant_40, set_intolerant_40: 14; // 40 MHz Intolerant
        pub lsig_txop_protect, set_lsig_txop_protect: 15;
    }
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct ChanWidthSet(pub u8);

impl ChanWidthSet {
    pub const TWENTY_ONLY: Self = Self(0);
    pub const TWENTY_FORTY: Self = Self(1);
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct SmPowerSave(pub u8);

impl SmPowerSave {
    pub const STATIC: Self = Self(0);
    pub const DYNAMIC: Self = Self(1);
    // 2 reserved
    pub const DISABLED: Self = Self(3);
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct MaxAmsduLen(pub u8);

impl MaxAmsduLen {
    pub const OCTETS_3839: Self = Self(0);
    pub const OCTETS_7935: Self = Self(1);
}

// IEEE Std 802.11-2016, 9.4.2.56.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Unaligned, Default)]
#[repr(C)]
pub struct AmpduParams(pub u8);

bitfield_bitrange! {struct AmpduParams(u8)}

impl AmpduParams {
    bitfield_fields! {
        u8;
        pub exponent, set_exponent: 1, 0; // Maximum A-MPDU Length Exponent.
        pub min_start_spacing, set_min_start_spacing: 4, 2; // Minimum MPDU Start Spacing.
        // bit 5-7 reserved
    }
}

impl AmpduParams {
    pub fn max_ampdu_len(&self) -> usize {
        (1 << (13 + self.exponent())) - 1
    }
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct MinMpduStartSpacing(pub u8);

impl MinMpduStartSpacing {
    pub const NO_RESTRICT: Self = Self(0);
    pub const QUARTER_USEC: Self = Self(1);
    pub const HALF_USEC: Self = Self(2);
    pub const ONE_USEC: Self = Self(3);
    pub const TWO_USEC: Self = Self(4);
    pub const FOUR_USEC: Self = Self(5);
    pub const EIGHT_USEC: Self = Self(6);
    pub const SIXTEEN_USEC: Self = Self(7);
}

// IEEE Std 802.11-2016, 9.4.2.56.4
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct SupportedMcsSet(pub u128);

bitfield_bitrange! {struct SupportedMcsSet(u128)}

impl SupportedMcsSet {
    bitfield_fields! {
        u128;
        pub rx_mcs, set_rx_mcs: 76, 0;
        // bit 77-79 reserved
        pub u16, rx_highest_rate, set_rx_highest_rate: 89, 80; // in Mbps
        // bit 90-95 reserved
        pub tx_set_defined, set_tx_set_defined: 96;
        pub tx_rx_diff, set_tx_rx_diff: 97;
        pub u8, tx_max_ss, set_tx_max_ss: 99, 98;
        pub tx_ueqm, set_tx_ueqm: 100; // Transmit Unequal Modulation.
        // bit 101-127 reserved
    }
}

// IEEE Std 802.11-2016, 9.4.2.56.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct HtExtCapabilities(pub u16);

bitfield_bitrange! {struct HtExtCapabilities(u16)}

impl HtExtCapabilities {
    bitfield_fields! {
        u8;
        pub pco, set_pco: 0;
        pub pco_transition, set_pco_transition: 2, 1;
        // bit 3-7 reserved
        pub mcs_feedback, set_mcs_feedback: 9, 8;
        pub htc_ht_support, set_htc_ht_support: 10;
        pub rd_responder, set_rd_responder: 11;
        // bit 12-15 reserved
    }
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct PcoTransitionTime(pub u8);

impl PcoTransitionTime {
    pub const PCO_RESERVED: Self = Self(0); // Often translated as "No transition".
    pub const PCO_400_USEC: Self = Self(1);
    pub const PCO_1500_USEC: Self = Self(2);
    pub const PCO_5000_USEC: Self = Self(3);
}

// IEEE Std 802.11-2016, 9.4.2.56.6
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct TxBfCapability(pub u32);

bitfield_bitrange! {struct TxBfCapability(u32)}

impl TxBfCapability {
    bitfield_fields! {
        u8;
        pub implicit_rx, set_implicit_rx: 0;
        pub rx_stag_sounding, set_rx_stag_sounding: 1;
        pub tx_stag_sounding, set_tx_stag_sounding: 2;
        pub rx_ndp, set_rx_ndp: 3;
        pub tx_ndp, set_tx_ndp: 4;
        pub implicit, set_implicit: 5;
        pub calibration, set_calibration: 7, 6;
        pub csi, set_csi: 8; // Explicit CSI Transmit Beamforming.
        pub noncomp_steering, set_noncomp_steering: 9; // Explicit Noncompressed Steering
        pub comp_steering, set_comp_steering: 10; // Explicit Compressed Steering
        pub csi_feedback, set_csi_feedback: 12, 11;
        pub noncomp_feedback, set_noncomp_feedback: 14, 13;
        pub comp_feedback, set_comp_feedback: 16, 15;
        pub min_grouping, set_min_grouping: 18, 17;
        pub csi_antennas, set_csi_antennas: 20, 19;
        pub noncomp_steering_ants, set_noncomp_steering_ants: 22, 21;
        pub comp_steering_ants, set_comp_steering_ants: 24, 23;
        pub csi_rows, set_csi_rows: 26, 25;
        pub chan_estimation, set_chan_estimation: 28, 27;
        // bit 29-31 reserved
    }
}

// IEEE Std 802.11-2016, 9.4.2.56.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Unaligned, Default)]
#[repr(C)]
pub struct AselCapability(pub u8);

bitfield_bitrange! {struct AselCapability(u8)}

impl AselCapability {
    bitfield_fields! {
        u8;
        pub asel, set_asel: 0;
        pub csi_feedback_tx_asel, set_csi_feedback_tx_asel: 1; // Explicit CSI Feedback based Transmit ASEL
        pub ant_idx_feedback_tx_asel, set_ant_idx_feedback_tx_asel: 2;
        pub explicit_csi_feedback, set_explicit_csi_feedback: 3;
        pub antenna_idx_feedback, set_antenna_idx_feedback: 4;
        pub rx_asel, set_rx_asel: 5;
        pub tx_sounding_ppdu, set_tx_sounding_ppdu: 6;
        // bit 7 reserved
    }
}

// IEEE Std 802.11-2016, 9.4.2.57
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct HtOperation {
    pub primary_chan: u8, // Primary 20 MHz channel.

    // HT Operation Information is 5-byte field.
    pub ht_op_info_head: HtOpInfoHead,     // u8
    pub ht_op_info_tail: HtOpInfoTail,     // u32
    pub basic_ht_mcs_set: SupportedMcsSet, // u128
}

// IEEE Std 802.11-2016, 9.4.2.57, Figure 9-339
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Unaligned, Default)]
#[repr(C)]
pub struct HtOpInfoHead(pub u8);

bitfield_bitrange! {struct HtOpInfoHead(u8)}

impl HtOpInfoHead {
    bitfield_fields! {
        u8;
        pub secondary_chan_offset, set_secondary_chan_offset: 1, 0;
        pub sta_chan_width, set_sta_chan_width: 2, 2;
        pub rifs_mode_permitted, set_rifs_mode_permitted: 3;
        // bit 4-7 reserved
    }
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct SecChanOffset(pub u8);

impl SecChanOffset {
    pub const SECONDARY_NONE: Self = Self(0); // No secondary channel
    pub const SECONDARY_ABOVE: Self = Self(1); // Secondary channel is above the primary channel
    // 2 reserved
    pub const SECONDARY_BELOW: Self = Self(3); // Secondary channel is below the primary channel
}

// IEEE Std 802.11-2016, 9.4.2.57, Figure 9-339, continued
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct HtOpInfoTail(pub u32);

bitfield_bitrange! {struct HtOpInfoTail(u32)}

impl HtOpInfoTail {
    bitfield_fields! {
        u8;
        pub ht_protection, set_ht_protection: 1, 0;
        pub nongreenfield_present, set_nongreenfield_present: 2;
        // bit 3 reserved
        pub obss_non_ht_stas_present, set_obss_non_ht_stas_present: 4;
        pub center_freq_seg2, set_center_freq_seg2: 12, 5; // For VHT only.
        // bit 13-21 reserved
        pub dual_beacon, set_dual_beacon: 22;
        pub dual_cts_protection, set_dual_cts_protection: 23;
        pub stbc_beacon, set_stbc_beacon: 24;
        pub lsig_txop_protection, set_lsig_txop_protection: 25;
        pub pco_active, set_pco_active: 26;
        pub pco_phase, set_pco_phase: 27;
        // bit 28-31 reserved
    }
}

// IEEE Std 802.11-2016, 9.4.2.158
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct VhtCapabilities {
    pub vht_cap_info: VhtCapabilitiesInfo, // u32
    pub vht_mcs_nss: VhtMcsNssSet,         // u64
}

// IEEE Std 802.11-2016, 9.4.2.158.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct VhtCapabilitiesInfo(pub u32);

bitfield_bitrange! {struct VhtCapabilitiesInfo(u32)}

impl VhtCapabilitiesInfo {
    bitfield_fields! {
        u8;
        pub max_mpdu_len, set_max_mpdu_len: 1, 0;
        pub supported_cbw_set, set_supported_cbw_set: 3, 2;
        pub rx_ldpc, set_rx_ldpc: 4;
        pub sgi_cbw80, set_sgi_cbw80: 5;
        pub sgi_cbw160, set_sgi_cbw160: 6;
        pub tx_stbc, set_tx_stbc: 7;
        pub rx_stbc, set_rx_stbc: 10, 8;
        pub su_bfer, set_su_bfer: 11;
        pub su_bfee, set_su_bfee: 12;
        pub bfee_sts, set_bfee_sts: 15, 13;
        pub num_sounding, set_num_sounding: 18, 16;
        pub mu_bfer, set_mu_bfer: 19;
        pub mu_bfee, set_mu_bfee: 20;
        pub txop_ps, set_txop_ps: 21;
        pub htc_vht, set_htc_vht: 22;
        pub max_ampdu_exp, set_max_ampdu_exp: 25, 23;
        pub link_adapt, set_link_adapt: 27, 26;
        pub rx_ant_pattern, set_rx_ant_pattern: 28;
        pub tx_ant_pattern, set_tx_ant_pattern: 29;
        pub ext_nss_bw, set_ext_nss_bw: 31, 30;
    }
}

// IEEE Std 802.11-2016, 9.4.2.158.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct VhtMcsNssSet(pub u64);

bitfield_bitrange! {struct VhtMcsNssSet(u64)}

impl VhtMcsNssSet {
    bitfield_fields! {
        u16;
        // Two bits per spatial stream, 1 through 8. See `VhtMcsSet`.
        pub rx_max_mcs, set_rx_max_mcs: 15, 0;
        pub rx_max_data_rate, set_rx_max_data_rate: 28, 16;
        pub u8, max_nsts, set_max_nsts: 31, 29;
        pub tx_max_mcs, set_tx_max_mcs: 47, 32;
        pub tx_max_data_rate, set_tx_max_data_rate: 60, 48;
        pub ext_nss_bw, set_ext_nss_bw: 61;
        // bit 62-63 reserved
    }
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct VhtMcsSet(pub u8);

impl VhtMcsSet {
    pub const UP_TO_7: Self = Self(0);
    pub const UP_TO_8: Self = Self(1);
    pub const UP_TO_9: Self = Self(2);
    pub const NONE: Self = Self(3);
}

/// Returns the highest MCS supported for spatial stream `ss_num` (1-based) in a 16-bit MCS map.
pub fn vht_mcs_for_ss(mcs_map: u16, ss_num: u8) -> VhtMcsSet {
    VhtMcsSet(((mcs_map >> (2 * (ss_num - 1))) & 0b11) as u8)
}

// IEEE Std 802.11-2016, 9.4.2.159
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct VhtOperation {
    pub vht_cbw: u8,
    pub center_freq_seg0: u8,
    pub center_freq_seg1: u8,
    pub basic_mcs_nss: u16,
}

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct VhtChannelBandwidth(pub u8);

impl VhtChannelBandwidth {
    pub const CBW_20_40: Self = Self(0);
    pub const CBW_80_160_80P80: Self = Self(1);
}

#[cfg(test)]
mod tests {
    use {super::*, std::mem::size_of};

    #[test]
    fn element_sizes() {
        assert_eq!(26, size_of::<HtCapabilities>());
        assert_eq!(22, size_of::<HtOperation>());
        assert_eq!(12, size_of::<VhtCapabilities>());
        assert_eq!(5, size_of::<VhtOperation>());
        assert_eq!(3, size_of::<TimHeader>());
    }

    #[test]
    fn supported_rate() {
        let rate = SupportedRate::new(0x0c, true);
        assert_eq!(0x8c, rate.0);
        assert_eq!(0x0c, SupportedRate(0x8c).rate());
        assert!(!SupportedRate(0x0c).basic());
    }

    #[test]
    fn ht_capability_info_bits() {
        let info = HtCapabilityInfo(0x09ef);
        assert!(info.ldpc_coding_cap());
        assert_eq!(ChanWidthSet::TWENTY_FORTY.0, info.chan_width_set());
        assert_eq!(SmPowerSave::DISABLED.0, info.sm_power_save());
        assert!(info.short_gi_20());
        assert!(info.short_gi_40());
        assert!(info.tx_stbc());
        assert_eq!(1, info.rx_stbc());
        assert_eq!(MaxAmsduLen::OCTETS_7935.0, info.max_amsdu_len());
    }

    #[test]
    fn supported_mcs_set_bits() {
        let mut mcs_set = SupportedMcsSet(0);
        mcs_set.set_rx_mcs(0xff);
        mcs_set.set_rx_highest_rate(150);
        mcs_set.set_tx_set_defined(true);
        mcs_set.set_tx_max_ss(3);
        assert_eq!(0xff, mcs_set.rx_mcs());
        assert_eq!(150, mcs_set.rx_highest_rate());
        assert_eq!(0xff | (150 << 80) | (1 << 96) | (3 << 98), mcs_set.0);
    }

    #[test]
    fn ampdu_params() {
        let params = AmpduParams(0x17);
        assert_eq!(3, params.exponent());
        assert_eq!(MinMpduStartSpacing::FOUR_USEC.0, params.min_start_spacing());
        assert_eq!(65535, params.max_ampdu_len());
    }

    #[test]
    fn vht_mcs_map() {
        let mut mcs_nss = VhtMcsNssSet(0);
        mcs_nss.set_rx_max_mcs(0xfffa);
        mcs_nss.set_max_nsts(2);
        assert_eq!(VhtMcsSet::UP_TO_9, vht_mcs_for_ss(mcs_nss.rx_max_mcs(), 1));
        assert_eq!(VhtMcsSet::UP_TO_9, vht_mcs_for_ss(mcs_nss.rx_max_mcs(), 2));
        assert_eq!(VhtMcsSet::NONE, vht_mcs_for_ss(mcs_nss.rx_max_mcs(), 3));
        assert_eq!(VhtMcsSet::NONE, vht_mcs_for_ss(mcs_nss.rx_max_mcs(), 8));
        assert_eq!(2, mcs_nss.max_nsts());
    }

    fn tim(bytes: &[u8]) -> TimView<&[u8]> {
        let (header, bitmap) =
            LayoutVerified::new_unaligned_from_prefix(bytes).expect("TIM header too short");
        TimView { header, bitmap }
    }

    #[test]
    fn tim_traffic_buffered() {
        // AID 5 is in octet 0, bit 5.
        assert!(tim(&[0, 1, 0, 0b0010_0000]).is_traffic_buffered(5));
        assert!(!tim(&[0, 1, 0, 0b0010_0000]).is_traffic_buffered(4));
        // AID 9 is in octet 1.
        assert!(tim(&[0, 1, 0, 0, 0b0000_0010]).is_traffic_buffered(9));
    }

    #[test]
    fn tim_traffic_buffered_with_offset() {
        // An offset of 1 means the bitmap starts at octet 2, covering AIDs 16 through 23.
        assert!(tim(&[0, 1, 0b10, 0b0000_0001]).is_traffic_buffered(16));
        assert!(!tim(&[0, 1, 0b10, 0b0000_0001]).is_traffic_buffered(0));
        assert!(!tim(&[0, 1, 0b10, 0b0000_0001]).is_traffic_buffered(24));
    }

    #[test]
    fn tim_no_traffic_for_invalid_input() {
        assert!(!tim(&[0, 1, 0]).is_traffic_buffered(0));
        assert!(!tim(&[0, 1, 0, 0xff]).is_traffic_buffered(251 * 8));
        // Offset 127 puts the bitmap past the largest allowed octet.
        assert!(!tim(&[0, 1, 0xfe, 0xff, 0xff]).is_traffic_buffered(254 * 8));
    }
}
