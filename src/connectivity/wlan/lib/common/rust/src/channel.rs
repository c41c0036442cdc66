// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// Channel bandwidth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cbw {
    Cbw20,
    Cbw40,
    Cbw40Below,
    Cbw80,
    Cbw160,
    Cbw80P80 { secondary80: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    TwoGhz,
    FiveGhz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    pub primary: u8,
    pub cbw: Cbw,
}

impl Channel {
    pub fn new(primary: u8, cbw: Cbw) -> Self {
        Self { primary, cbw }
    }

    // IEEE Std 802.11-2016, Annex E: channels 1 through 14 live in the 2.4 GHz band.
    pub fn band(&self) -> Band {
        if self.primary <= 14 {
            Band::TwoGhz
        } else {
            Band::FiveGhz
        }
    }

    /// Whether the channel spans more than the primary 20 MHz.
    pub fn is_wider_than_20mhz(&self) -> bool {
        self.cbw != Cbw::Cbw20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band() {
        assert_eq!(Band::TwoGhz, Channel::new(1, Cbw::Cbw20).band());
        assert_eq!(Band::TwoGhz, Channel::new(14, Cbw::Cbw20).band());
        assert_eq!(Band::FiveGhz, Channel::new(36, Cbw::Cbw40).band());
    }

    #[test]
    fn width() {
        assert!(!Channel::new(6, Cbw::Cbw20).is_wider_than_20mhz());
        assert!(Channel::new(36, Cbw::Cbw40).is_wider_than_20mhz());
        assert!(Channel::new(36, Cbw::Cbw80P80 { secondary80: 106 }).is_wider_than_20mhz());
    }
}
