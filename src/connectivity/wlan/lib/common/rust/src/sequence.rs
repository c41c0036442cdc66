// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// IEEE Std 802.11-2016, 9.2.4.4.2
pub const MAX_SEQ_NUM: u16 = 4095;

/// Hands out the 12-bit sequence number for every MAC header sent by a STA. The first frame is
/// numbered 1 and the counter wraps from 4095 back to 0.
#[derive(Debug, Default)]
pub struct SequenceManager {
    last: u16,
}

impl SequenceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sns(&mut self) -> u16 {
        self.last = self.last.wrapping_add(1) & MAX_SEQ_NUM;
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one() {
        let mut seq_mgr = SequenceManager::new();
        assert_eq!(1, seq_mgr.next_sns());
        assert_eq!(2, seq_mgr.next_sns());
    }

    #[test]
    fn wraps_around() {
        let mut seq_mgr = SequenceManager::new();
        for _ in 0..MAX_SEQ_NUM - 1 {
            seq_mgr.next_sns();
        }
        assert_eq!(MAX_SEQ_NUM, seq_mgr.next_sns());
        assert_eq!(0, seq_mgr.next_sns());
        assert_eq!(1, seq_mgr.next_sns());
    }
}
