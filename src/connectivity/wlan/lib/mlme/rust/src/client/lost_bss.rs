// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::{cmp::max, time::Duration},
    wlan_common::{time::Time, TimeUnit},
};

/// Counts down the time left before the BSS is declared lost and the client deauthenticates
/// itself. Time spent off the BSS channel is not charged: the counter is paused when leaving the
/// channel and resumed on return.
#[derive(Debug)]
pub struct LostBssCounter {
    /// Time without a single beacon after which the BSS is considered lost.
    full_timeout: Duration,
    remaining: Duration,
    /// Time up to which `remaining` was charged.
    last_accounted: Time,
}

impl LostBssCounter {
    pub fn start(beacon_period: u16, full_timeout_beacon_count: u32, now: Time) -> Self {
        let full_timeout = Duration::from(TimeUnit(beacon_period)) * full_timeout_beacon_count;
        Self { full_timeout, remaining: full_timeout, last_accounted: now }
    }

    /// A beacon was received, the full timeout is available again.
    pub fn reset(&mut self, now: Time) {
        self.remaining = self.full_timeout;
        self.last_accounted = now;
    }

    /// Charges the time elapsed since the last accounting and returns what remains.
    pub fn account(&mut self, now: Time) -> Duration {
        let unaccounted = now - self.last_accounted;
        self.remaining = self.remaining.checked_sub(unaccounted).unwrap_or_default();
        self.last_accounted = now;
        self.remaining
    }

    /// The client came back to the BSS channel. Returns the delay after which the timeout should
    /// fire next, never shorter than a single TU.
    pub fn resume(&mut self, now: Time) -> Duration {
        self.last_accounted = now;
        max(self.remaining, Duration::from(TimeUnit(1)))
    }

    pub fn should_deauthenticate(&self) -> bool {
        self.remaining == Duration::default()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}
