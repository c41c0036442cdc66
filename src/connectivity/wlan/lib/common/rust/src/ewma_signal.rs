// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::energy::DecibelMilliWatt;

/// Exponentially weighted moving average of the signal strength of a peer.
///
/// DecibelMilliWatt uses an i8 to represent the signal strength. Due to integer rounding, small
/// updates may never move an i8 average (avg(-50, -51) rounds to -50), so the average is kept as
/// an f64 and only rounded when read.
#[derive(Clone, Debug, PartialEq)]
pub struct EwmaSignalStrength {
    current: f64,
    weighting_factor: f64,
}

impl EwmaSignalStrength {
    pub fn new(n: usize, initial_signal: DecibelMilliWatt) -> Self {
        Self { current: initial_signal.0.into(), weighting_factor: n as f64 }
    }

    pub fn dbm(&self) -> DecibelMilliWatt {
        DecibelMilliWatt(self.current.round() as i8)
    }

    // Linear rather than logarithmic average; it is more representative of performance.
    pub fn update_average(&mut self, dbm: DecibelMilliWatt) {
        let weight = 2.0 / (1.0 + self.weighting_factor);
        self.current = weight * (dbm.0 as f64) + (1.0 - weight) * self.current
    }
}
