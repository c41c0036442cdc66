// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::{
        ops::{Add, Sub},
        time::Duration,
    },
    zerocopy::{AsBytes, FromBytes},
};

/// IEEE Std 802.11-2016, 3.1: a time unit is 1024 microseconds.
#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeUnit(pub u16);

impl TimeUnit {
    pub const DEFAULT_BEACON_INTERVAL: Self = Self(100);
    pub const MICROS: u64 = 1024;
}

impl From<TimeUnit> for Duration {
    fn from(tu: TimeUnit) -> Duration {
        Duration::from_micros(tu.0 as u64 * TimeUnit::MICROS)
    }
}

/// A point on the monotonic clock the MLME is driven by, in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(i64);

impl Time {
    pub const ZERO: Self = Self(0);

    pub fn from_nanos(nanos: i64) -> Self {
        Time(nanos)
    }

    pub fn into_nanos(self) -> i64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` lies in the future.
    pub fn saturating_since(self, earlier: Time) -> Duration {
        if self.0 <= earlier.0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos((self.0 - earlier.0) as u64)
        }
    }
}

fn duration_to_nanos(duration: Duration) -> i64 {
    let nanos = duration.as_nanos();
    if nanos > i64::max_value() as u128 {
        i64::max_value()
    } else {
        nanos as i64
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        Time(self.0.saturating_add(duration_to_nanos(rhs)))
    }
}

impl Sub<Duration> for Time {
    type Output = Time;

    fn sub(self, rhs: Duration) -> Time {
        Time(self.0.saturating_sub(duration_to_nanos(rhs)))
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Time) -> Duration {
        self.saturating_since(rhs)
    }
}
