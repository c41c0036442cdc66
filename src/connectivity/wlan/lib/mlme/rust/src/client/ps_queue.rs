// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {log::warn, std::collections::VecDeque};

/// Ethernet frames held back while the client is away from the BSS channel. Once full, the
/// oldest frame is dropped to make room for a new one.
#[derive(Debug)]
pub struct PowerSaveQueue {
    frames: VecDeque<Vec<u8>>,
    capacity: usize,
}

impl PowerSaveQueue {
    pub fn new(capacity: usize) -> Self {
        Self { frames: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn enqueue(&mut self, frame: Vec<u8>) {
        if self.capacity == 0 {
            warn!("power-save queue has no capacity; dropping frame");
            return;
        }
        if self.frames.len() >= self.capacity {
            warn!("power-save queue full ({} frames); dropping oldest frame", self.capacity);
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Removes all frames in the order they were queued.
    pub fn drain(&mut self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.frames.drain(..)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order() {
        let mut queue = PowerSaveQueue::new(30);
        queue.enqueue(vec![1]);
        queue.enqueue(vec![2]);
        queue.enqueue(vec![3]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![vec![1], vec![2], vec![3]]);
        assert!(queue.is_empty());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut queue = PowerSaveQueue::new(30);
        for i in 0..31u8 {
            queue.enqueue(vec![i]);
        }
        assert_eq!(queue.len(), 30);
        let frames = queue.drain().collect::<Vec<_>>();
        assert_eq!(frames.first(), Some(&vec![1]));
        assert_eq!(frames.last(), Some(&vec![30]));
    }

    #[test]
    fn clear() {
        let mut queue = PowerSaveQueue::new(2);
        queue.enqueue(vec![1]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.drain().count(), 0);
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut queue = PowerSaveQueue::new(0);
        queue.enqueue(vec![1]);
        assert!(queue.is_empty());
    }
}
