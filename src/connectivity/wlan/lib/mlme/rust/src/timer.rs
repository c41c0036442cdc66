// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::{collections::HashMap, time::Duration},
    wlan_common::time::Time,
};

#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct EventId(pub u64);

/// The host's clock and timer facility. The host arms a timer for every scheduled deadline and
/// reports the `EventId` back to the MLME once it fires.
pub trait Scheduler {
    fn now(&self) -> Time;
    /// Requests to schedule an event. Returns a unique ID used to cancel the scheduled event.
    fn schedule(&mut self, deadline: Time) -> EventId;
    /// Cancels a previously scheduled event.
    fn cancel(&mut self, id: EventId);
}

/// A timer to schedule and cancel timeouts and retrieve triggered events.
pub struct Timer<E> {
    events: HashMap<EventId, E>,
    scheduler: Box<dyn Scheduler>,
}

impl<E> Timer<E> {
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self { events: HashMap::default(), scheduler }
    }

    pub fn now(&self) -> Time {
        self.scheduler.now()
    }

    /// Returns the event scheduled under `event_id`. An event triggers at most once, and never
    /// after it was canceled.
    pub fn triggered(&mut self, event_id: &EventId) -> Option<E> {
        self.events.remove(event_id)
    }

    pub fn schedule_event(&mut self, deadline: Time, event: E) -> EventId {
        let event_id = self.scheduler.schedule(deadline);
        self.events.insert(event_id, event);
        event_id
    }

    pub fn schedule_after(&mut self, duration: Duration, event: E) -> EventId {
        let deadline = self.now() + duration;
        self.schedule_event(deadline, event)
    }

    pub fn cancel_event(&mut self, event_id: EventId) {
        if self.events.remove(&event_id).is_some() {
            self.scheduler.cancel(event_id);
        }
    }

    pub fn cancel_all(&mut self) {
        for (event_id, _) in self.events.drain() {
            self.scheduler.cancel(event_id);
        }
    }

    pub fn scheduled_event_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
pub use test_utils::*;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_cancel_event() {
        #[derive(PartialEq, Eq, Debug, Hash)]
        struct FooEvent(u8);

        let fake_scheduler = FakeScheduler::new();

        // Verify event triggers no more than once.
        let mut timer = Timer::<FooEvent>::new(Box::new(fake_scheduler.clone()));
        let deadline = Time::from_nanos(5);
        let event_id = timer.schedule_event(deadline, FooEvent(8));
        assert_eq!(timer.triggered(&event_id), Some(FooEvent(8)));
        assert_eq!(timer.triggered(&event_id), None);

        // Verify event does not trigger if it was canceled.
        let event_id = timer.schedule_event(deadline, FooEvent(9));
        timer.cancel_event(event_id);
        assert_eq!(timer.triggered(&event_id), None);
        assert_eq!(None, fake_scheduler.deadline(event_id));

        // Verify multiple events can be scheduled and canceled.
        let event_id_1 = timer.schedule_event(deadline, FooEvent(8));
        let event_id_2 = timer.schedule_event(deadline, FooEvent(9));
        let event_id_3 = timer.schedule_event(deadline, FooEvent(10));
        timer.cancel_event(event_id_2);
        assert_eq!(timer.triggered(&event_id_2), None);
        assert_eq!(timer.triggered(&event_id_3), Some(FooEvent(10)));
        assert_eq!(timer.triggered(&event_id_1), Some(FooEvent(8)));
    }

    #[test]
    fn cancel_all() {
        let fake_scheduler = FakeScheduler::new();
        let mut timer = Timer::<_>::new(Box::new(fake_scheduler.clone()));
        let deadline = Time::from_nanos(5);

        let event_id_1 = timer.schedule_event(deadline, 8);
        let event_id_2 = timer.schedule_event(deadline, 9);
        let event_id_3 = timer.schedule_event(deadline, 10);
        assert_eq!(3, timer.scheduled_event_count());
        timer.cancel_all();
        assert_eq!(timer.triggered(&event_id_1), None);
        assert_eq!(timer.triggered(&event_id_2), None);
        assert_eq!(timer.triggered(&event_id_3), None);
        assert!(fake_scheduler.scheduled().is_empty());
    }

    #[test]
    fn schedule_after_uses_scheduler_clock() {
        let fake_scheduler = FakeScheduler::new();
        fake_scheduler.set_time(Time::from_nanos(1_000));
        let mut timer = Timer::<u8>::new(Box::new(fake_scheduler.clone()));
        let event_id = timer.schedule_after(Duration::from_nanos(500), 1);
        assert_eq!(Some(Time::from_nanos(1_500)), fake_scheduler.deadline(event_id));
    }

    #[test]
    fn fire_next_in_deadline_order() {
        let fake_scheduler = FakeScheduler::new();
        let mut timer = Timer::<u8>::new(Box::new(fake_scheduler.clone()));
        let late = timer.schedule_event(Time::from_nanos(30), 1);
        let early = timer.schedule_event(Time::from_nanos(10), 2);

        assert_eq!(Some(early), fake_scheduler.fire_next());
        assert_eq!(Time::from_nanos(10), timer.now());
        assert_eq!(Some(late), fake_scheduler.fire_next());
        assert_eq!(Time::from_nanos(30), timer.now());
        assert_eq!(None, fake_scheduler.fire_next());

        fake_scheduler.advance(Duration::from_nanos(5));
        assert_eq!(Time::from_nanos(35), timer.now());
    }
}
