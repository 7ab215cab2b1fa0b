// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles, exposed to this crate's own tests and, behind
//! `test-support`, to `qgate-cli`'s dev-dependencies.

use async_trait::async_trait;
use parking_lot::Mutex;
use qgate_core::Event;

use crate::notifier::Subscriber;

/// A [`Subscriber`] that records every event it receives, in order.
#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<Event>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn send(&self, event: &Event) -> Result<(), String> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
