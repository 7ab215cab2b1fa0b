// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier + Scoped Notifier (spec.md §4.1).
//!
//! The subscriber map is shared, message-passing state (spec.md §9): one
//! `Notifier` fans out to every subscriber of a session, protected by a
//! single `tokio::sync::Mutex` since writers may run on any task.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use qgate_core::{Event, GlobalStatus, ModuleId, ModuleOutcome, MetricsReport, SessionId, StreamEncoding};
use tokio::sync::Mutex;

/// A transport-side handle that receives serialized events for a session.
/// The transport (out of scope here) implements this over its actual push
/// channel; tests implement it over an in-memory queue.
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn send(&self, event: &Event) -> Result<(), String>;
}

/// Fans structured events out to every subscriber attached to a session.
#[derive(Default)]
pub struct Notifier {
    subscribers: Mutex<HashMap<SessionId, Vec<Arc<dyn Subscriber>>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber` to `session_id`'s list, creating it if absent.
    pub async fn attach(&self, session_id: SessionId, subscriber: Arc<dyn Subscriber>) {
        self.subscribers
            .lock()
            .await
            .entry(session_id)
            .or_default()
            .push(subscriber);
    }

    /// Removes `subscriber`; drops the list entry once it's empty.
    pub async fn detach(&self, session_id: &SessionId, subscriber: &Arc<dyn Subscriber>) {
        let mut map = self.subscribers.lock().await;
        if let Some(list) = map.get_mut(session_id) {
            list.retain(|s| !Arc::ptr_eq(s, subscriber));
            if list.is_empty() {
                map.remove(session_id);
            }
        }
    }

    /// Serializes `event` and writes it to every subscriber of `session_id`.
    /// Per-subscriber failures are logged, not propagated; a session with no
    /// subscribers is a logged no-op, not an error.
    pub async fn send(&self, session_id: &SessionId, event: Event) {
        let subs = {
            let map = self.subscribers.lock().await;
            map.get(session_id).cloned().unwrap_or_default()
        };

        if subs.is_empty() {
            tracing::debug!(%session_id, event = ?event, "no subscribers, dropping event");
            return;
        }

        for sub in &subs {
            if let Err(err) = sub.send(&event).await {
                tracing::warn!(%session_id, error = %err, "failed to deliver event to subscriber");
            }
        }
    }

    pub async fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.subscribers
            .lock()
            .await
            .get(session_id)
            .map_or(0, Vec::len)
    }
}

/// A `Notifier` bound to one session id, exposing the event-shaped helpers
/// of spec.md §4.1. Cheap to clone and hand to every component of a run.
#[derive(Clone)]
pub struct ScopedNotifier {
    notifier: Arc<Notifier>,
    session_id: SessionId,
}

impl ScopedNotifier {
    pub fn new(notifier: Arc<Notifier>, session_id: SessionId) -> Self {
        Self { notifier, session_id }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub async fn broadcast_raw(&self, event: Event) {
        self.notifier.send(&self.session_id, event).await;
    }

    pub async fn send_global_init(&self) {
        self.broadcast_raw(Event::GlobalInit).await;
    }

    pub async fn send_global_end(&self, status: GlobalStatus) {
        self.broadcast_raw(Event::GlobalEnd { status }).await;
    }

    pub async fn send_init(&self, module: ModuleId) {
        self.broadcast_raw(Event::Init { module }).await;
    }

    pub async fn send_log(&self, module: Option<ModuleId>, message: impl Into<String>) {
        self.broadcast_raw(Event::Log {
            module,
            message: message.into(),
        })
        .await;
    }

    pub async fn send_stream(&self, module: ModuleId, data: String, encoding: Option<StreamEncoding>) {
        self.broadcast_raw(Event::Stream { module, data, encoding }).await;
    }

    pub async fn send_end(&self, module: ModuleId, status: ModuleOutcome, summary: impl Into<String>) {
        self.broadcast_raw(Event::End {
            module,
            status,
            summary: summary.into(),
        })
        .await;
    }

    pub async fn send_metrics(&self, module: ModuleId, report: MetricsReport) {
        self.broadcast_raw(Event::Metrics { module, report }).await;
    }

    pub async fn send_error(&self, module: Option<ModuleId>, error: impl Into<String>) {
        self.broadcast_raw(Event::Error {
            module,
            error: error.into(),
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as SyncMutex;
    use qgate_core::ModuleId;

    struct RecordingSubscriber {
        events: Arc<SyncMutex<Vec<Event>>>,
    }

    #[async_trait]
    impl Subscriber for RecordingSubscriber {
        async fn send(&self, event: &Event) -> Result<(), String> {
            self.events.lock().push(event.clone());
            Ok(())
        }
    }

    struct FailingSubscriber;

    #[async_trait]
    impl Subscriber for FailingSubscriber {
        async fn send(&self, _event: &Event) -> Result<(), String> {
            Err("disconnected".to_string())
        }
    }

    #[tokio::test]
    async fn send_with_no_subscribers_is_a_no_op() {
        let notifier = Notifier::new();
        notifier.send(&SessionId::new("s1"), Event::GlobalInit).await;
    }

    #[tokio::test]
    async fn attach_then_send_delivers_event() {
        let notifier = Arc::new(Notifier::new());
        let events = Arc::new(SyncMutex::new(Vec::new()));
        let sub: Arc<dyn Subscriber> = Arc::new(RecordingSubscriber { events: events.clone() });
        notifier.attach(SessionId::new("s1"), sub).await;

        let scoped = ScopedNotifier::new(notifier, SessionId::new("s1"));
        scoped.send_global_init().await;

        assert_eq!(events.lock().as_slice(), &[Event::GlobalInit]);
    }

    #[tokio::test]
    async fn detach_removes_subscriber_and_empties_entry() {
        let notifier = Notifier::new();
        let sub: Arc<dyn Subscriber> = Arc::new(RecordingSubscriber {
            events: Arc::new(SyncMutex::new(Vec::new())),
        });
        let session = SessionId::new("s1");
        notifier.attach(session.clone(), sub.clone()).await;
        assert_eq!(notifier.subscriber_count(&session).await, 1);

        notifier.detach(&session, &sub).await;
        assert_eq!(notifier.subscriber_count(&session).await, 0);
    }

    #[tokio::test]
    async fn one_subscriber_failing_does_not_block_others() {
        let notifier = Arc::new(Notifier::new());
        let session = SessionId::new("s1");
        notifier.attach(session.clone(), Arc::new(FailingSubscriber)).await;
        let events = Arc::new(SyncMutex::new(Vec::new()));
        notifier
            .attach(
                session.clone(),
                Arc::new(RecordingSubscriber { events: events.clone() }),
            )
            .await;

        let scoped = ScopedNotifier::new(notifier, session);
        scoped.send_init(ModuleId::new("B_Ruff")).await;

        assert_eq!(events.lock().len(), 1);
    }
}
