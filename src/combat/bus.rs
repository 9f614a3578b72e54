//! Notification bus
//!
//! Synchronous publish-subscribe hub that decouples the regulators from
//! whatever presents their state (HUD bars, audio cues, tips).
//!
//! The bus handle is cheap to clone; every clone shares the same fan-out list.
//! Regulators receive a handle at construction instead of reaching for a
//! global instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The kinds of notification a subscriber can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    LoadChanged,
    OverloadStarted,
    OverloadEnded,
    ShieldActivated,
    ShieldChanged,
    ShieldDepleted,
    HealthChanged,
    Died,
}

impl NotificationKind {
    /// Every notification kind, in declaration order
    pub fn all() -> &'static [NotificationKind] {
        &[
            NotificationKind::LoadChanged,
            NotificationKind::OverloadStarted,
            NotificationKind::OverloadEnded,
            NotificationKind::ShieldActivated,
            NotificationKind::ShieldChanged,
            NotificationKind::ShieldDepleted,
            NotificationKind::HealthChanged,
            NotificationKind::Died,
        ]
    }
}

/// A regulator state transition, with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum CombatNotification {
    /// Heat load changed (current, max)
    LoadChanged { current: f32, max: f32 },
    /// Heat reached its maximum and the weapon locked out
    OverloadStarted,
    /// The overload lockout timer ran out
    OverloadEnded,
    /// A shield was (re)activated; carries the shield type's display name
    ShieldActivated { type_name: String },
    /// Shield strength changed (current, max)
    ShieldChanged { current: f32, max: f32 },
    /// Shield strength reached zero and the shield went inactive
    ShieldDepleted,
    /// Health changed; carries the new current health
    HealthChanged { current: f32 },
    /// Health reached zero. Published once per death.
    Died,
}

impl CombatNotification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            CombatNotification::LoadChanged { .. } => NotificationKind::LoadChanged,
            CombatNotification::OverloadStarted => NotificationKind::OverloadStarted,
            CombatNotification::OverloadEnded => NotificationKind::OverloadEnded,
            CombatNotification::ShieldActivated { .. } => NotificationKind::ShieldActivated,
            CombatNotification::ShieldChanged { .. } => NotificationKind::ShieldChanged,
            CombatNotification::ShieldDepleted => NotificationKind::ShieldDepleted,
            CombatNotification::HealthChanged { .. } => NotificationKind::HealthChanged,
            CombatNotification::Died => NotificationKind::Died,
        }
    }
}

/// Handle returned by [`NotificationBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = dyn Fn(&CombatNotification) + Send + Sync;

struct Subscription {
    id: SubscriptionId,
    kinds: Vec<NotificationKind>,
    handler: Arc<Handler>,
    /// Cleared on unsubscribe so an in-flight publish skips the handler
    live: Arc<AtomicBool>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Shared handle to a publish-subscribe fan-out list.
///
/// Handlers run on the publishing thread, in registration order, before
/// [`publish`](Self::publish) returns. The internal lock is released before any
/// handler runs, so handlers may subscribe or unsubscribe freely:
/// - a handler added during a publish is first invoked by the next publish
/// - a handler removed during a publish is skipped if its turn has not come yet
#[derive(Clone, Default)]
pub struct NotificationBus {
    inner: Arc<Mutex<BusInner>>,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        // A panicking handler never holds the lock, so the list itself is intact
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for each kind in `kinds`
    pub fn subscribe<F>(&self, kinds: &[NotificationKind], handler: F) -> SubscriptionId
    where
        F: Fn(&CombatNotification) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscriptions.push(Subscription {
            id,
            kinds: kinds.to_vec(),
            handler: Arc::new(handler),
            live: Arc::new(AtomicBool::new(true)),
        });
        id
    }

    /// Register `handler` for every notification kind
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&CombatNotification) + Send + Sync + 'static,
    {
        self.subscribe(NotificationKind::all(), handler)
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        match inner.subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                let removed = inner.subscriptions.remove(index);
                removed.live.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Deliver `notification` to every handler registered for its kind
    pub fn publish(&self, notification: CombatNotification) {
        let kind = notification.kind();

        // Snapshot the matching handlers, then run them unlocked
        let targets: Vec<(Arc<Handler>, Arc<AtomicBool>)> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|s| s.kinds.contains(&kind))
            .map(|s| (Arc::clone(&s.handler), Arc::clone(&s.live)))
            .collect();

        for (handler, live) in targets {
            if live.load(Ordering::Acquire) {
                handler(&notification);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.lock().subscriptions.iter().any(|s| s.id == id)
    }
}

/// Collects published notifications into a shared buffer.
///
/// Used to marshal bus traffic to consumers that cannot run inside a handler,
/// such as ECS systems that drain the buffer once per frame.
#[derive(Clone, Default)]
pub struct NotificationQueue {
    buffer: Arc<Mutex<Vec<CombatNotification>>>,
}

impl NotificationQueue {
    /// Create a queue fed by every notification published on `bus`
    pub fn attach(bus: &NotificationBus) -> (Self, SubscriptionId) {
        let queue = Self::default();
        let sink = queue.clone();
        let id = bus.subscribe_all(move |notification| sink.push(notification.clone()));
        (queue, id)
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<CombatNotification>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, notification: CombatNotification) {
        self.buffer().push(notification);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<CombatNotification> {
        std::mem::take(&mut *self.buffer())
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }
}
