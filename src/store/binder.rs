use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::mpsc;

use crate::models::Internship;

use super::View;

pub type SubscriptionId = u64;

/// Load state of the list behind a view
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is outstanding; render a placeholder
    Loading,
    Ready,
    /// The last fetch failed; the previous list is still shown with a retry notice
    Failed { notice: String },
}

/// A record as displayed, with its bookmark state
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedItem {
    #[serde(flatten)]
    pub internship: Internship,
    pub is_saved: bool,
}

impl RenderedItem {
    pub fn id(&self) -> &str {
        &self.internship.id
    }
}

/// Everything a view needs to draw itself
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ViewSnapshot {
    pub status: ViewStatus,
    pub items: Vec<RenderedItem>,
}

/// Keyed difference between two renderings of the same view
///
/// Items present on both sides with identical content are left out, so a
/// front-end only redraws what is listed here.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListPatch {
    pub inserted: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    /// Surviving items changed relative order
    pub reordered: bool,
    /// Final id order
    pub order: Vec<String>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.updated.is_empty() && !self.reordered
    }
}

/// Pushed to a subscriber whenever its view changes
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewUpdate {
    pub view: View,
    pub snapshot: ViewSnapshot,
    pub patch: ListPatch,
}

/// Reconciles two renderings by id
pub fn reconcile(previous: &[RenderedItem], next: &[RenderedItem]) -> ListPatch {
    let before: HashMap<&str, &RenderedItem> = previous.iter().map(|i| (i.id(), i)).collect();
    let after: HashSet<&str> = next.iter().map(RenderedItem::id).collect();

    let mut patch = ListPatch::default();

    for item in next {
        match before.get(item.id()) {
            None => patch.inserted.push(item.id().to_string()),
            Some(old) if *old != item => patch.updated.push(item.id().to_string()),
            Some(_) => {}
        }
    }

    patch.removed = previous
        .iter()
        .map(RenderedItem::id)
        .filter(|id| !after.contains(id))
        .map(str::to_string)
        .collect();

    let kept_before = previous.iter().map(RenderedItem::id).filter(|id| after.contains(id));
    let kept_after = next.iter().map(RenderedItem::id).filter(|id| before.contains_key(id));
    patch.reordered = !kept_before.eq(kept_after);

    patch.order = next.iter().map(|i| i.id().to_string()).collect();
    patch
}

struct Subscription {
    view: View,
    tx: mpsc::UnboundedSender<ViewUpdate>,
    rendered: ViewSnapshot,
}

/// Keeps subscribed views in step with the store
///
/// The store calls [`ViewBinder::publish`] after every mutation; each live
/// subscription receives an update only when its own rendering changed.
/// Subscriptions whose receiver was dropped are pruned as they are found.
#[derive(Default)]
pub struct ViewBinder {
    next_id: SubscriptionId,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

impl ViewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and immediately sends it the current rendering
    pub fn subscribe(
        &mut self,
        view: View,
        snapshot: ViewSnapshot,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id;
        self.next_id += 1;

        let initial = ViewUpdate {
            view,
            patch: reconcile(&[], &snapshot.items),
            snapshot: snapshot.clone(),
        };
        // The receiver is still in hand, so this cannot fail
        let _ = tx.send(initial);

        self.subscriptions.insert(
            id,
            Subscription {
                view,
                tx,
                rendered: snapshot,
            },
        );

        tracing::debug!(subscription = id, view = ?view, "View subscribed");
        (id, rx)
    }

    /// Drops a subscription, returning the view it watched
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<View> {
        let removed = self.subscriptions.remove(&id).map(|s| s.view);
        if removed.is_some() {
            tracing::debug!(subscription = id, "View unsubscribed");
        }
        removed
    }

    /// Whether any live subscriber still watches `view`
    pub fn has_subscribers(&self, view: View) -> bool {
        self.subscriptions
            .values()
            .any(|s| s.view == view && !s.tx.is_closed())
    }

    /// Recomputes every subscribed view and sends the ones that changed
    ///
    /// `render` is called at most once per view. Returns the number of
    /// updates delivered.
    pub fn publish(&mut self, mut render: impl FnMut(View) -> ViewSnapshot) -> usize {
        let mut rendered: HashMap<View, ViewSnapshot> = HashMap::new();
        let mut closed = Vec::new();
        let mut delivered = 0;

        for (id, subscription) in self.subscriptions.iter_mut() {
            let snapshot = rendered
                .entry(subscription.view)
                .or_insert_with(|| render(subscription.view));

            let patch = reconcile(&subscription.rendered.items, &snapshot.items);
            if patch.is_empty() && subscription.rendered.status == snapshot.status {
                continue;
            }

            let update = ViewUpdate {
                view: subscription.view,
                snapshot: snapshot.clone(),
                patch,
            };

            if subscription.tx.send(update).is_err() {
                closed.push(*id);
                continue;
            }

            subscription.rendered = snapshot.clone();
            delivered += 1;
        }

        for id in closed {
            self.subscriptions.remove(&id);
            tracing::debug!(subscription = id, "Pruned closed view subscription");
        }

        delivered
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::internship;

    fn item(id: &str, is_saved: bool) -> RenderedItem {
        RenderedItem {
            internship: internship(id),
            is_saved,
        }
    }

    fn ready(items: Vec<RenderedItem>) -> ViewSnapshot {
        ViewSnapshot {
            status: ViewStatus::Ready,
            items,
        }
    }

    #[test]
    fn test_reconcile_identical_lists_is_empty() {
        let list = vec![item("1", false), item("2", true)];
        let patch = reconcile(&list, &list);
        assert!(patch.is_empty());
        assert_eq!(patch.order, vec!["1", "2"]);
    }

    #[test]
    fn test_reconcile_tracks_inserts_removals_and_updates() {
        let before = vec![item("1", false), item("2", false), item("3", false)];
        let after = vec![item("2", true), item("3", false), item("4", false)];

        let patch = reconcile(&before, &after);

        assert_eq!(patch.inserted, vec!["4"]);
        assert_eq!(patch.removed, vec!["1"]);
        assert_eq!(patch.updated, vec!["2"]);
        assert!(!patch.reordered);
        assert_eq!(patch.order, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_reconcile_detects_reordering() {
        let before = vec![item("1", false), item("2", false)];
        let after = vec![item("2", false), item("1", false)];

        let patch = reconcile(&before, &after);

        assert!(patch.inserted.is_empty());
        assert!(patch.updated.is_empty());
        assert!(patch.reordered);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_subscribe_sends_initial_rendering() {
        let mut binder = ViewBinder::new();
        let (_, mut rx) = binder.subscribe(View::Search, ready(vec![item("1", false)]));

        let update = rx.try_recv().unwrap();
        assert_eq!(update.view, View::Search);
        assert_eq!(update.patch.inserted, vec!["1"]);
    }

    #[test]
    fn test_publish_skips_unchanged_views() {
        let mut binder = ViewBinder::new();
        let (_, mut search_rx) = binder.subscribe(View::Search, ready(vec![item("1", false)]));
        let (_, mut saved_rx) = binder.subscribe(View::Saved, ready(vec![]));
        search_rx.try_recv().unwrap();
        saved_rx.try_recv().unwrap();

        let delivered = binder.publish(|view| match view {
            View::Saved => ready(vec![item("1", true)]),
            _ => ready(vec![item("1", false)]),
        });

        assert_eq!(delivered, 1);
        assert!(search_rx.try_recv().is_err());
        assert_eq!(saved_rx.try_recv().unwrap().patch.inserted, vec!["1"]);
    }

    #[test]
    fn test_publish_sends_status_only_changes() {
        let mut binder = ViewBinder::new();
        let (_, mut rx) = binder.subscribe(View::Dashboard, ViewSnapshot::default());
        rx.try_recv().unwrap();

        binder.publish(|_| ViewSnapshot {
            status: ViewStatus::Loading,
            items: vec![],
        });

        let update = rx.try_recv().unwrap();
        assert_eq!(update.snapshot.status, ViewStatus::Loading);
        assert!(update.patch.is_empty());
    }

    #[test]
    fn test_publish_renders_each_view_once() {
        let mut binder = ViewBinder::new();
        let (_, _rx1) = binder.subscribe(View::Search, ViewSnapshot::default());
        let (_, _rx2) = binder.subscribe(View::Search, ViewSnapshot::default());

        let mut calls = 0;
        binder.publish(|_| {
            calls += 1;
            ready(vec![])
        });

        assert_eq!(calls, 1);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut binder = ViewBinder::new();
        let (_, rx) = binder.subscribe(View::Search, ViewSnapshot::default());
        drop(rx);

        assert!(!binder.has_subscribers(View::Search));
        binder.publish(|_| ready(vec![item("1", false)]));
        assert!(binder.is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut binder = ViewBinder::new();
        let (id, _rx) = binder.subscribe(View::Saved, ViewSnapshot::default());

        assert_eq!(binder.unsubscribe(id), Some(View::Saved));
        assert_eq!(binder.unsubscribe(id), None);
        assert!(!binder.has_subscribers(View::Saved));
    }
}
