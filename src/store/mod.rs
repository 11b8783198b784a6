//! Explicit application state.
//!
//! [`AppStore`] owns the session, the single saved set, the current
//! recommendation catalog, the live filter criteria and the view
//! subscriptions. All changes go through its methods, and every change is
//! published to subscribed views before the method returns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        FilterCriteria, Internship, RawInternship, RecommendationRequest, SortKey, TypeFilter,
        UserProfile, UserSession,
    },
    services::{map, normalizer, pipeline, stats},
};

pub mod binder;
pub mod catalog;
pub mod saved;

pub use binder::{
    ListPatch, RenderedItem, SubscriptionId, ViewBinder, ViewSnapshot, ViewStatus, ViewUpdate,
};
pub use catalog::Catalog;
pub use saved::SavedSet;

/// Screens that render internship lists
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Search,
    Saved,
    Profile,
}

/// Every user-driven mutation the store accepts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    Save(String),
    Unsave(String),
    ToggleSaved(String),
    SetQuery(String),
    SetCriteria(FilterCriteria),
    ToggleLocation { location: String, selected: bool },
    ToggleSector { sector: String, selected: bool },
    SetType(TypeFilter),
    SetSort(SortKey),
    ClearFilters,
    /// Free-text location filter of the dashboard, matched case-insensitively
    SetDashboardLocation(String),
    Navigate(View),
}

/// Identifies one outstanding fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    view: View,
    generation: u64,
}

impl FetchTicket {
    pub fn view(&self) -> View {
        self.view
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The catalog was replaced with this many records
    Applied { records: usize },
    /// The fetch failed; the previous catalog stays visible with a notice
    Failed { notice: String },
    /// The view that asked for it is gone, or a newer fetch superseded it
    Discarded,
}

#[derive(Default)]
pub struct AppStore {
    session: Option<UserSession>,
    saved: SavedSet,
    catalog: Catalog,
    criteria: FilterCriteria,
    dashboard_location: String,
    current_view: View,
    /// Last fetch state per view; views without an entry derive it from the catalog
    status: HashMap<View, ViewStatus>,
    generation: u64,
    pending: Option<FetchTicket>,
    binder: ViewBinder,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Starts a session with an empty saved set and no loaded catalog
    pub fn login(&mut self, session: UserSession) {
        tracing::info!(user_id = %session.id, "Session started");
        self.reset();
        self.session = Some(session);
        self.publish();
    }

    /// Ends the session: saved ids, catalog and filters are forgotten
    pub fn logout(&mut self) -> Option<UserSession> {
        let session = self.session.take();
        if let Some(ended) = &session {
            tracing::info!(user_id = %ended.id, "Session ended");
        }
        self.reset();
        self.publish();
        session
    }

    fn reset(&mut self) {
        self.saved.clear();
        self.catalog.clear();
        self.criteria = FilterCriteria::default();
        self.dashboard_location.clear();
        self.current_view = View::default();
        self.cancel_pending();
        self.status.clear();
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    fn session_mut(&mut self) -> AppResult<&mut UserSession> {
        self.session.as_mut().ok_or(AppError::Unauthorized)
    }

    pub fn complete_onboarding(&mut self, profile: UserProfile) -> AppResult<&UserSession> {
        let session = self.session_mut()?;
        session.complete_onboarding(profile);
        Ok(&*session)
    }

    pub fn set_resume(&mut self, file_path: Option<String>) -> AppResult<&UserSession> {
        let session = self.session_mut()?;
        session.resume = file_path;
        Ok(&*session)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn dispatch(&mut self, action: Action) -> bool {
        self.dispatch_all([action])
    }

    /// Applies the actions of one user gesture in order, then publishes once
    ///
    /// Subscribers never observe a state where only part of the batch applied.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> bool {
        let mut changed = false;
        for action in actions {
            changed |= self.apply(action);
        }
        if changed {
            self.publish();
        }
        changed
    }

    fn apply(&mut self, action: Action) -> bool {
        tracing::debug!(?action, "Applying action");

        match action {
            Action::Save(id) => self.saved.save(&id),
            Action::Unsave(id) => self.saved.unsave(&id),
            Action::ToggleSaved(id) => {
                self.saved.toggle(&id);
                true
            }
            Action::SetQuery(query) => self.update_criteria(|c| c.query = query),
            Action::SetCriteria(criteria) => self.update_criteria(|c| *c = criteria),
            Action::ToggleLocation { location, selected } => {
                self.update_criteria(|c| c.toggle_location(&location, selected))
            }
            Action::ToggleSector { sector, selected } => {
                self.update_criteria(|c| c.toggle_sector(&sector, selected))
            }
            Action::SetType(internship_type) => {
                self.update_criteria(|c| c.internship_type = internship_type)
            }
            Action::SetSort(sort) => self.update_criteria(|c| c.sort = sort),
            Action::ClearFilters => self.update_criteria(FilterCriteria::clear_filters),
            Action::SetDashboardLocation(location) => {
                let changed = self.dashboard_location != location;
                self.dashboard_location = location;
                changed
            }
            Action::Navigate(view) => self.navigate(view),
        }
    }

    fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) -> bool {
        let before = self.criteria.clone();
        edit(&mut self.criteria);
        self.criteria != before
    }

    /// Moving away from a view abandons the fetch it started
    fn navigate(&mut self, view: View) -> bool {
        if self.current_view == view {
            return false;
        }

        if self.pending.is_some_and(|ticket| ticket.view != view) {
            tracing::debug!(from = ?self.current_view, to = ?view, "Navigation cancels pending fetch");
            self.cancel_pending();
        }

        self.current_view = view;
        true
    }

    fn cancel_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.generation += 1;
            if self.status.get(&ticket.view) == Some(&ViewStatus::Loading) {
                self.status.remove(&ticket.view);
            }
        }
    }

    // ------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------

    /// Marks `view` as loading and returns the query to send
    ///
    /// The caller performs the network round trip without holding the store
    /// and hands the result to [`AppStore::complete_fetch`] with the ticket.
    pub fn begin_fetch(&mut self, view: View) -> AppResult<(FetchTicket, RecommendationRequest)> {
        let profile = &self.session.as_ref().ok_or(AppError::Unauthorized)?.profile;
        let request = match view {
            View::Dashboard => RecommendationRequest::for_dashboard(profile),
            _ => RecommendationRequest::for_search(profile),
        };

        self.generation += 1;
        let ticket = FetchTicket {
            view,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        self.current_view = view;
        self.status.insert(view, ViewStatus::Loading);
        self.publish();

        tracing::debug!(view = ?view, generation = ticket.generation, "Fetch started");
        Ok((ticket, request))
    }

    /// Applies a fetch result unless the ticket went stale in the meantime
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: AppResult<Vec<RawInternship>>,
    ) -> FetchOutcome {
        if self.pending != Some(ticket) {
            tracing::debug!(
                view = ?ticket.view,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Discarded;
        }
        self.pending = None;

        let outcome = match result {
            Ok(raw) => {
                self.catalog.replace(normalizer::normalize_all(raw));
                // Every view now reads the fresh catalog, so older failures are stale
                self.status.retain(|_, status| *status == ViewStatus::Loading);
                self.status.insert(ticket.view, ViewStatus::Ready);
                FetchOutcome::Applied {
                    records: self.catalog.records().len(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, view = ?ticket.view, "Fetch failed, keeping previous list");
                let notice = e.notice();
                self.status.insert(
                    ticket.view,
                    ViewStatus::Failed {
                        notice: notice.clone(),
                    },
                );
                FetchOutcome::Failed { notice }
            }
        };

        self.publish();
        outcome
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe(
        &mut self,
        view: View,
    ) -> (SubscriptionId, tokio::sync::mpsc::UnboundedReceiver<ViewUpdate>) {
        let snapshot = self.snapshot(view);
        self.binder.subscribe(view, snapshot)
    }

    /// Unmounts a subscriber; a fetch only its view was waiting for is abandoned
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        let Some(view) = self.binder.unsubscribe(id) else {
            return;
        };

        let orphaned = self
            .pending
            .is_some_and(|ticket| ticket.view == view && !self.binder.has_subscribers(view));
        if orphaned {
            tracing::debug!(view = ?view, "Last subscriber left, cancelling pending fetch");
            self.cancel_pending();
            self.publish();
        }
    }

    fn publish(&mut self) {
        if self.binder.is_empty() {
            return;
        }
        // Rendering borrows the store immutably while the binder is mutated
        let mut binder = std::mem::take(&mut self.binder);
        let delivered = binder.publish(|view| self.snapshot(view));
        self.binder = binder;

        tracing::trace!(delivered, "Views published");
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Records shown by `view`, before bookmark decoration
    ///
    /// The dashboard shows the catalog in ranking order narrowed by its
    /// location text and the type filter, search runs the full pipeline, and
    /// the saved view lists the loaded records whose id is saved.
    pub fn records(&self, view: View) -> Vec<Internship> {
        let records = self.catalog.records();
        match view {
            View::Dashboard => {
                let location = self.dashboard_location.trim().to_lowercase();
                records
                    .iter()
                    .filter(|r| location.is_empty() || r.location.to_lowercase().contains(&location))
                    .filter(|r| self.criteria.internship_type.matches(r.internship_type))
                    .cloned()
                    .collect()
            }
            View::Search => pipeline::apply(records, &self.criteria),
            View::Saved => records
                .iter()
                .filter(|r| self.saved.is_saved(&r.id))
                .cloned()
                .collect(),
            View::Profile => Vec::new(),
        }
    }

    pub fn snapshot(&self, view: View) -> ViewSnapshot {
        let items = self
            .records(view)
            .into_iter()
            .map(|internship| RenderedItem {
                is_saved: self.saved.is_saved(&internship.id),
                internship,
            })
            .collect();

        ViewSnapshot {
            status: self.status(view),
            items,
        }
    }

    pub fn stats(&self) -> stats::DashboardStats {
        stats::dashboard_stats(self.catalog.records())
    }

    pub fn facets(&self) -> stats::Facets {
        stats::facets(self.catalog.records())
    }

    pub fn heat_points(&self, view: View) -> Vec<map::HeatPoint> {
        map::heat_points(&self.records(view))
    }

    /// Pushes the heat map for `view` to the host map widget
    pub fn render_map(&self, view: View, renderer: &mut dyn map::MapRenderer) {
        renderer.set_heat_points(&self.heat_points(view));
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.is_saved(id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn dashboard_location(&self) -> &str {
        &self.dashboard_location
    }

    pub fn status(&self, view: View) -> ViewStatus {
        match (view, self.status.get(&view)) {
            (View::Profile, _) => ViewStatus::Ready,
            (_, Some(status)) => status.clone(),
            (_, None) if self.catalog.is_loaded() => ViewStatus::Ready,
            (_, None) => ViewStatus::Idle,
        }
    }
}
