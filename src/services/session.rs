//! Presentation-owned catalog state
//!
//! `CatalogSession` holds the single unfiltered catalog slot and the current
//! filter criteria. Handlers subscribe to view changes; every criteria change
//! or catalog replacement re-derives the view with the pure catalog functions
//! and hands it to each handler for rendering.

use crate::services::catalog::{apply_filter_and_sort, available_languages, select_featured};
use crate::types::{FilterCriteria, RepositoryRecord, SortMode};

/// Callback receiving the freshly derived view
pub type ViewHandler = Box<dyn FnMut(&[RepositoryRecord]) + Send>;

/// Handle returned by [`CatalogSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

pub struct CatalogSession {
    all: Vec<RepositoryRecord>,
    criteria: FilterCriteria,
    handlers: Vec<(SubscriptionId, ViewHandler)>,
    next_subscription: usize,
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CatalogSession {
    /// Creates a session over a fetched catalog with default criteria
    pub fn new(all: Vec<RepositoryRecord>) -> Self {
        Self {
            all,
            criteria: FilterCriteria::default(),
            handlers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The unfiltered catalog
    pub fn catalog(&self) -> &[RepositoryRecord] {
        &self.all
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Registers a handler called with the filtered, sorted view on every change
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&[RepositoryRecord]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Overwrites the catalog wholesale and re-notifies handlers
    pub fn replace_catalog(&mut self, all: Vec<RepositoryRecord>) {
        tracing::debug!(
            "Replacing catalog of {} repositories with {}",
            self.all.len(),
            all.len()
        );
        self.all = all;
        self.notify();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.notify();
    }

    pub fn set_search_text<T: Into<String>>(&mut self, search_text: T) {
        self.criteria.search_text = search_text.into();
        self.notify();
    }

    /// Sets the language constraint; `None` removes it
    pub fn set_language_filter(&mut self, language: Option<String>) {
        self.criteria.language_filter = language;
        self.notify();
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        self.criteria.sort_mode = sort_mode;
        self.notify();
    }

    /// The filtered, sorted records under the current criteria
    pub fn view(&self) -> Vec<RepositoryRecord> {
        apply_filter_and_sort(&self.all, &self.criteria)
    }

    pub fn featured(&self, explicit_names: Option<&[String]>) -> Vec<RepositoryRecord> {
        select_featured(&self.all, explicit_names)
    }

    pub fn languages(&self) -> Vec<String> {
        available_languages(&self.all)
    }

    /// Re-derives the view, then calls every handler with it
    pub fn notify(&mut self) {
        let view = self.view();
        tracing::debug!(
            "Notifying {} handlers with {} repositories",
            self.handlers.len(),
            view.len()
        );
        for (_, handler) in self.handlers.iter_mut() {
            handler(view.as_slice());
        }
    }
}
