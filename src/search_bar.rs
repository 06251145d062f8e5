//! Content-type filter model for the search modal.
//!
//! The search widget renders hits on its own; this module decides what a
//! rendering layer should show on top of it: the row of filter buttons,
//! which hits and result sections stay visible, the "See all N results"
//! footer, and the empty-state message.
//!
//! The active selection lives in [`SearchBarState`], owned by whoever
//! drives the modal.

use std::collections::BTreeSet;
use std::time::Duration;

use docsite_search::{Classified, ContentType, RuleSet, SearchHit, Selection, filter};
use serde::Serialize;
use tokio::time::{MissedTickBehavior, interval, sleep};

/// Label of the "no filter" button.
pub const ALL_CONTENT_LABEL: &str = "All content";
/// Icon of the "no filter" button.
pub const ALL_CONTENT_ICON: &str = "🔍";
/// Heading shown above the filter buttons.
pub const FILTER_TITLE: &str = "FILTER BY CONTENT TYPE:";
/// Hint shown in the empty state.
pub const EMPTY_STATE_HINT: &str = "Try searching for something else or use a different filter.";
/// Label of the empty-state action that clears the filter.
pub const SHOW_ALL_LABEL: &str = "Show all results";

/// One selector button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterButton {
    /// Selection applied when the button is clicked.
    pub selection: Selection,
    /// Human-readable label.
    pub label: &'static str,
    /// Icon shown before the label.
    pub icon: &'static str,
}

impl FilterButton {
    /// Text rendered on the button.
    pub fn text(&self) -> String {
        format!("{} {}", self.icon, self.label)
    }

    /// Selector value stored on the button (`""` for all content).
    pub fn value(&self) -> &str {
        self.selection.as_str()
    }
}

/// The filter buttons, "All content" first.
pub fn filter_buttons() -> Vec<FilterButton> {
    std::iter::once(FilterButton {
        selection: Selection::All,
        label: ALL_CONTENT_LABEL,
        icon: ALL_CONTENT_ICON,
    })
    .chain(ContentType::filterable().iter().map(|ct| FilterButton {
        selection: Selection::Only(*ct),
        label: ct.label(),
        icon: ct.icon(),
    }))
    .collect()
}

/// Display label for a selection: the button label when one exists,
/// otherwise the raw selector value.
pub fn selection_label(selection: &Selection) -> String {
    match selection {
        Selection::All => ALL_CONTENT_LABEL.to_string(),
        Selection::Only(ct) => ct.label().to_string(),
        Selection::Unrecognized(raw) => raw.clone(),
    }
}

/// Footer text for `count` visible results; `None` hides the footer.
pub fn count_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("See all 1 result".to_string()),
        n => Some(format!("See all {n} results")),
    }
}

/// Message shown when a filter leaves nothing visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Heading, e.g. "No Cloud Docs results found".
    pub heading: String,
    /// Secondary hint.
    pub hint: &'static str,
    /// Label of the action resetting the filter.
    pub action_label: &'static str,
    /// Selection the action applies.
    pub action: Selection,
}

impl EmptyState {
    fn for_selection(selection: &Selection) -> Self {
        Self {
            heading: format!("No {} results found", selection_label(selection)),
            hint: EMPTY_STATE_HINT,
            action_label: SHOW_ALL_LABEL,
            action: Selection::All,
        }
    }
}

/// What the modal should show for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    /// Selection this view was computed for.
    pub selection: Selection,
    /// Visible hits, in original order.
    pub visible: Vec<Classified<SearchHit>>,
    /// Number of stored hits before filtering.
    pub total: usize,
    /// Sections with at least one visible hit.
    pub visible_sections: BTreeSet<String>,
    /// "See all N results" footer; `None` hides it.
    pub count_label: Option<String>,
    /// Present only when a filter is active and nothing is visible.
    pub empty_state: Option<EmptyState>,
}

impl FilterView {
    /// Number of visible hits.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Whether a section should stay displayed.
    pub fn section_visible(&self, section: &str) -> bool {
        self.visible_sections.contains(section)
    }

    /// Whether a particular stored hit stays displayed.
    pub fn hit_visible(&self, url: &str) -> bool {
        self.visible.iter().any(|r| r.hit.url == url)
    }
}

/// Stored hits plus the active selection for one open search modal.
#[derive(Debug, Clone, Default)]
pub struct SearchBarState {
    rules: RuleSet,
    results: Vec<Classified<SearchHit>>,
    active: Selection,
}

impl SearchBarState {
    /// New state classifying with `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            results: Vec::new(),
            active: Selection::All,
        }
    }

    /// Classify and store the hits currently shown by the widget.
    ///
    /// An empty batch is ignored, so results stored earlier survive a
    /// momentary re-render with no hits.
    pub fn store_results(&mut self, hits: Vec<SearchHit>) {
        if hits.is_empty() {
            return;
        }
        self.results = self.rules.annotate(hits);
        tracing::debug!(count = self.results.len(), "stored results for filtering");
    }

    /// Stored hits with their content types.
    pub fn results(&self) -> &[Classified<SearchHit>] {
        &self.results
    }

    /// The active selection.
    pub fn active(&self) -> &Selection {
        &self.active
    }

    /// Change the active selection and return the resulting view.
    pub fn select(&mut self, selection: Selection) -> FilterView {
        tracing::debug!(selection = %selection, "filter selected");
        self.active = selection;
        self.view()
    }

    /// [`select`](Self::select) after waiting `delay`, so hits the widget
    /// renders right after a selector click are part of the view.
    pub async fn select_settled(&mut self, selection: Selection, delay: Duration) -> FilterView {
        sleep(delay).await;
        self.select(selection)
    }

    /// Recompute the view for the active selection.
    pub fn view(&self) -> FilterView {
        let visible = filter(&self.results, &self.active);
        let visible_sections = visible
            .iter()
            .filter_map(|r| r.hit.section.clone())
            .collect();
        let empty_state = (visible.is_empty() && !self.active.is_all())
            .then(|| EmptyState::for_selection(&self.active));

        tracing::debug!(
            selection = %self.active,
            visible = visible.len(),
            total = self.results.len(),
            "filter applied"
        );

        FilterView {
            selection: self.active.clone(),
            count_label: count_label(visible.len()),
            total: self.results.len(),
            visible,
            visible_sections,
            empty_state,
        }
    }

    /// Forget stored hits and clear the selection (the modal closed).
    pub fn reset(&mut self) {
        self.results.clear();
        self.active = Selection::All;
    }
}

/// Lifecycle signal derived from successive modal observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// The modal just opened: inject the filter buttons.
    Inject,
    /// The modal closed after buttons were injected: reset state.
    Reset,
    /// Nothing changed.
    Idle,
}

/// Tracks whether filter buttons are injected into the current modal.
#[derive(Debug, Clone, Default)]
pub struct ModalWatch {
    injected: bool,
}

impl ModalWatch {
    /// Record one observation of whether the modal is open.
    pub fn observe(&mut self, modal_open: bool) -> ModalEvent {
        match (modal_open, self.injected) {
            (true, false) => {
                self.injected = true;
                tracing::debug!("search modal opened");
                ModalEvent::Inject
            }
            (false, true) => {
                self.injected = false;
                tracing::debug!("search modal closed");
                ModalEvent::Reset
            }
            _ => ModalEvent::Idle,
        }
    }

    /// Whether buttons are currently injected.
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Check `modal_open` every `every` until an observation yields
    /// [`ModalEvent::Inject`] or [`ModalEvent::Reset`]. The first check is
    /// immediate.
    pub async fn next_event<F>(&mut self, mut modal_open: F, every: Duration) -> ModalEvent
    where
        F: FnMut() -> bool,
    {
        let mut ticks = interval(every.max(Duration::from_millis(1)));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            match self.observe(modal_open()) {
                ModalEvent::Idle => continue,
                event => return event,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, section: &str) -> SearchHit {
        SearchHit {
            url: url.into(),
            section: Some(section.into()),
            ..Default::default()
        }
    }

    fn state() -> SearchBarState {
        let mut state = SearchBarState::default();
        state.store_results(vec![
            hit("/docs/cms/pages", "Content"),
            hit("/docs/cloud/deploy", "Deployment"),
            hit("/docs/cms/users", "Users"),
            hit("/blog/post", "Blog"),
        ]);
        state
    }

    #[test]
    fn buttons_in_order_with_all_first() {
        let buttons = filter_buttons();
        assert_eq!(buttons.len(), 7);
        assert_eq!(buttons[0].value(), "");
        assert_eq!(buttons[0].text(), "🔍 All content");
        let values: Vec<&str> = buttons.iter().map(FilterButton::value).collect();
        assert_eq!(
            values,
            vec!["", "cms", "cloud", "features", "development", "api", "configuration"]
        );
        assert_eq!(buttons[2].text(), "☁️ Cloud Docs");
    }

    #[test]
    fn count_label_pluralises() {
        assert_eq!(count_label(0), None);
        assert_eq!(count_label(1).as_deref(), Some("See all 1 result"));
        assert_eq!(count_label(12).as_deref(), Some("See all 12 results"));
    }

    #[test]
    fn default_view_shows_everything() {
        let view = state().view();
        assert_eq!(view.visible_count(), 4);
        assert_eq!(view.total, 4);
        assert_eq!(view.visible_sections.len(), 4);
        assert_eq!(view.count_label.as_deref(), Some("See all 4 results"));
        assert!(view.empty_state.is_none());
    }

    #[test]
    fn selecting_a_type_hides_other_hits_and_sections() {
        let mut state = state();
        let view = state.select(Selection::Only(ContentType::Cms));
        assert_eq!(view.visible_count(), 2);
        assert!(view.hit_visible("/docs/cms/pages"));
        assert!(!view.hit_visible("/docs/cloud/deploy"));
        assert!(view.section_visible("Content"));
        assert!(view.section_visible("Users"));
        assert!(!view.section_visible("Deployment"));
        assert_eq!(view.count_label.as_deref(), Some("See all 2 results"));
    }

    #[test]
    fn empty_state_when_filter_matches_nothing() {
        let mut state = state();
        let view = state.select(Selection::Only(ContentType::Api));
        assert_eq!(view.visible_count(), 0);
        assert_eq!(view.count_label, None);
        let empty = view.empty_state.expect("empty state");
        assert_eq!(empty.heading, "No APIs results found");
        assert_eq!(empty.action, Selection::All);
        assert_eq!(empty.action_label, SHOW_ALL_LABEL);
    }

    #[test]
    fn empty_state_uses_raw_value_for_unknown_selector() {
        let mut state = state();
        let view = state.select(Selection::parse("tutorials"));
        let empty = view.empty_state.expect("empty state");
        assert_eq!(empty.heading, "No tutorials results found");
    }

    #[test]
    fn no_empty_state_without_filter() {
        let view = SearchBarState::default().view();
        assert_eq!(view.visible_count(), 0);
        assert!(view.empty_state.is_none());
        assert_eq!(view.count_label, None);
    }

    #[test]
    fn clearing_the_filter_restores_all_hits() {
        let mut state = state();
        state.select(Selection::Only(ContentType::Cloud));
        let view = state.select(Selection::All);
        assert_eq!(view.visible_count(), 4);
    }

    #[test]
    fn empty_batch_keeps_stored_results() {
        let mut state = state();
        state.store_results(Vec::new());
        assert_eq!(state.results().len(), 4);
    }

    #[test]
    fn new_batch_replaces_stored_results_and_keeps_selection() {
        let mut state = state();
        state.select(Selection::Only(ContentType::Cloud));
        state.store_results(vec![
            hit("/docs/cloud/a", "A"),
            hit("/docs/cloud/b", "B"),
        ]);
        let view = state.view();
        assert_eq!(view.total, 2);
        assert_eq!(view.visible_count(), 2);
    }

    #[test]
    fn reset_clears_results_and_selection() {
        let mut state = state();
        state.select(Selection::Only(ContentType::Cms));
        state.reset();
        assert!(state.results().is_empty());
        assert!(state.active().is_all());
    }

    #[test]
    fn hits_without_section_are_counted() {
        let mut state = SearchBarState::default();
        state.store_results(vec![SearchHit::from_url("/docs/api/a")]);
        let view = state.select(Selection::Only(ContentType::Api));
        assert_eq!(view.visible_count(), 1);
        assert!(view.visible_sections.is_empty());
    }

    #[test]
    fn custom_rules_drive_classification() {
        let rules = RuleSet::new(vec![docsite_search::ClassificationRule::new(
            ContentType::Api,
            ["/reference/"],
        )])
        .expect("valid");
        let mut state = SearchBarState::new(rules);
        state.store_results(vec![SearchHit::from_url("/reference/rest")]);
        assert_eq!(state.results()[0].content_type, ContentType::Api);
    }

    #[tokio::test(start_paused = true)]
    async fn select_settled_waits_configured_delay() {
        let config = crate::config::SearchBarConfig::default();
        let mut state = state();
        let start = tokio::time::Instant::now();
        let view = state
            .select_settled(Selection::Only(ContentType::Cloud), config.settle_delay())
            .await;
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_millis(200));
        assert_eq!(view.visible_count(), 1);
        assert_eq!(state.active(), &Selection::Only(ContentType::Cloud));
    }

    #[tokio::test(start_paused = true)]
    async fn modal_watch_polls_at_configured_cadence() {
        let config = crate::config::SearchBarConfig::default();
        let mut watch = ModalWatch::default();
        let mut checks = 0;
        let start = tokio::time::Instant::now();
        let event = watch
            .next_event(
                || {
                    checks += 1;
                    checks >= 3
                },
                config.poll_interval(),
            )
            .await;
        assert_eq!(event, ModalEvent::Inject);
        assert_eq!(checks, 3);
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert!(start.elapsed() < Duration::from_millis(600));

        let event = watch.next_event(|| false, config.poll_interval()).await;
        assert_eq!(event, ModalEvent::Reset);
        assert!(!watch.is_injected());
    }

    #[test]
    fn modal_watch_lifecycle() {
        let mut watch = ModalWatch::default();
        assert_eq!(watch.observe(false), ModalEvent::Idle);
        assert_eq!(watch.observe(true), ModalEvent::Inject);
        assert!(watch.is_injected());
        assert_eq!(watch.observe(true), ModalEvent::Idle);
        assert_eq!(watch.observe(false), ModalEvent::Reset);
        assert_eq!(watch.observe(false), ModalEvent::Idle);
        assert_eq!(watch.observe(true), ModalEvent::Inject);
    }
}
