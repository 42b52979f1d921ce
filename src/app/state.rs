use crate::filter::{apply_filters, FilterCriteria};
use crate::offers::{find_offer, Offer};

/// Lifecycle of the one-shot outbound fetch. Leaves `Loading` exactly once;
/// later load actions are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Cards,
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadSucceeded(Vec<Offer>),
    LoadFailed(String),
    SetOnRoadOnly(bool),
    SetHeavyWasteOnly(bool),
    SetForbiddenOnly(bool),
    SetMaxPrice(Option<u32>),
    SetMinSize(Option<u32>),
    SetMaxSize(Option<u32>),
    SetHirePeriod(Option<u32>),
    SetPostcodeFragment(String),
    Select(u32),
    ToggleView,
}

/// The whole page state: load lifecycle, raw offer list, criteria, selection,
/// and view mode. `apply` is the single reducer; the visible subset is derived
/// through `visible_offers` whenever the presentation needs it, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub load: LoadState,
    pub offers: Vec<Offer>,
    pub criteria: FilterCriteria,
    pub selected: Option<u32>,
    pub view: ViewMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            offers: Vec::new(),
            criteria: FilterCriteria::default(),
            selected: None,
            view: ViewMode::Cards,
        }
    }
}

impl AppState {
    pub fn apply(mut self, action: Action) -> AppState {
        match action {
            Action::LoadSucceeded(offers) => {
                if self.load == LoadState::Loading {
                    self.offers = offers;
                    self.load = LoadState::Loaded;
                }
            }
            Action::LoadFailed(message) => {
                if self.load == LoadState::Loading {
                    self.load = LoadState::Failed(message);
                }
            }
            Action::SetOnRoadOnly(value) => self.criteria.on_road_only = value,
            Action::SetHeavyWasteOnly(value) => self.criteria.heavy_waste_only = value,
            Action::SetForbiddenOnly(value) => self.criteria.forbidden_only = value,
            Action::SetMaxPrice(value) => self.criteria.max_price = value,
            Action::SetMinSize(value) => self.criteria.min_size = value,
            Action::SetMaxSize(value) => self.criteria.max_size = value,
            Action::SetHirePeriod(value) => self.criteria.hire_period = value,
            Action::SetPostcodeFragment(value) => self.criteria.postcode_fragment = value,
            Action::Select(id) => self.selected = Some(id),
            Action::ToggleView => self.view = self.view.toggled(),
        }
        self
    }

    pub fn visible_offers(&self) -> Vec<&Offer> {
        apply_filters(&self.offers, &self.criteria)
    }

    pub fn selected_offer(&self) -> Option<&Offer> {
        self.selected.and_then(|id| find_offer(&self.offers, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: u32, size: u32, on_road: bool) -> Offer {
        Offer {
            id,
            size,
            hire_period_days: 14,
            price_before_vat: 250.0,
            vat: 20.0,
            allowed_on_road: on_road,
            allows_heavy_waste: false,
            forbidden: false,
            postcode: None,
        }
    }

    #[test]
    fn starts_loading_with_defaults() {
        let state = AppState::default();
        assert_eq!(state.load, LoadState::Loading);
        assert!(state.offers.is_empty());
        assert!(state.criteria.is_default());
        assert_eq!(state.selected, None);
        assert_eq!(state.view, ViewMode::Cards);
    }

    #[test]
    fn successful_load_transitions_once() {
        let state = AppState::default()
            .apply(Action::LoadSucceeded(vec![offer(1, 4, true)]))
            .apply(Action::LoadSucceeded(vec![offer(2, 8, false)]));

        assert_eq!(state.load, LoadState::Loaded);
        assert_eq!(state.offers.len(), 1, "second delivery must be ignored");
        assert_eq!(state.offers[0].id, 1);
    }

    #[test]
    fn failed_load_is_terminal() {
        let state = AppState::default()
            .apply(Action::LoadFailed("Failed to load skips.".to_string()))
            .apply(Action::LoadSucceeded(vec![offer(1, 4, true)]));

        assert_eq!(
            state.load,
            LoadState::Failed("Failed to load skips.".to_string())
        );
        assert!(state.offers.is_empty());
        assert!(state.criteria.is_default());
        assert_eq!(state.selected, None);
    }

    #[test]
    fn empty_payload_still_counts_as_loaded() {
        let state = AppState::default().apply(Action::LoadSucceeded(Vec::new()));
        assert_eq!(state.load, LoadState::Loaded);
        assert!(state.visible_offers().is_empty());
    }

    #[test]
    fn selection_is_last_write_wins() {
        let state = AppState::default()
            .apply(Action::LoadSucceeded(vec![offer(1, 4, true), offer(2, 8, false)]))
            .apply(Action::Select(1))
            .apply(Action::Select(2));
        assert_eq!(state.selected, Some(2));

        let again = state.clone().apply(Action::Select(2));
        assert_eq!(again, state, "re-selecting the same id changes nothing");
    }

    #[test]
    fn selection_survives_criteria_changes() {
        let state = AppState::default()
            .apply(Action::LoadSucceeded(vec![offer(1, 4, true), offer(2, 8, false)]))
            .apply(Action::Select(2))
            .apply(Action::SetOnRoadOnly(true));

        // Id 2 is filtered out of view but stays selected.
        let visible: Vec<u32> = state.visible_offers().iter().map(|o| o.id).collect();
        assert_eq!(visible, vec![1]);
        assert_eq!(state.selected, Some(2));
        assert_eq!(state.selected_offer().map(|o| o.size), Some(8));
    }

    #[test]
    fn criteria_actions_update_the_matching_field() {
        let state = AppState::default()
            .apply(Action::SetMaxPrice(Some(300)))
            .apply(Action::SetMinSize(Some(4)))
            .apply(Action::SetMaxSize(Some(12)))
            .apply(Action::SetHirePeriod(Some(14)))
            .apply(Action::SetPostcodeFragment("NR32".to_string()))
            .apply(Action::SetHeavyWasteOnly(true))
            .apply(Action::SetForbiddenOnly(true));

        assert_eq!(state.criteria.max_price, Some(300));
        assert_eq!(state.criteria.min_size, Some(4));
        assert_eq!(state.criteria.max_size, Some(12));
        assert_eq!(state.criteria.hire_period, Some(14));
        assert_eq!(state.criteria.postcode_fragment, "NR32");
        assert!(state.criteria.heavy_waste_only);
        assert!(state.criteria.forbidden_only);

        let cleared = state.apply(Action::SetMaxPrice(None));
        assert_eq!(cleared.criteria.max_price, None);
    }

    #[test]
    fn view_toggle_round_trips() {
        let state = AppState::default().apply(Action::ToggleView);
        assert_eq!(state.view, ViewMode::Table);
        let state = state.apply(Action::ToggleView);
        assert_eq!(state.view, ViewMode::Cards);
    }
}
