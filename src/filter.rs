use crate::offers::Offer;

/// User-specified filter constraints. Every active predicate must hold for an
/// offer to stay visible; the default criteria keep the whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub on_road_only: bool,
    pub heavy_waste_only: bool,
    pub forbidden_only: bool,
    pub max_price: Option<u32>,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    pub hire_period: Option<u32>,
    pub postcode_fragment: String,
}

impl FilterCriteria {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, offer: &Offer) -> bool {
        if self.on_road_only && !offer.allowed_on_road {
            return false;
        }
        if self.heavy_waste_only && !offer.allows_heavy_waste {
            return false;
        }
        if self.forbidden_only && !offer.forbidden {
            return false;
        }
        if let Some(max_price) = self.max_price {
            if offer.price_before_vat > f64::from(max_price) {
                return false;
            }
        }
        if let Some(min_size) = self.min_size {
            if offer.size < min_size {
                return false;
            }
        }
        if let Some(max_size) = self.max_size {
            if offer.size > max_size {
                return false;
            }
        }
        if let Some(period) = self.hire_period {
            // Exact match on the hire period, not an upper bound.
            if offer.hire_period_days != period {
                return false;
            }
        }
        if !self.postcode_fragment.is_empty() {
            let fragment = self.postcode_fragment.to_lowercase();
            match &offer.postcode {
                Some(postcode) => {
                    if !postcode.to_lowercase().contains(&fragment) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}

/// Stable AND-filter over the loaded list. Pure; callers re-invoke it whenever
/// the list or the criteria change rather than caching the result.
pub fn apply_filters<'a>(offers: &'a [Offer], criteria: &FilterCriteria) -> Vec<&'a Offer> {
    offers
        .iter()
        .filter(|offer| criteria.matches(offer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: u32, size: u32, days: u32, price: f64, on_road: bool, heavy: bool) -> Offer {
        Offer {
            id,
            size,
            hire_period_days: days,
            price_before_vat: price,
            vat: 20.0,
            allowed_on_road: on_road,
            allows_heavy_waste: heavy,
            forbidden: false,
            postcode: None,
        }
    }

    fn sample() -> Vec<Offer> {
        vec![
            offer(1, 4, 7, 200.0, true, false),
            offer(2, 12, 14, 400.0, false, true),
        ]
    }

    fn ids(filtered: &[&Offer]) -> Vec<u32> {
        filtered.iter().map(|o| o.id).collect()
    }

    #[test]
    fn default_criteria_keep_everything() {
        let offers = sample();
        let filtered = apply_filters(&offers, &FilterCriteria::default());
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn on_road_only_keeps_road_legal_offers() {
        let offers = sample();
        let criteria = FilterCriteria {
            on_road_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![1]);
    }

    #[test]
    fn max_price_is_inclusive() {
        let offers = sample();
        let criteria = FilterCriteria {
            max_price: Some(300),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![1]);

        let at_limit = FilterCriteria {
            max_price: Some(200),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &at_limit)), vec![1]);
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let offers = sample();
        let criteria = FilterCriteria {
            min_size: Some(10),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![2]);

        let criteria = FilterCriteria {
            max_size: Some(4),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![1]);
    }

    #[test]
    fn hire_period_is_an_exact_match() {
        let offers = sample();
        let criteria = FilterCriteria {
            hire_period: Some(7),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![1]);

        let between = FilterCriteria {
            hire_period: Some(10),
            ..Default::default()
        };
        assert!(apply_filters(&offers, &between).is_empty());
    }

    #[test]
    fn combined_booleans_can_empty_the_result() {
        let offers = sample();
        let criteria = FilterCriteria {
            on_road_only: true,
            heavy_waste_only: true,
            ..Default::default()
        };
        assert!(apply_filters(&offers, &criteria).is_empty());
    }

    #[test]
    fn forbidden_only_needs_the_flag_set() {
        let mut offers = sample();
        offers[1].forbidden = true;
        let criteria = FilterCriteria {
            forbidden_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![2]);
    }

    #[test]
    fn postcode_fragment_matches_case_insensitively() {
        let mut offers = sample();
        offers[0].postcode = Some("NR32 4AB".to_string());
        let criteria = FilterCriteria {
            postcode_fragment: "nr32".to_string(),
            ..Default::default()
        };
        // The second offer has no postcode and must drop out too.
        assert_eq!(ids(&apply_filters(&offers, &criteria)), vec![1]);
    }

    #[test]
    fn absent_postcode_is_excluded_when_fragment_active() {
        let offers = sample();
        let criteria = FilterCriteria {
            postcode_fragment: "NR".to_string(),
            ..Default::default()
        };
        assert!(apply_filters(&offers, &criteria).is_empty());
    }

    #[test]
    fn result_is_an_order_preserving_subset() {
        let offers: Vec<Offer> = (0..8)
            .map(|i| offer(i, 2 + i * 2, 7 + (i % 3), 100.0 * f64::from(i + 1), i % 2 == 0, i % 3 == 0))
            .collect();
        let criteria = FilterCriteria {
            on_road_only: true,
            max_price: Some(600),
            ..Default::default()
        };

        let filtered = apply_filters(&offers, &criteria);
        let mut last_position = 0;
        for kept in &filtered {
            let position = offers
                .iter()
                .position(|o| o.id == kept.id)
                .expect("filtered offer must come from the input");
            assert!(position >= last_position, "input order not preserved");
            last_position = position;
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let offers = sample();
        let criteria = FilterCriteria {
            max_price: Some(300),
            ..Default::default()
        };

        let once: Vec<Offer> = apply_filters(&offers, &criteria)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, &criteria);
        assert_eq!(ids(&twice), ids(&apply_filters(&offers, &criteria)));
    }

    #[test]
    fn enabling_a_boolean_filter_never_grows_the_result() {
        let offers = sample();
        let base = FilterCriteria {
            max_price: Some(500),
            ..Default::default()
        };
        let narrowed = FilterCriteria {
            on_road_only: true,
            ..base.clone()
        };
        assert!(apply_filters(&offers, &narrowed).len() <= apply_filters(&offers, &base).len());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let criteria = FilterCriteria {
            heavy_waste_only: true,
            ..Default::default()
        };
        assert!(apply_filters(&[], &criteria).is_empty());
        assert!(apply_filters(&[], &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn out_of_range_bounds_just_empty_the_result() {
        let offers = sample();
        let criteria = FilterCriteria {
            max_price: Some(0),
            ..Default::default()
        };
        assert!(apply_filters(&offers, &criteria).is_empty());
    }
}
