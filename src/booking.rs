//! Placeholder hand-off point for the real booking flow.

use crate::offers::Offer;

/// Receives the chosen offer and produces the confirmation line shown in the
/// modal. A real integration would start the checkout here.
pub fn confirm_booking(offer: &Offer) -> String {
    log::info!("booking hand-off for offer {}", offer.id);
    format!(
        "Continue to booking: {} for {} days at £{:.2} inc. VAT",
        offer.label(),
        offer.hire_period_days,
        offer.price_incl_vat()
    )
}
