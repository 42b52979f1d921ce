use serde::Deserialize;

/// One rentable skip configuration as returned by the remote endpoint.
/// The fetched list is immutable; `id` is unique within it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Offer {
    pub id: u32,
    /// Capacity in cubic yards.
    pub size: u32,
    pub hire_period_days: u32,
    pub price_before_vat: f64,
    /// VAT rate in percent.
    pub vat: f64,
    pub allowed_on_road: bool,
    pub allows_heavy_waste: bool,
    #[serde(default)]
    pub forbidden: bool,
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Size tiers used to accent cards and table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Offer {
    /// Gross price with the VAT rate applied.
    pub fn price_incl_vat(&self) -> f64 {
        self.price_before_vat * (1.0 + self.vat / 100.0)
    }

    pub fn size_class(&self) -> SizeClass {
        match self.size {
            0..=6 => SizeClass::Small,
            7..=10 => SizeClass::Medium,
            11..=16 => SizeClass::Large,
            _ => SizeClass::ExtraLarge,
        }
    }

    pub fn label(&self) -> String {
        format!("{} yd³ Skip", self.size)
    }
}

pub fn find_offer(offers: &[Offer], id: u32) -> Option<&Offer> {
    offers.iter().find(|offer| offer.id == id)
}
