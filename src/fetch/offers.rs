use reqwest::Client;

use crate::config::SourceConfig;
use crate::error::{AppError, Context, Result};
use crate::offers::Offer;

/// Issues the single outbound read of the offer list. The fetch is never
/// retried; transport failures, non-success statuses, and malformed bodies
/// all collapse into one load error.
pub struct OfferFetcher {
    config: SourceConfig,
    client: Client,
}

impl OfferFetcher {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub async fn fetch_offers(&self) -> Result<Vec<Offer>> {
        let url = self.config.request_url();
        log::debug!("requesting offer list from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::message(format!(
                "offer endpoint answered {}",
                status
            )));
        }

        let body = response.text().await?;
        let offers = decode_offers(&body).context("Failed to decode offer list")?;
        log::debug!("fetched {} offers", offers.len());
        Ok(offers)
    }
}

/// Parse the response body: a bare JSON array of offer objects. Unknown wire
/// fields are ignored; `forbidden` and `postcode` may be absent.
pub fn decode_offers(body: &str) -> Result<Vec<Offer>> {
    let offers: Vec<Offer> = serde_json::from_str(body)?;
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_full_offer() {
        let body = r#"[{
            "id": 17934,
            "size": 4,
            "hire_period_days": 14,
            "price_before_vat": 278.0,
            "vat": 20.0,
            "allowed_on_road": true,
            "allows_heavy_waste": true,
            "forbidden": false,
            "postcode": "NR32"
        }]"#;

        let offers = decode_offers(body).expect("body decodes");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, 17934);
        assert_eq!(offers[0].size, 4);
        assert_eq!(offers[0].postcode.as_deref(), Some("NR32"));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let body = r#"[{
            "id": 1,
            "size": 8,
            "hire_period_days": 7,
            "price_before_vat": 325.5,
            "vat": 20.0,
            "allowed_on_road": false,
            "allows_heavy_waste": true
        }]"#;

        let offers = decode_offers(body).expect("body decodes");
        assert!(!offers[0].forbidden);
        assert!(offers[0].postcode.is_none());
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let body = r#"[{
            "id": 2,
            "size": 12,
            "hire_period_days": 14,
            "price_before_vat": 400.0,
            "vat": 20.0,
            "allowed_on_road": true,
            "allows_heavy_waste": false,
            "transport_cost": null,
            "per_tonne_cost": null,
            "area": "Lowestoft"
        }]"#;

        let offers = decode_offers(body).expect("extra fields must not break decoding");
        assert_eq!(offers[0].size, 12);
    }

    #[test]
    fn empty_array_is_a_valid_payload() {
        let offers = decode_offers("[]").expect("empty array decodes");
        assert!(offers.is_empty());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(decode_offers("not json").is_err());
        assert!(decode_offers(r#"{"id": 1}"#).is_err(), "object is not an array");
        assert!(decode_offers(r#"[{"id": 1}]"#).is_err(), "missing required fields");
    }
}
