//! Built-in location of the remote offer list.

/// Fixed source for the offer catalogue. The endpoint serves one depot
/// catchment identified by postcode and area; neither is user input.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub endpoint: String,
    pub postcode: String,
    pub area: String,
}

impl SourceConfig {
    pub fn builtin() -> Self {
        Self {
            endpoint: "https://app.wewantwaste.co.uk/api/skips/by-location".to_string(),
            postcode: "NR32".to_string(),
            area: "Lowestoft".to_string(),
        }
    }

    /// Full request URL with the location query attached.
    pub fn request_url(&self) -> String {
        format!(
            "{}?postcode={}&area={}",
            self.endpoint, self.postcode, self.area
        )
    }
}
