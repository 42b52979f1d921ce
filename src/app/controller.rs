use crate::app::state::AppState;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::fetch::OfferFetcher;
use crate::ui::run_browse_screen;

/// Coordinates the one-shot offer load with the browse screen loop.
pub struct AppController {
    config: SourceConfig,
}

impl AppController {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        let fetcher = OfferFetcher::new(self.config);
        let handle = tokio::spawn(async move { fetcher.fetch_offers().await });

        // The screen owns the state from here on. Quitting while the fetch is
        // still in flight aborts the task and discards its result.
        run_browse_screen(AppState::default(), handle).await
    }
}
