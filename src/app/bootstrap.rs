use crate::app::controller::AppController;
use crate::config::SourceConfig;
use crate::error::Result;

/// Entry point used by `main` to bootstrap the controller stack.
pub async fn run() -> Result<()> {
    let controller = AppController::new(SourceConfig::builtin());
    controller.run().await
}
