use skip_cli::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    skip_cli::app::bootstrap::run().await
}
