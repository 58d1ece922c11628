use anyhow::Context;
use avinya_footer::configuration::get_config;
use avinya_footer::startup::Application;
use avinya_footer::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber =
        get_subscriber("avinya_footer".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_config().context("failed to read configuration")?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
