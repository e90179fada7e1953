use anyhow::Context;
use appointments_api::config::get_configuration;
use appointments_api::startup::Application;
use appointments_api::telemetry::init_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().context("Falha ao ler a configuração")?;
    init_subscriber(settings.logging.format);

    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
