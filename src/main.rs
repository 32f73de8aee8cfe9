mod telemetry;

use events_api_api::Application;
use events_api_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Variables already set in the environment take precedence
    dotenvy::dotenv().ok();
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("events_api".into(), "info".into());
    init_subscriber(subscriber)?;

    let context = setup_context().await?;

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}
