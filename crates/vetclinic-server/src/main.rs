use anyhow::Context;
use vetclinic_server::{config::ClinicConfig, init_tracing, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClinicConfig::load_with_dotenv().context("loading configuration")?;
    start_server(config).await.context("running server")?;
    Ok(())
}
