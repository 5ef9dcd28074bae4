use visage_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under many
// concurrent upload buffers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    visage_api::telemetry::init_tracing(config.log_format())?;

    let (_state, router) = visage_api::setup::initialize_app(config.clone()).await?;

    visage_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
