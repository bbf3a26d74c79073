use sx_app::cli;
use sx_app::config_loader;
use sx_app::runner;
use sx_app::shutdown_handler;
use sx_app::tracing_setup;
use sx_ratelimit::CancellationToken;
use tikv_jemallocator::Jemalloc;
use tracing::error;
use tracing::info;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const APP_NAME: &str = "sx_top_questions";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = config_loader::config_path();
    let loaded = config_loader::load_app_config(&config_path);

    // CRITICAL: Keep guard alive for entire application lifetime
    let logging = loaded.as_ref().map(|config| config.logging.clone()).unwrap_or_default();
    let _guard = tracing_setup::init_from_config(APP_NAME, &logging);

    let mut config = config_loader::config_or_default(loaded, &config_path);
    config.apply_args(cli::search_args());

    let cancel = CancellationToken::new();
    shutdown_handler::setup(cancel.clone())?;

    match runner::top_questions(&config, &cancel).await {
        Ok(top) => {
            info!("Found {} unanswered questions", top.len());
            println!("{}", runner::render_json(&top)?);
            Ok(())
        }
        Err(err) => {
            error!("Search failed: {err:#}");
            Err(err)
        }
    }
}
