// Entry point for `cargo run -p web-server`: load settings, start logging, serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let _log_guard = configuration::init_logging(&config.logging)?;
    web_server::run_server(config).await
}
