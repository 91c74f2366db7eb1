use anyhow::Context;
use idsrv::domain::config::ApiConfig;
use idsrv::kernel::config::load_config;
use idsrv_logger::Logger;
use idsrv_server::{Server, log_configuration};

const CONFIG_PATH: &str = "server";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some(CONFIG_PATH)).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).pipeline(cfg.logging).init()?;
    log_configuration(CONFIG_PATH, &cfg);

    Server::builder().config(cfg).build()?.run().await
}
