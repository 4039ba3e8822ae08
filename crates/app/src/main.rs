use anyhow::Context;

use gearlog_app::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    gearlog_observability::init(config.log_format);

    tracing::info!(
        id_strategy = ?config.id_strategy,
        seed_demo = config.seed_demo,
        "starting gearlog"
    );

    let catalog = gearlog_app::build_catalog(&config);
    gearlog_app::write_report(&catalog, std::io::stdout().lock())
}
