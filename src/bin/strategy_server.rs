use std::sync::Arc;

use betlab::{
    bind_addr_from_env, init_logging, log_app_bind, log_app_start, log_ranges_loaded,
    logging_config_from_env, metric_ranges_from_env, metric_ranges_path_from_env,
    strategy_router, validator_config_from_env, StrategyValidator, STRATEGY_ROUTES,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let addr = bind_addr_from_env()?;

    let ranges = metric_ranges_from_env()?;
    let ranges_path = metric_ranges_path_from_env();
    let source = if ranges_path.is_some() { "file" } else { "curated" };
    log_ranges_loaded(source, ranges.len(), ranges_path.as_deref());

    let validator = Arc::new(StrategyValidator::new(validator_config_from_env(), ranges));
    let app = strategy_router(validator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    log_app_bind(bound_addr, &STRATEGY_ROUTES);
    axum::serve(listener, app).await?;

    Ok(())
}
