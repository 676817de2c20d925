use metrics_exporter_prometheus::PrometheusHandle;
use smartintern::config::AppConfig;
use smartintern::flows::{AssetError, FlowAssets, FollowUpMode};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Content tables from the configuration, with an optional deterministic
/// follow-up sequence for demos.
pub(crate) fn load_assets(config: &AppConfig, seed: Option<u64>) -> Result<FlowAssets, AssetError> {
    let assets = FlowAssets::from_config(config)?;
    Ok(match seed {
        Some(seed) => assets.with_follow_up(FollowUpMode::Seeded {
            probability: config.content.follow_up_probability,
            seed,
        }),
        None => assets,
    })
}
