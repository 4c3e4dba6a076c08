// src/engine/settings.rs

/// External configuration for one calculation run.
///
/// The engine itself has no notion of defaults: every `SkuInput` field is
/// resolved during ingestion, using the `default_*` values below for columns
/// the uploaded plan leaves empty. The engine reads only `algo_version` and
/// `soft_buffer` from here, which keeps `calculate` a pure function of its
/// arguments.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Version tag stamped on every recommendation.
    pub algo_version: String,
    /// Extra headroom (units) added to the OOS threshold while deriving a
    /// reduced sales rate. Never affects the order quantity.
    pub soft_buffer: f64,

    pub default_oos_safety_mp_pct: f64,
    pub default_safety_stock_mp: u32,
    pub default_safety_stock_ff: u32,
    pub default_moq_step: u32,
    pub default_prod_lead_time_days: u32,
    pub default_lead_time_cn_msk: u32,
    pub default_lead_time_msk_mp: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            algo_version: "v1.2a".to_string(),
            soft_buffer: 0.0,
            default_oos_safety_mp_pct: 5.0,
            default_safety_stock_mp: 0,
            default_safety_stock_ff: 0,
            default_moq_step: 1,
            default_prod_lead_time_days: 0,
            default_lead_time_cn_msk: 0,
            default_lead_time_msk_mp: 0,
        }
    }
}

impl EngineSettings {
    /// Builds settings from the process environment, falling back to the
    /// defaults above. Recognized variables: `ALGO_VERSION`, `SOFT_BUFFER`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(v) = std::env::var("ALGO_VERSION") {
            if !v.is_empty() {
                settings.algo_version = v;
            }
        }
        if let Ok(v) = std::env::var("SOFT_BUFFER") {
            if let Ok(buf) = v.parse::<f64>() {
                settings.soft_buffer = buf.max(0.0);
            }
        }
        settings
    }
}
