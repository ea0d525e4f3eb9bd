//! Scan configuration with environment overrides.

use std::env;
use std::time::Duration;

/// Tunables for one scan run.
///
/// Defaults mirror the host-page timings the pipeline was calibrated
/// against; every field can be overridden through a `CLAIMDEX_*` variable.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Canonical origin used to absolutize item and profile references.
    pub origin: String,
    /// Booking keyword searched for in comment text.
    pub keyword: String,

    /// Consecutive no-growth scan rounds before the gallery is complete.
    pub gallery_max_idle_rounds: u32,
    /// Delay between gallery scroll rounds.
    pub gallery_step_delay: Duration,

    /// Ceiling on waiting for the detail view's comment region.
    pub comments_ready_timeout: Duration,
    /// Poll interval while waiting for the comment region.
    pub comments_ready_poll: Duration,
    /// Settle pause once the comment region appears.
    pub comments_settle: Duration,

    /// Maximum comment pagination rounds per item.
    pub comment_load_rounds: u32,
    /// Pause between comment pagination rounds.
    pub comment_load_pause: Duration,
    /// Consecutive unchanged-count rounds before the thread is complete.
    pub comment_stable_rounds: u32,

    /// Ceiling on waiting for an advance to take effect.
    pub advance_timeout: Duration,
    /// Poll interval while waiting for advance confirmation.
    pub advance_poll: Duration,

    /// Pause after closing a detail view before opening the next item.
    pub open_settle: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            origin: "https://vk.com".to_string(),
            keyword: "бронь".to_string(),
            gallery_max_idle_rounds: 14,
            gallery_step_delay: Duration::from_millis(900),
            comments_ready_timeout: Duration::from_secs(15),
            comments_ready_poll: Duration::from_millis(100),
            comments_settle: Duration::from_millis(250),
            comment_load_rounds: 14,
            comment_load_pause: Duration::from_millis(450),
            comment_stable_rounds: 3,
            advance_timeout: Duration::from_secs(10),
            advance_poll: Duration::from_millis(150),
            open_settle: Duration::from_millis(200),
        }
    }
}

impl ScanConfig {
    /// Defaults overridden by any `CLAIMDEX_*` variables present.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("CLAIMDEX_ORIGIN") {
            cfg.origin = v;
        }
        if let Ok(v) = env::var("CLAIMDEX_KEYWORD") {
            cfg.keyword = v;
        }
        cfg.gallery_max_idle_rounds =
            env_u32("CLAIMDEX_GALLERY_MAX_IDLE_ROUNDS", cfg.gallery_max_idle_rounds);
        cfg.gallery_step_delay = env_ms("CLAIMDEX_GALLERY_STEP_DELAY_MS", cfg.gallery_step_delay);
        cfg.comments_ready_timeout =
            env_ms("CLAIMDEX_COMMENTS_READY_TIMEOUT_MS", cfg.comments_ready_timeout);
        cfg.comments_ready_poll = env_ms("CLAIMDEX_COMMENTS_READY_POLL_MS", cfg.comments_ready_poll);
        cfg.comments_settle = env_ms("CLAIMDEX_COMMENTS_SETTLE_MS", cfg.comments_settle);
        cfg.comment_load_rounds = env_u32("CLAIMDEX_COMMENT_LOAD_ROUNDS", cfg.comment_load_rounds);
        cfg.comment_load_pause = env_ms("CLAIMDEX_COMMENT_LOAD_PAUSE_MS", cfg.comment_load_pause);
        cfg.comment_stable_rounds =
            env_u32("CLAIMDEX_COMMENT_STABLE_ROUNDS", cfg.comment_stable_rounds);
        cfg.advance_timeout = env_ms("CLAIMDEX_ADVANCE_TIMEOUT_MS", cfg.advance_timeout);
        cfg.advance_poll = env_ms("CLAIMDEX_ADVANCE_POLL_MS", cfg.advance_poll);
        cfg.open_settle = env_ms("CLAIMDEX_OPEN_SETTLE_MS", cfg.open_settle);
        cfg
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_ms(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
