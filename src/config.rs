//! Runtime configuration for the league server.

use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

use crate::engine::RatingPolicy;

#[derive(Debug)]
pub struct Settings {
    /// K-factor while a participant is provisional.
    pub k_provisional: f64,
    /// K-factor once the provisional period is over.
    pub k_established: f64,
    /// Completed matches before a rating stops being provisional.
    pub provisional_threshold: u32,
    /// Redis standings-cache TTL (seconds).
    pub standings_cache_ttl: u64,
    /// Run a global rating recompute before accepting requests.
    pub recompute_on_start: bool,
    /// HMAC secret for admin bearer tokens. Unset ⇒ admin routes reject.
    pub jwt_secret: Option<String>,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    fn from_env() -> Self {
        let defaults = RatingPolicy::default();

        Settings {
            k_provisional: env_or("RATING_K_PROVISIONAL", defaults.provisional_k),
            k_established: env_or("RATING_K_ESTABLISHED", defaults.established_k),
            provisional_threshold: env_or(
                "RATING_PROVISIONAL_THRESHOLD",
                defaults.provisional_threshold,
            ),
            standings_cache_ttl: env_or("STANDINGS_CACHE_TTL", 30),
            recompute_on_start: env_or("RECOMPUTE_ON_START", false),
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn rating_policy(&self) -> RatingPolicy {
        RatingPolicy {
            provisional_k: self.k_provisional,
            established_k: self.k_established,
            provisional_threshold: self.provisional_threshold,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
