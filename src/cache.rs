//! Redis cache for rendered standings tables.
//!
//! Entries are whole JSON bodies keyed by league and season, written with a
//! short TTL and dropped after every successful rating recompute. A Redis
//! outage only costs the cache: every call here degrades to a miss.
//
//  Redis keys
//  ----------
//  standings:<league_id>:<season_id | all>   – STRING (JSON), TTL = STANDINGS_CACHE_TTL

use redis::{AsyncCommands, Client as RedisClient};
use uuid::Uuid;

use crate::recompute::RecomputeScope;

pub fn standings_key(league_id: Uuid, season_id: Option<Uuid>) -> String {
    match season_id {
        Some(season) => format!("standings:{league_id}:{season}"),
        None => format!("standings:{league_id}:all"),
    }
}

fn invalidation_pattern(scope: RecomputeScope) -> String {
    match scope {
        RecomputeScope::League(league_id) => format!("standings:{league_id}:*"),
        RecomputeScope::AllLeagues => "standings:*".to_string(),
    }
}

/// Cached body for `key`, if any.
pub async fn get_standings(redis: &RedisClient, key: &str) -> Option<String> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            log::warn!("standings cache read skipped, redis unavailable: {e}");
            return None;
        }
    };
    conn.get::<_, Option<String>>(key).await.ok().flatten()
}

pub async fn put_standings(redis: &RedisClient, key: &str, body: &str, ttl_secs: u64) {
    if ttl_secs == 0 {
        return;
    }
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            log::warn!("standings cache write skipped, redis unavailable: {e}");
            return;
        }
    };
    if let Err(e) = conn.set_ex::<_, _, ()>(key, body, ttl_secs).await {
        log::warn!("standings cache write failed for {key}: {e}");
    }
}

/// Keys inspected per SCAN round trip.
const SCAN_BATCH: usize = 200;

fn scan_cmd(cursor: u64, pattern: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("SCAN");
    cmd.arg(cursor)
        .arg("MATCH")
        .arg(pattern)
        .arg("COUNT")
        .arg(SCAN_BATCH);
    cmd
}

/// Drop every cached table the recompute may have changed.
///
/// Walks the keyspace with SCAN so a large cache never blocks Redis.
pub async fn invalidate_standings(redis: &RedisClient, scope: RecomputeScope) {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            log::warn!("standings cache invalidation skipped for {scope}: {e}");
            return;
        }
    };

    let pattern = invalidation_pattern(scope);
    let mut cursor = 0u64;
    loop {
        let (next, keys): (u64, Vec<String>) =
            match scan_cmd(cursor, &pattern).query_async(&mut conn).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("listing cached standings for {scope} failed: {e}");
                    return;
                }
            };
        if !keys.is_empty() {
            if let Err(e) = conn.del::<_, ()>(keys).await {
                log::warn!("standings cache invalidation failed for {scope}: {e}");
                return;
            }
        }
        if next == 0 {
            break;
        }
        cursor = next;
    }
}
