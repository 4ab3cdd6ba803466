//! Versioned on-disk cache of the last good price table.
//!
//! Lets the calculator run fully offline after the first successful fetch.
//! Cache files carry the app version in their name; files from other
//! versions are pruned when a new cache is written, so an upgrade starts
//! from fresh data.

use std::{
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::domain::PriceTable;
use crate::util::version::{current_version, parse_version_str, version_label};

const CACHE_DIR_NAME: &str = "malerikalkyl";
const CACHE_PREFIX: &str = "priser_";
const CACHE_EXT: &str = ".json";

/// Cached price table with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCache {
    /// App version that wrote this cache.
    pub version: String,
    /// Unix timestamp (seconds) when this cache was written.
    pub cached_at: u64,
    pub entries: BTreeMap<String, f64>,
}

impl PriceCache {
    pub fn new(table: &PriceTable) -> Self {
        let cached_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            version: version_label(),
            cached_at,
            entries: table.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        }
    }

    pub fn table(&self) -> PriceTable {
        PriceTable::from_entries(self.entries.iter().map(|(k, v)| (k.clone(), *v)))
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

fn cache_dir() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_DIR_NAME);
        let _ = fs::create_dir_all(&base);
        base
    })
    .clone()
}

fn cache_path() -> PathBuf {
    cache_dir().join(format!("{CACHE_PREFIX}{}{CACHE_EXT}", version_label()))
}

/// Loads the current version's price cache, if one exists.
pub fn load_price_cache() -> Option<PriceCache> {
    let path = cache_path();

    if !path.exists() {
        println!("[cache] No price cache found at {}", path.display());
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<PriceCache>(&content) {
            Ok(cache) => {
                println!(
                    "[cache] Loaded {} prices (age: {})",
                    cache.entries.len(),
                    cache.age_string()
                );
                Some(cache)
            }
            Err(e) => {
                println!("[cache] Failed to parse price cache: {e}");
                None
            }
        },
        Err(e) => {
            println!("[cache] Failed to read price cache: {e}");
            None
        }
    }
}

/// Writes the cache, then prunes files from other app versions.
pub fn save_price_cache(cache: &PriceCache) -> Result<(), io::Error> {
    let path = cache_path();
    let content = serde_json::to_string_pretty(cache)?;
    fs::write(&path, content)?;
    println!(
        "[cache] Saved {} prices to {}",
        cache.entries.len(),
        path.display()
    );
    prune_stale_caches();
    Ok(())
}

/// Deletes price caches written by other app versions. Returns how many
/// files were removed.
pub fn prune_stale_caches() -> usize {
    let current = current_version();
    let Ok(entries) = fs::read_dir(cache_dir()) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name
            .strip_prefix(CACHE_PREFIX)
            .and_then(|rest| rest.strip_suffix(CACHE_EXT))
        else {
            continue;
        };

        let stale = match (parse_version_str(stem), &current) {
            (Some(version), Some(current)) => version != *current,
            _ => stem != version_label(),
        };
        if stale && fs::remove_file(entry.path()).is_ok() {
            println!("[cache] Pruned stale price cache {name}");
            removed += 1;
        }
    }
    removed
}
