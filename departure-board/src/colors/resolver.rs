//! Line color lookup with a periodically refreshed reference table.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::icons::IconCache;

use super::error::ColorTableError;
use super::table::{self, ColorTableEntry};

/// Fixed colors for long-distance services (ICE/IC), which are not listed
/// in the operator's reference table.
pub const LONG_DISTANCE_COLORS: (&str, &str) = ("#EC0016", "#FFFFFF");

/// Default HTTP timeout for table downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// A background/text color pair, both hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub text: String,
}

impl ColorPair {
    pub fn new(background: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            text: text.into(),
        }
    }
}

/// Resolves line codes to icon colors.
///
/// Owns the in-memory reference table and the icon cache, the only mutable
/// state shared between the two refresh cycles: the reference cycle writes
/// both (table swap, cache invalidation), the departure cycle only reads.
///
/// Lookups are infallible: unknown lines get the caller's fallback pair,
/// and a failed refresh keeps the previous table.
pub struct ColorResolver {
    /// Operator filter, matched case-insensitively as a substring of the
    /// table's `shortOperatorName` column.
    operator_lower: String,
    source_url: String,
    http: reqwest::Client,
    table: RwLock<Vec<ColorTableEntry>>,
    icons: IconCache,
}

impl ColorResolver {
    /// Create a resolver with an empty table.
    ///
    /// Prime it with [`ColorResolver::load_cached`] or a first
    /// [`ColorResolver::refresh`]; until then every lookup falls back.
    pub fn new(
        operator: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Result<Self, ColorTableError> {
        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            operator_lower: operator.into().to_lowercase(),
            source_url: source_url.into(),
            http,
            table: RwLock::new(Vec::new()),
            icons: IconCache::new(),
        })
    }

    /// The icon cache owned by this resolver.
    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    /// Number of rows currently in the in-memory table.
    pub fn table_len(&self) -> usize {
        self.read_table().len()
    }

    /// Resolve the colors for a normalized line code.
    ///
    /// Long-distance codes (`ICE`/`IC` prefixes) always get the fixed
    /// [`LONG_DISTANCE_COLORS`] pair. When `treat_sev_as_normal` is set, a
    /// replacement-service code like `SEV3` is looked up as line `3` so it
    /// inherits the replaced line's colors. Anything not found in the table
    /// returns `fallback` verbatim.
    pub fn resolve(
        &self,
        line_code: &str,
        fallback: &ColorPair,
        treat_sev_as_normal: bool,
    ) -> ColorPair {
        if line_code.starts_with("ICE") || line_code.starts_with("IC") {
            return ColorPair::new(LONG_DISTANCE_COLORS.0, LONG_DISTANCE_COLORS.1);
        }

        let lookup = match line_code.strip_prefix("SEV") {
            Some(stripped) if treat_sev_as_normal => stripped,
            _ => line_code,
        };

        let table = self.read_table();
        table
            .iter()
            .find(|row| {
                row.line_name == lookup
                    && row
                        .short_operator_name
                        .to_lowercase()
                        .contains(&self.operator_lower)
            })
            .map(|row| ColorPair::new(row.background_color.clone(), row.text_color.clone()))
            .unwrap_or_else(|| fallback.clone())
    }

    /// Prime the in-memory table from a previously downloaded file.
    pub fn load_cached(&self, path: &Path) -> Result<usize, ColorTableError> {
        let entries = table::load_table(path)?;
        let count = entries.len();
        *self.write_table() = entries;
        Ok(count)
    }

    /// Fetch the latest reference table into `path` and reload it.
    ///
    /// Returns `true` when the table was replaced. On any network, I/O or
    /// parse failure the in-memory table is left untouched, the failure is
    /// logged, and `false` is returned; callers must clear the icon cache
    /// only on `true`.
    pub async fn refresh(&self, path: &Path) -> bool {
        match self.try_refresh(path).await {
            Ok(count) => {
                info!(rows = count, "refreshed line color table");
                true
            }
            Err(e) => {
                warn!("line color table refresh failed, keeping previous table: {e}");
                false
            }
        }
    }

    async fn try_refresh(&self, path: &Path) -> Result<usize, ColorTableError> {
        let response = self.http.get(&self.source_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ColorTableError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        // Parse before writing anything, so a bad download can neither
        // clobber the cache file nor the in-memory table.
        let entries = table::parse_table(&bytes)?;
        std::fs::write(path, &bytes)?;

        let count = entries.len();
        *self.write_table() = entries;
        Ok(count)
    }

    fn read_table(&self) -> RwLockReadGuard<'_, Vec<ColorTableEntry>> {
        match self.table.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, Vec<ColorTableEntry>> {
        match self.table.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
