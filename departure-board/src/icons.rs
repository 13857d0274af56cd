//! Line icon descriptions and the icon cache.
//!
//! The core never draws pixels; it describes the icon a renderer should
//! draw (shape, dimensions, colors, text) and caches those descriptions so
//! repeated departures on the same line do not re-render. The cache is
//! invalidated wholesale whenever the color reference table changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::TransportMode;

/// Shape a renderer should draw for a line icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconShape {
    /// Rounded rectangle, used for rail services.
    RoundedRect,
    /// Plain square, used for trams.
    Square,
    /// Banner with notched sides, used for buses.
    Banner,
    /// Hexagon, used for every other mode.
    Hexagon,
}

impl IconShape {
    /// Shape for a transport mode.
    pub fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Rail => IconShape::RoundedRect,
            TransportMode::Tram => IconShape::Square,
            TransportMode::Bus => IconShape::Banner,
            _ => IconShape::Hexagon,
        }
    }
}

/// A fully resolved icon description, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub shape: IconShape,
    pub width: u32,
    pub height: u32,
    /// Corner radius; meaningful for [`IconShape::RoundedRect`] only.
    pub radius: u32,
    /// Line code drawn inside the icon.
    pub text: String,
    pub background_color: String,
    pub text_color: String,
}

/// Cache of icon descriptions keyed by the exact line-code text rendered.
///
/// Interior mutability so the cache can be shared behind an `Arc` and read
/// from the departure cycle while the reference cycle owns invalidation.
#[derive(Debug, Default)]
pub struct IconCache {
    entries: Mutex<HashMap<String, Arc<IconSpec>>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached icon for `text`, building and caching it on a miss.
    pub fn get_or_create<F>(&self, text: &str, build: F) -> Arc<IconSpec>
    where
        F: FnOnce() -> IconSpec,
    {
        let mut entries = self.lock();
        if let Some(icon) = entries.get(text) {
            return icon.clone();
        }
        let icon = Arc::new(build());
        entries.insert(text.to_string(), icon.clone());
        icon
    }

    /// Drop every cached icon. Called after a successful color table
    /// refresh, since any cached colors may be stale.
    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    /// Number of cached icons.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<IconSpec>>> {
        // A poisoned lock only means a panic mid-insert; the map is still
        // usable and worst case we re-render an icon.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
