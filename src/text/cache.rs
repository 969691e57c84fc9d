// src/text/cache.rs

//! LRU cache of rendered glyph runs, keyed by text and style.

use super::{RenderedText, TextShaper, TextStyle};
use anyhow::{Context, Result};
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    style: TextStyle,
}

#[derive(Debug)]
struct CacheEntry {
    run: Arc<RenderedText>,
    last_used: u64,
}

/// Memoizes shaper output. Entries are immutable once inserted; when the
/// cache is full the least recently used entry is evicted.
#[derive(Debug)]
pub struct TextCache {
    capacity: Option<usize>,
    entries: HashMap<CacheKey, CacheEntry>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl TextCache {
    /// Creates a cache holding at most `capacity` runs (`None` = unbounded).
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Whether a run for `text` in `style` is cached.
    pub fn contains(&self, text: &str, style: &TextStyle) -> bool {
        self.entries.contains_key(&CacheKey {
            text: text.to_owned(),
            style: style.clone(),
        })
    }

    /// Returns the cached run for `text` in `style`, rendering and inserting
    /// it through `shaper` on a miss.
    pub fn get_or_render(
        &mut self,
        text: &str,
        style: &TextStyle,
        shaper: &dyn TextShaper,
    ) -> Result<Arc<RenderedText>> {
        self.tick += 1;
        let key = CacheKey {
            text: text.to_owned(),
            style: style.clone(),
        };

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.tick;
            self.hits += 1;
            trace!("TextCache: hit for {:?}", text);
            return Ok(Arc::clone(&entry.run));
        }

        self.misses += 1;
        debug!("TextCache: miss for {:?}, rendering", text);
        let run = shaper
            .render(text, style)
            .with_context(|| format!("Shaper failed on {:?}", text))?;
        anyhow::ensure!(
            run.is_well_formed(),
            "Shaper returned a malformed {}x{} run for {:?}",
            run.width,
            run.height,
            text
        );
        let run = Arc::new(run);

        if self.capacity == Some(0) {
            return Ok(run);
        }
        if self.capacity.is_some_and(|cap| self.entries.len() >= cap) {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            CacheEntry {
                run: Arc::clone(&run),
                last_used: self.tick,
            },
        );
        Ok(run)
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!("TextCache: evicting {:?}", key.text);
            self.entries.remove(&key);
        }
    }

    /// Drops every cached run.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
