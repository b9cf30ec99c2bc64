//! Paginated list envelope.
//!
//! # Design
//! A page is `{ "items": [...], "meta": { "current", "pageSize", "total" } }`.
//! `items` must decode as the expected type. `meta` is only trusted when it
//! is consistent with the items it accompanies; a missing, malformed or
//! contradictory `meta` is replaced with `PageMeta::fallback` so callers
//! always receive a structurally valid envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Paging metadata for one page of a larger collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number.
    pub current: u32,
    pub page_size: u32,
    /// Number of records across all pages.
    pub total: u64,
}

impl PageMeta {
    /// Conservative metadata describing `len` items as the only page.
    pub fn fallback(len: usize) -> Self {
        Self {
            current: 1,
            page_size: u32::try_from(len.max(1)).unwrap_or(u32::MAX),
            total: len as u64,
        }
    }

    /// Whether this metadata can describe a page holding `len` items.
    pub fn is_consistent_with(&self, len: usize) -> bool {
        self.current >= 1
            && self.page_size >= 1
            && len as u64 <= u64::from(self.page_size)
            && self.total >= len as u64
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

/// One page of results plus its paging metadata.
///
/// Deserializing always yields a consistent `meta`, whatever decoder is used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        self.meta.total_pages()
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.meta.current) < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PaginatedResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPage::<T>::deserialize(deserializer).map(|raw| raw.into_decoded().page)
    }
}

/// Outcome of decoding a page body.
#[derive(Debug)]
pub(crate) struct DecodedPage<T> {
    pub page: PaginatedResponse<T>,
    /// Set when the backend's `meta` was replaced by the fallback.
    pub meta_replaced: bool,
}

#[derive(Deserialize)]
struct RawPage<T> {
    items: Vec<T>,
    #[serde(default)]
    meta: Option<Value>,
}

impl<T> RawPage<T> {
    fn into_decoded(self) -> DecodedPage<T> {
        let len = self.items.len();
        let meta = self
            .meta
            .and_then(|meta| serde_json::from_value::<PageMeta>(meta).ok())
            .filter(|meta| meta.is_consistent_with(len));
        let meta_replaced = meta.is_none();
        DecodedPage {
            page: PaginatedResponse {
                items: self.items,
                meta: meta.unwrap_or_else(|| PageMeta::fallback(len)),
            },
            meta_replaced,
        }
    }
}

pub(crate) fn decode_page<T: DeserializeOwned>(
    body: &str,
) -> Result<DecodedPage<T>, serde_json::Error> {
    let raw: RawPage<T> = serde_json::from_str(body)?;
    Ok(raw.into_decoded())
}
