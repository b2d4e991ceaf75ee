use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use url::Url;

use crate::models::{ListingItem, parse_price};
use crate::plugins::traits::ListingExtractor;
use crate::utils::text::{clean_name, unescape_embedded};
use crate::Result;

// Bounded windows like `.{0,500}?` expand into large automata.
const PATTERN_SIZE_LIMIT: usize = 32 * (1 << 20);

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

/// A single attempt in an extraction chain.
///
/// The record pattern must define `name` and `price` groups. The link comes
/// from its `link` group when present, otherwise from the n-th match of the
/// optional link pattern (its `link` group, or group 1).
#[derive(Debug, Clone)]
pub struct ExtractionPattern {
    record: Regex,
    links: Option<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRecord {
    name: String,
    price: String,
    link: Option<String>,
}

impl ExtractionPattern {
    pub fn new(record: &str) -> Result<Self> {
        let record = compile(record)?;
        for group in ["name", "price"] {
            if !record.capture_names().flatten().any(|n| n == group) {
                return Err(crate::AppError::Internal(format!(
                    "extraction pattern is missing the `{}` group",
                    group
                )));
            }
        }
        Ok(Self {
            record,
            links: None,
        })
    }

    pub fn with_link_pattern(mut self, links: &str) -> Result<Self> {
        self.links = Some(compile(links)?);
        Ok(self)
    }

    fn raw_records(&self, markup: &str) -> Vec<RawRecord> {
        let side_links: Vec<String> = match &self.links {
            Some(links) => links
                .captures_iter(markup)
                .filter_map(|caps| caps.name("link").or_else(|| caps.get(1)))
                .map(|m| m.as_str().to_string())
                .collect(),
            None => Vec::new(),
        };

        self.record
            .captures_iter(markup)
            .enumerate()
            .map(|(i, caps)| RawRecord {
                name: caps.name("name").map(|m| m.as_str().to_string()).unwrap_or_default(),
                price: caps.name("price").map(|m| m.as_str().to_string()).unwrap_or_default(),
                link: caps
                    .name("link")
                    .map(|m| m.as_str().to_string())
                    .or_else(|| side_links.get(i).cloned()),
            })
            .collect()
    }
}

/// Prioritised fallback chain of patterns for one source.
pub struct PatternExtractor {
    source_id: String,
    base_url: Url,
    patterns: Vec<ExtractionPattern>,
    fallback_link: Option<Url>,
}

impl PatternExtractor {
    pub fn new(source_id: &str, base_url: &str, patterns: Vec<ExtractionPattern>) -> Result<Self> {
        Ok(Self {
            source_id: source_id.to_string(),
            base_url: Url::parse(base_url)?,
            patterns,
            fallback_link: None,
        })
    }

    /// Link used for records whose own link is missing.
    pub fn with_fallback_link(mut self, link: &str) -> Result<Self> {
        self.fallback_link = Some(Url::parse(link)?);
        Ok(self)
    }

    /// Resolve a scraped link against the source domain.
    pub fn normalize_link(&self, raw: &str) -> Option<String> {
        let unescaped = unescape_embedded(raw);
        let trimmed = unescaped.trim();
        if trimmed.is_empty() {
            return self.fallback_link.as_ref().map(Url::to_string);
        }
        let resolved = self.base_url.join(trimmed).ok()?;
        match resolved.scheme() {
            "http" | "https" => Some(resolved.to_string()),
            _ => None,
        }
    }

    fn validate(&self, raw: &RawRecord) -> Option<ListingItem> {
        let name = clean_name(&raw.name);
        if name.is_empty() {
            return None;
        }
        let price = parse_price(&raw.price)?;
        let link = self.normalize_link(raw.link.as_deref().unwrap_or_default())?;
        Some(ListingItem { name, price, link })
    }
}

impl ListingExtractor for PatternExtractor {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn extract(&self, markup: &str, max_items: usize) -> Vec<ListingItem> {
        // First pattern with any raw match wins; no merging across patterns.
        let Some((index, raw)) = self
            .patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.raw_records(markup)))
            .find(|(_, raw)| !raw.is_empty())
        else {
            tracing::debug!(source = %self.source_id, "no pattern matched");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for record in &raw {
            if items.len() >= max_items {
                break;
            }
            let Some(item) = self.validate(record) else {
                continue;
            };
            if seen.insert(item.link.clone()) {
                items.push(item);
            }
        }

        tracing::debug!(
            source = %self.source_id,
            pattern = index,
            raw = raw.len(),
            items = items.len(),
            "extracted listing items"
        );
        items
    }
}
