use crate::results::LinkRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Anchor shown for 404 links without visible text
pub const EMPTY_ANCHOR: &str = "(sin texto)";

/// How rows are counted per status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    /// Every row counts
    Links,
    /// Each destination URL counts once, under the status of its first row
    DistinctDestinations,
}

/// Counts per status code together with the total they were computed against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub denominator: Denominator,
    pub total: usize,
    /// Count descending, ties in order of first appearance
    pub counts: Vec<(u16, usize)>,
}

impl StatusSummary {
    pub fn count(&self, status: u16) -> usize {
        self.counts
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Share of the total as a percentage rounded to one decimal
    pub fn percentage(&self, count: usize) -> f64 {
        percentage(count, self.total)
    }
}

/// First rows of a larger selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capped<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub omitted: usize,
}

impl<T> Capped<T> {
    /// Keep the first `cap` items of an already ordered selection
    pub fn take(all: Vec<T>, cap: usize) -> Self {
        let total = all.len();
        let mut items = all;
        items.truncate(cap);
        let omitted = total - items.len();
        Self {
            items,
            total,
            omitted,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Capped<U> {
        Capped {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            omitted: self.omitted,
        }
    }
}

/// A URL with how many rows reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCount {
    pub url: String,
    pub count: usize,
}

/// Grouped view of one link table.
///
/// The denominator is fixed at construction so every count and percentage
/// derived from one aggregation uses the same base.
#[derive(Debug)]
pub struct Aggregation<'a> {
    records: &'a [LinkRecord],
    summary: StatusSummary,
}

impl<'a> Aggregation<'a> {
    pub fn new(records: &'a [LinkRecord], denominator: Denominator) -> Self {
        let summary = summarize(records, denominator);
        ::log::debug!(
            "Aggregated {} rows into {} status codes (total {})",
            records.len(),
            summary.counts.len(),
            summary.total
        );
        Self { records, summary }
    }

    pub fn records(&self) -> &'a [LinkRecord] {
        self.records
    }

    pub fn summary(&self) -> &StatusSummary {
        &self.summary
    }

    pub fn denominator(&self) -> Denominator {
        self.summary.denominator
    }

    /// Denominator shared by every percentage of this aggregation
    pub fn total(&self) -> usize {
        self.summary.total
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Number of different destination URLs in the table
    pub fn distinct_destinations(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.destination.as_str())
            .collect::<HashSet<&str>>()
            .len()
    }

    pub fn count(&self, status: u16) -> usize {
        self.summary.count(status)
    }

    /// Combined count of several status codes
    pub fn count_any(&self, statuses: &[u16]) -> usize {
        statuses.iter().map(|status| self.count(*status)).sum()
    }

    pub fn percentage(&self, count: usize) -> f64 {
        self.summary.percentage(count)
    }

    /// Rows whose status matches, in input order, capped to the first `cap`
    pub fn subset<P>(&self, predicate: P, cap: usize) -> Capped<&'a LinkRecord>
    where
        P: Fn(u16) -> bool,
    {
        let matching: Vec<&'a LinkRecord> = self
            .records
            .iter()
            .filter(|record| predicate(record.status))
            .collect();
        Capped::take(matching, cap)
    }

    /// Rows whose status is one of `statuses`
    pub fn subset_of(&self, statuses: &[u16], cap: usize) -> Capped<&'a LinkRecord> {
        self.subset(|status| statuses.contains(&status), cap)
    }

    /// Most linked-from source pages
    pub fn top_sources(&self, n: usize) -> Vec<UrlCount> {
        top_urls(self.records.iter().map(|r| r.source.as_str()), n)
    }

    /// Most linked-to destination URLs
    pub fn top_destinations(&self, n: usize) -> Vec<UrlCount> {
        top_urls(self.records.iter().map(|r| r.destination.as_str()), n)
    }

    /// Distinct anchor texts of 404 links, in order of first appearance
    pub fn not_found_anchors(&self, cap: usize) -> Capped<String> {
        let mut seen = HashSet::new();
        let mut anchors = Vec::new();

        for record in self.records.iter().filter(|r| r.status == 404) {
            let anchor = match record.anchor.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => text,
                _ => EMPTY_ANCHOR,
            };
            if seen.insert(anchor) {
                anchors.push(anchor.to_string());
            }
        }

        Capped::take(anchors, cap)
    }
}

/// `count / total × 100`, rounded to one decimal, 0 for an empty table
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

fn summarize(records: &[LinkRecord], denominator: Denominator) -> StatusSummary {
    // status -> (count, first row index)
    let mut per_status: HashMap<u16, (usize, usize)> = HashMap::new();
    let mut seen_destinations: HashSet<&str> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let counts = match denominator {
            Denominator::Links => true,
            Denominator::DistinctDestinations => {
                seen_destinations.insert(record.destination.as_str())
            }
        };
        if counts {
            per_status.entry(record.status).or_insert((0, index)).0 += 1;
        }
    }

    let mut ordered: Vec<(u16, usize, usize)> = per_status
        .into_iter()
        .map(|(status, (count, first))| (status, count, first))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let counts: Vec<(u16, usize)> = ordered
        .into_iter()
        .map(|(status, count, _)| (status, count))
        .collect();
    let total = counts.iter().map(|(_, count)| count).sum();

    StatusSummary {
        denominator,
        total,
        counts,
    }
}

fn top_urls<'r>(urls: impl Iterator<Item = &'r str>, n: usize) -> Vec<UrlCount> {
    // url -> (count, first row index)
    let mut frequencies: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, url) in urls.enumerate() {
        frequencies.entry(url).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = frequencies
        .into_iter()
        .map(|(url, (count, first))| (url, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(n)
        .map(|(url, count, _)| UrlCount {
            url: url.to_string(),
            count,
        })
        .collect()
}
