use crate::aggregate::{Aggregation, Capped, Denominator, UrlCount};
use crate::config::{ReportConfig, Variant};
use crate::results::LinkRecord;
use serde::Serialize;

/// Headline numbers of the executive summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub not_found: usize,
    pub forbidden: usize,
    pub bad_request: usize,
    pub redirects: usize,
}

/// One status code with its count and share of the total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    pub status: u16,
    pub count: usize,
    pub percentage: f64,
}

/// Everything needed to render a report, computed from one aggregation
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub variant: Variant,
    pub denominator: Denominator,
    pub rows: usize,
    pub metrics: Metrics,
    /// Fixed set of codes shown as cards, even when their count is 0
    pub cards: Vec<StatusRow>,
    /// Every code present, in summary order
    pub distribution: Vec<StatusRow>,
    pub redirect_codes: Vec<u16>,
    pub critical_codes: Vec<u16>,
    pub not_found: Capped<LinkRecord>,
    pub redirects: Capped<LinkRecord>,
    pub critical: Capped<LinkRecord>,
    pub top_sources: Vec<UrlCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_destinations: Vec<UrlCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found_anchors: Option<Capped<String>>,
}

impl StatusReport {
    pub fn build(aggregation: &Aggregation<'_>, variant: Variant, config: &ReportConfig) -> Self {
        let cap = config.detail_row_cap;
        let row = |status: u16| {
            let count = aggregation.count(status);
            StatusRow {
                status,
                count,
                percentage: aggregation.percentage(count),
            }
        };

        let metrics = Metrics {
            total: aggregation.total(),
            not_found: aggregation.count(404),
            forbidden: aggregation.count(403),
            bad_request: aggregation.count(400),
            redirects: aggregation.count_any(variant.redirect_codes()),
        };

        let distribution = aggregation
            .summary()
            .counts
            .iter()
            .map(|(status, _)| row(*status))
            .collect();

        let extended = variant.extended_prompt();

        Self {
            variant,
            denominator: aggregation.denominator(),
            rows: aggregation.row_count(),
            metrics,
            cards: variant.card_codes().iter().map(|s| row(*s)).collect(),
            distribution,
            redirect_codes: variant.redirect_codes().to_vec(),
            critical_codes: variant.critical_codes().to_vec(),
            not_found: aggregation.subset(|s| s == 404, cap).map(Clone::clone),
            redirects: aggregation
                .subset_of(variant.redirect_codes(), cap)
                .map(Clone::clone),
            critical: aggregation
                .subset_of(variant.critical_codes(), cap)
                .map(Clone::clone),
            top_sources: aggregation.top_sources(config.top_n),
            top_destinations: if extended {
                aggregation.top_destinations(config.top_n)
            } else {
                Vec::new()
            },
            not_found_anchors: extended.then(|| aggregation.not_found_anchors(config.anchor_cap)),
        }
    }
}
