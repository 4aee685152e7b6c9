//! Browse-table filtering and pagination over position records.
//!
//! Mirrors the dashboard controls: a survey-status radio filter, free-text
//! region and hole-ID filters matched case-insensitively as substrings, a
//! page size clamped to 1..=500 and a 1-indexed start row clamped into the
//! filtered row range.

use crate::domain::model::{PositionRecord, StatusFilter, TablePage, TableView};

pub const MAX_PAGE_SIZE: i64 = 500;

/// The three table filters, as the user typed them. Free-text values are
/// upper-cased before matching.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    pub survey_status: StatusFilter,
    pub region: String,
    pub hole_id: String,
}

impl TableFilter {
    pub fn matches(&self, record: &PositionRecord) -> bool {
        if !self.survey_status.matches(&record.survey_status) {
            return false;
        }
        if !self.region.is_empty() && !record.region.to_uppercase().contains(&self.region.to_uppercase())
        {
            return false;
        }
        if !self.hole_id.is_empty()
            && !record.hole_id.to_uppercase().contains(&self.hole_id.to_uppercase())
        {
            return false;
        }
        true
    }
}

/// Page size clamped to `1..=500`.
pub fn clamp_page_size(page_size: i64) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE) as usize
}

/// 0-indexed start row clamped to `[0, total)`; 0 when there are no rows.
pub fn clamp_start_row(start_row: i64, total: usize) -> usize {
    if total == 0 || start_row < 0 {
        return 0;
    }
    (start_row as usize).min(total - 1)
}

/// Builds one page of the browse table. `start_row` is 1-indexed, matching
/// the dashboard input field.
pub fn page(
    records: &[PositionRecord],
    filter: &TableFilter,
    start_row: i64,
    page_size: i64,
) -> TableView {
    let filtered: Vec<&PositionRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    if filtered.is_empty() {
        return TableView::Empty;
    }

    let total = filtered.len();
    let start = clamp_start_row(start_row.saturating_sub(1), total);
    let end = total.min(start + clamp_page_size(page_size));

    TableView::Page(TablePage {
        start_row: start,
        end_row: end,
        total,
        rows: filtered[start..end].iter().map(|r| (*r).clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hole_id: &str, region: &str, status: &str) -> PositionRecord {
        PositionRecord {
            hole_id: hole_id.to_string(),
            region: region.to_string(),
            regionpit: format!("{region}_PIT1"),
            subregionpit: format!("{region}_SUBPIT1"),
            survey_status: status.to_string(),
        }
    }

    fn sample() -> Vec<PositionRecord> {
        vec![
            record("DH001", "REGION_A", "FULL_SURVEY"),
            record("DH002", "REGION_A", "PARTIAL_SURVEY"),
            record("DH003", "REGION_B", "STOPPED_SHORT"),
            record("DH004", "REGION_B", "FULL_SURVEY"),
        ]
    }

    #[test]
    fn test_clamp_start_row() {
        assert_eq!(clamp_start_row(-5, 100), 0);
        assert_eq!(clamp_start_row(0, 100), 0);
        assert_eq!(clamp_start_row(99, 100), 99);
        assert_eq!(clamp_start_row(150, 100), 99);
        assert_eq!(clamp_start_row(10, 0), 0);
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(600), 500);
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(-3), 1);
        assert_eq!(clamp_page_size(20), 20);
    }

    #[test]
    fn test_region_filter_is_case_insensitive_substring() {
        let filter = TableFilter {
            region: "reg".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&record("DH001", "REGION_A", "FULL_SURVEY")));

        let filter = TableFilter {
            region: "region_b".to_string(),
            ..Default::default()
        };
        assert!(!filter.matches(&record("DH001", "REGION_A", "FULL_SURVEY")));
        assert!(filter.matches(&record("DH003", "REGION_B", "FULL_SURVEY")));
    }

    #[test]
    fn test_hole_id_filter_is_case_insensitive_substring() {
        let filter = TableFilter {
            hole_id: "dh00".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&record("DH001", "REGION_A", "FULL_SURVEY")));

        let filter = TableFilter {
            hole_id: "DH9".to_string(),
            ..Default::default()
        };
        assert!(!filter.matches(&record("DH001", "REGION_A", "FULL_SURVEY")));
    }

    #[test]
    fn test_status_filter_is_exact() {
        let filter = TableFilter {
            survey_status: StatusFilter::FullSurvey,
            ..Default::default()
        };
        let view = page(&sample(), &filter, 1, 20);
        match view {
            TableView::Page(page) => {
                assert_eq!(page.total, 2);
                assert!(page.rows.iter().all(|r| r.survey_status == "FULL_SURVEY"));
            }
            TableView::Empty => panic!("expected a page"),
        }
    }

    #[test]
    fn test_empty_filter_result_yields_no_data_view() {
        let filter = TableFilter {
            region: "NOWHERE".to_string(),
            ..Default::default()
        };
        let view = page(&sample(), &filter, 1, 20);
        assert_eq!(view, TableView::Empty);
        assert_eq!(view.caption(), "No data for this filter combination.");
    }

    #[test]
    fn test_page_caption_is_one_indexed() {
        let view = page(&sample(), &TableFilter::default(), 2, 2);
        match view {
            TableView::Page(page) => {
                assert_eq!(page.start_row, 1);
                assert_eq!(page.end_row, 3);
                assert_eq!(page.caption(), "Showing rows 2 - 3 out of 4 total.");
                assert_eq!(page.rows.len(), 2);
                assert_eq!(page.rows[0].hole_id, "DH002");
            }
            TableView::Empty => panic!("expected a page"),
        }
    }

    #[test]
    fn test_start_row_past_end_clamps_to_last_row() {
        let view = page(&sample(), &TableFilter::default(), 99, 20);
        match view {
            TableView::Page(page) => {
                assert_eq!(page.start_row, 3);
                assert_eq!(page.end_row, 4);
                assert_eq!(page.rows.len(), 1);
                assert_eq!(page.rows[0].hole_id, "DH004");
            }
            TableView::Empty => panic!("expected a page"),
        }
    }
}
