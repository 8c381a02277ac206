//! Admin dashboard statistics and chart.

use chrono::Month;

use crate::api::{AdminSummary, MonthlyCount};

/// The four scalar statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub total_users: String,
    pub completed_orders: String,
    pub total_revenue: String,
    pub most_washed_item: String,
}

impl From<&AdminSummary> for SummaryView {
    fn from(summary: &AdminSummary) -> Self {
        Self {
            total_users: summary.total_users.to_string(),
            completed_orders: summary.completed_orders.to_string(),
            total_revenue: summary.total_revenue.display(),
            most_washed_item: summary
                .most_washed_item
                .as_deref()
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .unwrap_or("N/A")
                .to_string(),
        }
    }
}

/// One bar of the monthly orders chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub count: u64,
}

/// Bar chart of orders per month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub title: &'static str,
    pub bars: Vec<ChartBar>,
    /// Largest count; the scale every bar is drawn against.
    pub max: u64,
}

impl ChartView {
    /// Build the chart, or `None` when there is nothing to draw.
    #[must_use]
    pub fn from_counts(counts: &[MonthlyCount]) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }

        let bars: Vec<ChartBar> = counts
            .iter()
            .map(|entry| ChartBar {
                label: month_label(entry.month),
                count: entry.count,
            })
            .collect();
        let max = bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);

        Some(Self {
            title: "Monthly Order Stats",
            bars,
            max,
        })
    }
}

/// "Mar" for 3, "Month 13" for anything out of range.
fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or_else(
            || format!("Month {month}"),
            |m| m.name().chars().take(3).collect(),
        )
}

#[cfg(test)]
mod tests {
    use laundry_core::Price;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_summary_view() {
        let view = SummaryView::from(&AdminSummary {
            total_users: 12,
            completed_orders: 30,
            total_revenue: Price::new(Decimal::new(123_450, 2)),
            most_washed_item: Some("Shirt".to_string()),
        });
        assert_eq!(view.total_users, "12");
        assert_eq!(view.total_revenue, "₹1,234.50");
        assert_eq!(view.most_washed_item, "Shirt");
    }

    #[test]
    fn test_summary_without_item_shows_na() {
        let view = SummaryView::from(&AdminSummary {
            total_users: 0,
            completed_orders: 0,
            total_revenue: Price::default(),
            most_washed_item: None,
        });
        assert_eq!(view.most_washed_item, "N/A");
    }

    #[test]
    fn test_empty_chart_is_hidden() {
        assert!(ChartView::from_counts(&[]).is_none());
    }

    #[test]
    fn test_chart_bars() {
        let chart = ChartView::from_counts(&[
            MonthlyCount { month: 1, count: 4 },
            MonthlyCount { month: 2, count: 9 },
        ])
        .unwrap_or_else(|| unreachable!());
        assert_eq!(chart.max, 9);
        assert_eq!(chart.bars[0].label, "Jan");
        assert_eq!(chart.bars[1].count, 9);
    }

    #[test]
    fn test_month_label_out_of_range() {
        assert_eq!(month_label(13), "Month 13");
        assert_eq!(month_label(12), "Dec");
    }
}
