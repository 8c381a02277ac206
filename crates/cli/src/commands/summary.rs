//! Admin statistics command.

use laundry_web::api::{AdminSummary, LaundryClient, MonthlyCount};
use laundry_web::views::{ChartView, SummaryView};
use serde::Serialize;

use super::{CommandError, Output};

#[derive(Serialize)]
struct Report {
    summary: AdminSummary,
    orders_per_month: Vec<MonthlyCount>,
}

/// Statistics followed by one line per month.
pub fn render(summary: &AdminSummary, counts: &[MonthlyCount]) -> Vec<String> {
    let view = SummaryView::from(summary);
    let mut lines = vec![
        format!("Total users:      {}", view.total_users),
        format!("Completed orders: {}", view.completed_orders),
        format!("Total revenue:    {}", view.total_revenue),
        format!("Most washed item: {}", view.most_washed_item),
    ];

    if let Some(chart) = ChartView::from_counts(counts) {
        lines.push(String::new());
        lines.push(chart.title.to_string());
        lines.extend(
            chart
                .bars
                .iter()
                .map(|bar| format!("{:<9} {}", bar.label, bar.count)),
        );
    }
    lines
}

/// Show the admin statistics.
///
/// # Errors
///
/// Returns an error if either backend call fails.
pub async fn show(client: &LaundryClient, output: &Output) -> Result<(), CommandError> {
    let (summary, counts) = tokio::join!(client.admin_summary(), client.orders_per_month());
    let report = Report {
        summary: summary?,
        orders_per_month: counts?,
    };

    output.emit(
        &report,
        &render(&report.summary, &report.orders_per_month),
    )
}
