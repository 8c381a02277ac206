//! Notification messages.
//!
//! The same notification feed is shown three ways: the dashboard lists only
//! completed orders, the orders page lists everything, and the track page
//! shows the most recent entry.

use laundry_core::OrderStatus;

use crate::api::Notification;

/// One rendered notification line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub order_id: String,
    pub status: OrderStatus,
    pub message: String,
}

impl NotificationView {
    /// Dashboard banner lines: completed orders only.
    #[must_use]
    pub fn completed(notifications: &[Notification]) -> Vec<Self> {
        notifications
            .iter()
            .filter(|n| n.status == OrderStatus::Completed)
            .map(|n| Self {
                order_id: n.order_id.to_string(),
                status: n.status,
                message: format!("✅ Your Order #{} is Completed!", n.order_id),
            })
            .collect()
    }

    /// Orders page lines: every notification.
    #[must_use]
    pub fn all(notifications: &[Notification]) -> Vec<Self> {
        notifications.iter().map(Self::status_line).collect()
    }

    /// Track page line: the last notification, if any.
    #[must_use]
    pub fn latest(notifications: &[Notification]) -> Option<Self> {
        notifications.last().map(Self::status_line)
    }

    fn status_line(n: &Notification) -> Self {
        Self {
            order_id: n.order_id.to_string(),
            status: n.status,
            message: format!("✅ Order {} is {}", n.order_id, n.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use laundry_core::OrderId;

    use super::*;

    fn feed() -> Vec<Notification> {
        vec![
            Notification {
                order_id: OrderId::new("a1"),
                status: OrderStatus::Completed,
            },
            Notification {
                order_id: OrderId::new("b2"),
                status: OrderStatus::Cancelled,
            },
        ]
    }

    #[test]
    fn test_completed_only() {
        let lines = NotificationView::completed(&feed());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].message, "✅ Your Order #a1 is Completed!");
    }

    #[test]
    fn test_completed_empty_when_none() {
        let feed = vec![Notification {
            order_id: OrderId::new("c3"),
            status: OrderStatus::Pending,
        }];
        assert!(NotificationView::completed(&feed).is_empty());
    }

    #[test]
    fn test_all_and_latest() {
        let all = NotificationView::all(&feed());
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].message, "✅ Order b2 is Cancelled");

        let latest = NotificationView::latest(&feed()).unwrap_or_else(|| unreachable!());
        assert_eq!(latest.order_id, "b2");
        assert!(NotificationView::latest(&[]).is_none());
    }
}
