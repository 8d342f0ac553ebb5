use shared::domain::{Announcement, Record};

use crate::{aggregate::Aggregates, notifications::NotificationQueue};

/// Everything the page shows, owned by the controller and rebuilt on fetch.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub rows: Vec<Record>,
    pub aggregates: Aggregates,
    pub announcements: Vec<Announcement>,
    pub notifications: NotificationQueue,
}
