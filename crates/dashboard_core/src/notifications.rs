use std::collections::VecDeque;

/// Maximum number of retained status messages.
pub const NOTIFICATION_CAPACITY: usize = 6;
/// Number of messages shown as pills in the header.
pub const VISIBLE_NOTIFICATIONS: usize = 3;

/// Recent status messages, oldest position first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQueue {
    messages: VecDeque<String>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Important messages go to the front, others to the back. The queue is
    /// then cut back to its last [`NOTIFICATION_CAPACITY`] positions.
    pub fn notify(&mut self, message: impl Into<String>, important: bool) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        tracing::debug!(%message, important, "notification queued");
        if important {
            self.messages.push_front(message);
        } else {
            self.messages.push_back(message);
        }
        while self.messages.len() > NOTIFICATION_CAPACITY {
            self.messages.pop_front();
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .take(VISIBLE_NOTIFICATIONS)
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventh_append_evicts_the_oldest() {
        let mut queue = NotificationQueue::new();
        for index in 1..=7 {
            queue.notify(format!("message {index}"), false);
        }

        assert_eq!(queue.len(), NOTIFICATION_CAPACITY);
        let messages: Vec<&str> = queue.iter().collect();
        assert_eq!(
            messages,
            vec![
                "message 2",
                "message 3",
                "message 4",
                "message 5",
                "message 6",
                "message 7"
            ]
        );
    }

    #[test]
    fn important_messages_are_prepended() {
        let mut queue = NotificationQueue::new();
        queue.notify("routine", false);
        queue.notify("Nouvelle annonce : Réunion", true);

        assert_eq!(
            queue.visible().collect::<Vec<_>>(),
            vec!["Nouvelle annonce : Réunion", "routine"]
        );
    }

    #[test]
    fn never_exceeds_capacity_with_mixed_insertions() {
        let mut queue = NotificationQueue::new();
        for index in 0..20 {
            queue.notify(format!("n{index}"), index % 3 == 0);
            assert!(queue.len() <= NOTIFICATION_CAPACITY);
        }
    }

    #[test]
    fn empty_messages_are_ignored() {
        let mut queue = NotificationQueue::new();
        queue.notify("", true);
        assert!(queue.is_empty());
    }

    #[test]
    fn only_three_are_visible() {
        let mut queue = NotificationQueue::new();
        for index in 0..5 {
            queue.notify(format!("n{index}"), false);
        }
        assert_eq!(queue.visible().collect::<Vec<_>>(), vec!["n0", "n1", "n2"]);
    }
}
