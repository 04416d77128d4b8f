use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    /// assigned by the server, unix millis
    pub send_time: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SendMsgRequest {
    pub recipient_id: String,
    pub content: String,
}

impl Message {
    /// sent from `one` to `other` or from `other` to `one`, nothing else
    pub fn is_between(&self, one: &str, other: &str) -> bool {
        (self.sender_id == one && self.recipient_id == other)
            || (self.sender_id == other && self.recipient_id == one)
    }
}

/// keep the messages of exactly this pair, order preserved
pub fn conversation_filter(messages: Vec<Message>, one: &str, other: &str) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|msg| msg.is_between(one, other))
        .collect()
}

/// text that would render as nothing is not worth sending
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, from: &str, to: &str) -> Message {
        Message {
            id: id.to_string(),
            sender_id: from.to_string(),
            recipient_id: to.to_string(),
            content: "hi".to_string(),
            send_time: 0,
        }
    }

    #[test]
    fn filter_should_admit_both_directions_only() {
        let all = vec![
            msg("1", "a", "b"),
            msg("2", "b", "a"),
            msg("3", "a", "a"),
            msg("4", "b", "b"),
            msg("5", "a", "c"),
            msg("6", "c", "b"),
        ];
        let ids: Vec<String> = conversation_filter(all, "a", "b")
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn blank_text() {
        assert!(is_blank(""));
        assert!(is_blank("  \t\n"));
        assert!(!is_blank(" hi "));
    }
}
