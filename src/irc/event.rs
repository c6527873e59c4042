use super::classifier::Trigger;
use super::parser;

/// A semantic event recognised in received text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Ping,
    PrivateMessage {
        nick: String,
        text: String,
        is_action: bool,
    },
    Join {
        nick: String,
        channel: String,
    },
}

impl ChatEvent {
    /// Build the event a trigger stands for from the text that fired it.
    pub fn from_trigger(trigger: Trigger, text: &str) -> Self {
        match trigger {
            Trigger::Ping => ChatEvent::Ping,
            Trigger::Privmsg => ChatEvent::PrivateMessage {
                nick: parser::extract_nick(text).to_string(),
                text: parser::extract_payload(text).to_string(),
                is_action: parser::is_action_framed(text),
            },
            Trigger::Join => ChatEvent::Join {
                nick: parser::extract_nick(text).to_string(),
                channel: parser::extract_join_channel(text).to_string(),
            },
        }
    }

    /// The chat log line for this event, or `None` for protocol-only events.
    pub fn log_line(&self) -> Option<String> {
        match self {
            ChatEvent::Ping => None,
            ChatEvent::PrivateMessage {
                nick,
                text,
                is_action: true,
            } => Some(format!("* {} {}", nick, text)),
            ChatEvent::PrivateMessage { nick, text, .. } => Some(format!("{}: {}", nick, text)),
            ChatEvent::Join { nick, channel } => Some(format!("{} joined {}", nick, channel)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_line() {
        let event = ChatEvent::from_trigger(Trigger::Privmsg, ":u!h PRIVMSG #test :hi\r\n");
        assert_eq!(
            event,
            ChatEvent::PrivateMessage {
                nick: "u".into(),
                text: "hi".into(),
                is_action: false,
            }
        );
        assert_eq!(event.log_line().as_deref(), Some("u: hi"));
    }

    #[test]
    fn test_action_line() {
        let line = ":alice!u@h PRIVMSG #chan :\x01ACTION waves\x01\r\n";
        let event = ChatEvent::from_trigger(Trigger::Privmsg, line);
        assert_eq!(event.log_line().as_deref(), Some("* alice  waves"));
    }

    #[test]
    fn test_join_line() {
        let event = ChatEvent::from_trigger(Trigger::Join, ":bob!u@h JOIN :#chan\r\n");
        assert_eq!(
            event,
            ChatEvent::Join {
                nick: "bob".into(),
                channel: "#chan".into(),
            }
        );
        assert_eq!(event.log_line().as_deref(), Some("bob joined #chan"));
    }

    #[test]
    fn test_ping_has_no_log_line() {
        let event = ChatEvent::from_trigger(Trigger::Ping, "PING :abc\r\n");
        assert_eq!(event, ChatEvent::Ping);
        assert_eq!(event.log_line(), None);
    }
}
