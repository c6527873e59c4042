//! Command detection for decoded server text.
//!
//! [`KeywordClassifier`] looks for command names anywhere in the text, so a
//! chat message whose body mentions `PRIVMSG` or `JOIN` also fires those
//! triggers. Swap in another [`EventClassifier`] for stricter tokenizing.

/// A command the connection reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Ping,
    Privmsg,
    Join,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Ping, Trigger::Privmsg, Trigger::Join];

    /// The command name as it appears on the wire.
    pub fn keyword(self) -> &'static str {
        match self {
            Trigger::Ping => "PING",
            Trigger::Privmsg => "PRIVMSG",
            Trigger::Join => "JOIN",
        }
    }
}

/// Decides which triggers a chunk of received text fires.
pub trait EventClassifier: Send {
    /// Each trigger appears at most once, in `Ping`, `Privmsg`, `Join` order.
    fn classify(&self, text: &str) -> Vec<Trigger>;
}

/// Case-sensitive substring match on each command name.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl EventClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Vec<Trigger> {
        Trigger::ALL
            .into_iter()
            .filter(|t| text.contains(t.keyword()))
            .collect()
    }
}
