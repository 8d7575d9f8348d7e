//! Canned-response chat assistant.
//!
//! A boundary collaborator, deliberately kept dumb: free text maps to one
//! of a handful of canned replies via keyword matching. The only state is
//! a memo of the last query; the responder knows nothing about sessions,
//! locks, or operations.

/// Topic a query was matched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChatTopic {
    /// Holdings and balances.
    Portfolio,
    /// Prices and trends.
    Market,
    /// Price alerts.
    Alerts,
    /// Trading strategies.
    Strategy,
    /// News and updates.
    News,
    /// Capabilities overview.
    Help,
    /// Nothing matched.
    Fallback,
}

/// A canned reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Matched topic.
    pub topic: ChatTopic,
    /// Reply text.
    pub message: &'static str,
    /// Follow-up suggestions for the UI.
    pub suggestions: &'static [&'static str],
}

/// Keyword-matching responder with a last-query memo.
#[derive(Debug, Default)]
pub struct ChatResponder {
    last_query: Option<String>,
}

impl ChatResponder {
    /// Creates a responder with an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent query, if any.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Maps free text to a canned reply and memoizes the query.
    pub fn respond(&mut self, input: &str) -> ChatReply {
        self.last_query = Some(input.to_string());
        respond(input)
    }
}

/// Pure mapping from free text to a canned reply.
#[must_use]
pub fn respond(input: &str) -> ChatReply {
    let input = input.to_lowercase();
    let topic = if matches_any(&input, &["portfolio", "holdings", "balance", "assets"]) {
        ChatTopic::Portfolio
    } else if matches_any(&input, &["market", "trend", "price", "bitcoin", "ethereum"]) {
        ChatTopic::Market
    } else if matches_any(&input, &["alert", "notification"]) {
        ChatTopic::Alerts
    } else if matches_any(&input, &["strategy", "trading", "buy", "sell", "dca", "hodl"]) {
        ChatTopic::Strategy
    } else if matches_any(&input, &["news", "update", "latest"]) {
        ChatTopic::News
    } else if matches_any(&input, &["help", "what can you do", "assist"]) {
        ChatTopic::Help
    } else {
        ChatTopic::Fallback
    };
    reply_for(topic)
}

fn matches_any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| input.contains(keyword))
}

const fn reply_for(topic: ChatTopic) -> ChatReply {
    match topic {
        ChatTopic::Portfolio => ChatReply {
            topic,
            message: "Here's your portfolio overview: total value, 24h change, and your top holdings are on the dashboard.",
            suggestions: &["Performance analysis", "Risk assessment", "Rebalance suggestions"],
        },
        ChatTopic::Market => ChatReply {
            topic,
            message: "Market overview: BTC and ETH lead the majors; overall momentum is bullish.",
            suggestions: &["BTC analysis", "ETH analysis", "Set alerts"],
        },
        ChatTopic::Alerts => ChatReply {
            topic,
            message: "I can help you set up price alerts. Tell me the asset and your target price.",
            suggestions: &["BTC alert", "ETH alert", "View my alerts"],
        },
        ChatTopic::Strategy => ChatReply {
            topic,
            message: "Popular strategies: DCA for beginners, swing trading for the patient, HODL for believers.",
            suggestions: &["DCA details", "Swing trading", "Risk management"],
        },
        ChatTopic::News => ChatReply {
            topic,
            message: "Latest: ETF chatter continues, protocol upgrades landed, institutional adoption keeps climbing.",
            suggestions: &["ETF details", "DeFi news", "Regulation updates"],
        },
        ChatTopic::Help => ChatReply {
            topic,
            message: "I can assist with portfolio analysis, market trends, price alerts, trading strategies, and news.",
            suggestions: &["Portfolio check", "Market trends", "Set alerts", "Trading tips"],
        },
        ChatTopic::Fallback => ChatReply {
            topic,
            message: "I'm here to help with crypto trading! Ask me about your portfolio, market trends, alerts, strategies, or news.",
            suggestions: &["Show my portfolio", "Market trends", "Set price alert"],
        },
    }
}
