// crisis keyword triage
// catches obvious emergency language only, this is not a clinical tool

/// Literal phrases whose presence makes a message critical.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "want to die",
    "heart attack",
    "chest pain",
    "can't breathe",
    "unconscious",
    "poison",
    "accident",
    "bleeding heavily",
];

/// Fixed reply for critical messages. The model is never consulted for these.
pub const CRITICAL_RESPONSE: &str = "This seems like a critical situation. Please contact \
emergency services immediately by calling 108. This is an AI assistant and not a substitute \
for a medical professional.";

pub struct Safety {
    pub is_critical: bool,
    pub matched: Option<&'static str>,
}

impl Safety {
    pub fn check(message: &str) -> Self {
        let lower = message.to_lowercase();

        for keyword in CRITICAL_KEYWORDS {
            if lower.contains(keyword) {
                return Self {
                    is_critical: true,
                    matched: Some(keyword),
                };
            }
        }

        Self {
            is_critical: false,
            matched: None,
        }
    }
}
