//! Builtin pattern table.

use super::countdown::CountdownDetector;
use super::detectors::{CheckedCheckboxDetector, RegexDetector};
use super::PatternDescriptor;
use crate::error::RuleError;

const INFO_BASE: &str = "https://dapde.de/en/dark-patterns-en";

/// An amount with a leading or trailing currency: `€9.99`, `11 GBP`, `5 pounds sterling`.
const MONEY: &str = r"(?:(?:€|\$|£|₹|INR|GBP)\s*\d+(?:\.\d{2})?|\d+(?:\.\d{2})?\s*(?:rupees?|dollars?|€|\$|£|₹|INR|GBP|pounds?(?:\s*sterling)?))";

/// `per month`, `/month`, `a month`, `pm`, `/m`.
const PER_MONTH: &str = r"(?:(?:per|/|a)\s*month|(?:p|/)m)";

/// German amount: `10,99 INR`, `11€`.
const GERMAN_MONEY: &str = r"\d+(?:,\d{2})?\s*(?:INR|€)";

fn info_url(slug: &str) -> String {
    format!("{INFO_BASE}/{slug}-en/")
}

fn as_refs(sources: &[String]) -> Vec<&str> {
    sources.iter().map(String::as_str).collect()
}

fn regex(pattern: &str, name: &str, sources: &[&str]) -> Result<RegexDetector, RuleError> {
    RegexDetector::any_of(name, sources).map_err(|e| RuleError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn countdown() -> Result<PatternDescriptor, RuleError> {
    let temporal = CountdownDetector::new().map_err(|e| RuleError::InvalidRegex {
        pattern: "countdown".to_string(),
        message: e.to_string(),
    })?;
    Ok(PatternDescriptor::new("countdown", "Countdown")
        .info(
            &info_url("countdown"),
            "A timer suggests an offer is only available for a short time, pressuring a quick purchase.",
        )
        .languages(&["en"])
        // 05h:30m:12s
        .detector(regex(
            "countdown",
            "hms-clock",
            &[r"\b\d{1,2}h\s*:\s*\d{1,2}m\s*:\s*\d{1,2}s\b"],
        )?)
        .detector(temporal))
}

fn scarcity() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("scarcity", "Scarcity")
        .info(
            &info_url("scarcity"),
            "Claims that goods are only available in limited numbers, suggesting the product will be gone soon.",
        )
        .languages(&["en"])
        // "Only 5 left", "80% claimed", "last item"
        .detector(regex(
            "scarcity",
            "limited-stock",
            &[r"\d+\s*(?:%|pieces?|pcs\.?|pc\.?|ct\.?|items?)?\s*(?:available|sold|claimed|redeemed|left)|(?:last|final)\s*(?:article|item)"],
        )?))
}

fn social_proof() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("social-proof", "Social Proof")
        .info(
            &info_url("social-proof"),
            "Activity reports or reviews from other customers, often made up or selectively placed.",
        )
        .languages(&["en"])
        // "5 other customers also bought this article"
        // "6 buyers have rated the following products"
        .detector(regex(
            "social-proof",
            "peer-activity",
            &[r"\d+\s*(?:other)?\s*(?:customers?|clients?|buyers?|users?|shoppers?|purchasers?|people)\s*(?:have\s+)?\s*(?:(?:also\s*)?(?:bought|purchased|ordered)|(?:rated|reviewed))\s*(?:this|the\s*following)\s*(?:product|article|item)s?"],
        )?))
}

fn forced_continuity() -> Result<PatternDescriptor, RuleError> {
    let english = [
        // "₹10.99/month after", "11 GBP a month from month 4"
        format!(r"{MONEY}\s*{PER_MONTH}\s*(?:after|from\s*(?:month|day)\s*\d+)"),
        // "$10.99 after 12 months", "9.99 € from day 30"
        format!(r"{MONEY}\s*(?:after\s*(?:the)?\s*\d+(?:th|nd|rd)?\s*(?:months?|days?)|from\s*(?:month|day)\s*\d+)"),
        // "after that $23.99 per month", "then £10pm"
        format!(r"(?:after\s*that|then|afterwards|subsequently)\s*{MONEY}\s*{PER_MONTH}"),
        // "after the 24th months only €23.99"
        format!(r"after\s*(?:the)?\s*\d+(?:th|nd|rd)?\s*months?\s*(?:only|just)?\s*{MONEY}"),
    ];
    let german = [
        // "10,99 INR pro Monat ab dem 12. Monat", "11€ nach 30 Tagen"
        format!(r"{GERMAN_MONEY}\s*(?:(?:pro|im|/)\s*Monat)?\s*(?:ab\s*(?:dem)?\s*\d+\.\s*Monat|nach\s*\d+\s*(?:Monaten|Tagen)|nach\s*(?:einem|1)\s*Monat)"),
        // "anschließend 10,99 € pro Monat"
        format!(r"(?:anschließend|danach)\s*{GERMAN_MONEY}\s*(?:pro|im|/)\s*Monat"),
        // "10,99 € im Monat danach"
        format!(r"{GERMAN_MONEY}\s*(?:pro|im|/)\s*Monat\s*(?:anschließend|danach)"),
        // "ab dem 13. Monat nur 10,99 €"
        format!(r"ab(?:\s*dem)?\s*\d+\.\s*Monat(?:\s*nur)?\s*{GERMAN_MONEY}"),
    ];
    Ok(PatternDescriptor::new("forced-continuity", "Forced Continuity")
        .info(
            &info_url("forced-continuity"),
            "A free or cheap trial silently renews into a paid subscription at a higher price.",
        )
        .languages(&["en", "de"])
        .detector(regex("forced-continuity", "renewal-price-en", &as_refs(&english))?)
        .detector(regex("forced-continuity", "renewal-price-de", &as_refs(&german))?)
        // "I agree to the terms", "subscribe to our newsletter"
        .detector(regex(
            "forced-continuity",
            "bundled-consent",
            &[
                r"\bagree\s*(?:to)?\s*(?:the\s+)?(?:terms|conditions?|privacy|policy)",
                r"\b(?:subscribe|send)\s*(?:me\s+)?(?:to\s+)?(?:(?:our|the)\s+)?(?:newsletters?|updates?)",
            ],
        )?))
}

fn sneaking() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("sneaking", "Sneaking")
        .info(
            &info_url("sneaking"),
            "Costs or commitments are hidden or added without the user's explicit consent.",
        )
        .languages(&["en"])
        .detector(regex(
            "sneaking",
            "hidden-commitment",
            &[r"hidden|trial period|free trial|auto[-\s]?renew|renewal|recurring|subscription|membership"],
        )?)
        .detector(CheckedCheckboxDetector))
}

fn obstruction() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("obstruction", "Obstruction")
        .info(
            &info_url("obstruction"),
            "Access is blocked or made harder than needed to push the user towards paying.",
        )
        .languages(&["en"])
        .detector(regex(
            "obstruction",
            "access-barrier",
            &[r"blocked access|restricted access|limited access|access denied|paywall|authorization required|premium content|members only|exclusive content|obstruction|restricted content"],
        )?))
}

fn misdirection() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("misdirection", "Misdirection")
        .info(
            &info_url("misdirection"),
            "Design or wording steers attention away from the option in the user's interest.",
        )
        .languages(&["en"])
        // "No, I don't want to pay full price"
        .detector(regex(
            "misdirection",
            "confirmshaming",
            &[r"\b(?:no|not|don't)\s*(?:want|like|prefer)\s*to\s*pay\s*full\b"],
        )?)
        // 70% off and above
        .detector(regex(
            "misdirection",
            "steep-discount",
            &[r"\b(?:7[0-9]|[8-9][0-9]|100)%\s*off\b"],
        )?))
}

fn urgency() -> Result<PatternDescriptor, RuleError> {
    Ok(PatternDescriptor::new("urgency", "Urgency")
        .info(
            &info_url("urgency"),
            "Wording creates time pressure so the user decides before thinking it through.",
        )
        .languages(&["en"])
        .detector(regex(
            "urgency",
            "pressure-phrase",
            &[
                r"\bfree delivery if ordered before\b",
                r"\bhurry(?:\s+up)?\b",
                r"\bbuy it now\b",
                r"\blowest price\s+in the year\b",
                r"\blowest price in [0-9]+ days\b",
                r"\bget a free gift with your purchase today only\b",
                r"\bpurchase today\b",
                r"\bfree gift\b",
                r"\blimited time(?: offer)?\b",
                r"\bsign up now(?: to receive a special discount)?\b",
                r"\bspecial discount\b",
            ],
        )?))
}

/// The builtin patterns, in evaluation order.
pub fn builtin_patterns() -> Result<Vec<PatternDescriptor>, RuleError> {
    Ok(vec![
        countdown()?,
        scarcity()?,
        social_proof()?,
        forced_continuity()?,
        sneaking()?,
        obstruction()?,
        misdirection()?,
        urgency()?,
    ])
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
