/// Category of a free-text location expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionCategory {
    Unknown,
    Town,
    Outward,
    Postcode,
}

impl ExpressionCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExpressionCategory::Unknown => "unknown",
            ExpressionCategory::Town => "town",
            ExpressionCategory::Outward => "outward code",
            ExpressionCategory::Postcode => "postcode",
        }
    }
}

/// Classifies `candidate` as a full postcode, an outward code, or a town name, tried in that
/// order. The input is matched as given: surrounding whitespace makes it `Unknown`.
pub fn classify(candidate: &str) -> ExpressionCategory {
    if is_postcode(candidate) {
        ExpressionCategory::Postcode
    } else if is_outward_code(candidate) {
        ExpressionCategory::Outward
    } else if is_town(candidate) {
        ExpressionCategory::Town
    } else {
        ExpressionCategory::Unknown
    }
}

fn is_postcode(candidate: &str) -> bool {
    regex!(r"^(?i:GIR ?0AA|[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2})$").is_match(candidate)
}

fn is_outward_code(candidate: &str) -> bool {
    regex!(r"^(?i:GIR|[A-Z]{1,2}[0-9][A-Z0-9]?)$").is_match(candidate)
}

fn is_town(candidate: &str) -> bool {
    regex!(r"^[A-Za-z]+(?:(?:['’,-] ?| )[A-Za-z]+)*$").is_match(candidate)
}
