use serde::{Deserialize, Serialize};

/// Touchpoint served when a location-based lookup cannot name a regional contact.
pub const NATIONAL_TOUCHPOINT_ID: &str = "0000000999";

const MAX_AREA_LEN: usize = 100;
const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MAX_EMAIL_LEN: usize = 254;

/// Contact details for a single touchpoint. Field names follow the published JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDetail {
    #[serde(rename = "TouchpointID")]
    pub touchpoint_id: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "TelephoneNumber")]
    pub telephone_number: String,
    #[serde(rename = "SMSNumber", default)]
    pub sms_number: String,
    #[serde(rename = "EmailAddress", default)]
    pub email_address: String,
}

impl RoutingDetail {
    /// The national call centre record handed out when graceful degradation applies.
    pub fn national_fallback() -> Self {
        Self {
            touchpoint_id: NATIONAL_TOUCHPOINT_ID.to_string(),
            area: "National Call Centre".to_string(),
            telephone_number: "0800 123456".to_string(),
            sms_number: String::new(),
            email_address: "nationalcareersservice@education.gov.uk".to_string(),
        }
    }

    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if !is_touchpoint_id(&self.touchpoint_id) {
            violations.push(FieldViolation::new(
                "TouchpointID",
                "must be exactly 10 digits",
            ));
        }
        check_required_text(&mut violations, "Area", &self.area, MAX_AREA_LEN);

        if self.telephone_number.trim().is_empty() {
            violations.push(FieldViolation::new("TelephoneNumber", "is required"));
        } else if !is_phone_number(&self.telephone_number) {
            violations.push(FieldViolation::new(
                "TelephoneNumber",
                "must contain only digits, spaces, '+', '(', ')' or '-' (max 20 characters)",
            ));
        }

        if !self.sms_number.is_empty() && !is_phone_number(&self.sms_number) {
            violations.push(FieldViolation::new(
                "SMSNumber",
                "must contain only digits, spaces, '+', '(', ')' or '-' (max 20 characters)",
            ));
        }

        if !self.email_address.is_empty() {
            if self.email_address.chars().count() > MAX_EMAIL_LEN {
                violations.push(FieldViolation::new(
                    "EmailAddress",
                    "must be at most 254 characters",
                ));
            } else if !regex!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_match(&self.email_address) {
                violations.push(FieldViolation::new(
                    "EmailAddress",
                    "must be a valid email address",
                ));
            }
        }

        violations
    }
}

/// Bridge from a local administrative district to the touchpoint that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAuthority {
    #[serde(rename = "LADCode")]
    pub lad_code: String,
    #[serde(rename = "TouchpointID")]
    pub touchpoint_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl LocalAuthority {
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if !regex!(r"^[A-Za-z][0-9]{8}$").is_match(&self.lad_code) {
            violations.push(FieldViolation::new(
                "LADCode",
                "must be a letter followed by 8 digits",
            ));
        }
        if !is_touchpoint_id(&self.touchpoint_id) {
            violations.push(FieldViolation::new(
                "TouchpointID",
                "must be exactly 10 digits",
            ));
        }
        check_required_text(&mut violations, "Name", &self.name, MAX_NAME_LEN);

        violations
    }
}

/// One failed field check, reported back in 422 bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn is_touchpoint_id(value: &str) -> bool {
    regex!(r"^[0-9]{10}$").is_match(value)
}

fn is_phone_number(value: &str) -> bool {
    value.chars().count() <= MAX_PHONE_LEN && regex!(r"^[0-9+() -]+$").is_match(value)
}

fn check_required_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    max_len: usize,
) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(field, "is required"));
    } else if value.chars().count() > max_len {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
}
