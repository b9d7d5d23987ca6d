//! Category label catalog
//!
//! Labels are an open set: the engine passes whatever the caller selects to
//! the detector and never validates membership. This catalog lists the labels
//! the bundled detectors are known to understand, plus the default selection
//! of common PII categories.

/// All category labels recognized by the bundled detectors
pub const AVAILABLE_LABELS: &[&str] = &[
    "person",
    "location",
    "street",
    "organization",
    "date",
    "time",
    "phone number",
    "mobile phone number",
    "landline phone number",
    "fax number",
    "email",
    "email address",
    "address",
    "postal code",
    "iban",
    "bank account number",
    "credit card number",
    "credit card expiration date",
    "credit card brand",
    "social security number",
    "tax identification number",
    "health insurance number",
    "health insurance id number",
    "national health insurance number",
    "insurance number",
    "insurance company",
    "passport number",
    "passport_number",
    "passport expiration date",
    "identity card number",
    "identity document number",
    "national id number",
    "driver's license number",
    "vehicle registration number",
    "license plate number",
    "registration number",
    "date of birth",
    "blood type",
    "medical condition",
    "medication",
    "ip address",
    "username",
    "digital signature",
    "social media handle",
    "student id number",
    "flight number",
    "train ticket number",
    "reservation number",
    "transaction number",
    "serial number",
    "visa number",
    "birth certificate number",
    "car brand",
    "car model",
    "colour",
];

/// Labels selected when the caller does not choose any
pub const DEFAULT_SELECTED_LABELS: &[&str] = &[
    "person",
    "organization",
    "phone number",
    "email",
    "address",
    "iban",
    "credit card number",
    "social security number",
];

/// Default labels as owned strings
pub fn default_labels() -> Vec<String> {
    DEFAULT_SELECTED_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Check whether a label is part of the catalog
pub fn is_known_label(label: &str) -> bool {
    AVAILABLE_LABELS.contains(&label)
}

/// Parse a comma-separated label list, trimming whitespace and dropping
/// empties and repeats while keeping first-seen order
pub fn parse_label_list(input: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_catalog() {
        for label in DEFAULT_SELECTED_LABELS {
            assert!(is_known_label(label), "{label} missing from catalog");
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!(!is_known_label("favourite pizza"));
    }

    #[test]
    fn test_parse_label_list() {
        let labels = parse_label_list(" person, email ,,person, phone number ");
        assert_eq!(labels, vec!["person", "email", "phone number"]);
    }

    #[test]
    fn test_default_labels_owned() {
        assert_eq!(default_labels().len(), DEFAULT_SELECTED_LABELS.len());
    }
}
