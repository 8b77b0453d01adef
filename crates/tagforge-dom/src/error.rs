//! Error taxonomy
//!
//! Every error carries a prescription: plain-language remediation steps
//! surfaced alongside the message. Callers can match on the variant or
//! show the combined text to a user.

/// Toolkit error with a remediation prescription
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Input bytes are not valid UTF-8
    #[error("{message}\n\nPrescription:\n{prescription}")]
    Decode { message: String, prescription: String },

    /// Underlying markup parser failure
    #[error("{message}\n\nPrescription:\n{prescription}")]
    Parse { message: String, prescription: String },

    /// Structural violation under the active validation mode
    #[error("{message}\n\nPrescription:\n{prescription}")]
    Validation { message: String, prescription: String },

    /// Value or expression not representable in the tree model
    #[error("{message}\n\nPrescription:\n{prescription}")]
    UnsupportedInput { message: String, prescription: String },

    /// An external checker or service is unavailable
    #[error("{message}\n\nPrescription:\n{prescription}")]
    MissingDependency { message: String, prescription: String },
}

impl ForgeError {
    pub fn decode(message: impl Into<String>, prescription: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            prescription: prescription.into(),
        }
    }

    pub fn parse(message: impl Into<String>, prescription: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            prescription: prescription.into(),
        }
    }

    pub fn validation(message: impl Into<String>, prescription: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            prescription: prescription.into(),
        }
    }

    pub fn unsupported_input(message: impl Into<String>, prescription: impl Into<String>) -> Self {
        Self::UnsupportedInput {
            message: message.into(),
            prescription: prescription.into(),
        }
    }

    pub fn missing_dependency(message: impl Into<String>, prescription: impl Into<String>) -> Self {
        Self::MissingDependency {
            message: message.into(),
            prescription: prescription.into(),
        }
    }

    /// The error message without the prescription
    pub fn message(&self) -> &str {
        match self {
            Self::Decode { message, .. }
            | Self::Parse { message, .. }
            | Self::Validation { message, .. }
            | Self::UnsupportedInput { message, .. }
            | Self::MissingDependency { message, .. } => message,
        }
    }

    /// Remediation steps for this error
    pub fn prescription(&self) -> &str {
        match self {
            Self::Decode { prescription, .. }
            | Self::Parse { prescription, .. }
            | Self::Validation { prescription, .. }
            | Self::UnsupportedInput { prescription, .. }
            | Self::MissingDependency { prescription, .. } => prescription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_prescription() {
        let err = ForgeError::decode("Bytes decoding failed", "1. Provide UTF-8 encoded bytes.");
        let text = err.to_string();
        assert!(text.contains("Bytes decoding failed"));
        assert!(text.contains("Prescription:"));
        assert!(text.contains("1. Provide UTF-8 encoded bytes."));
    }

    #[test]
    fn test_accessors() {
        let err = ForgeError::parse("bad markup", "1. Fix it.");
        assert_eq!(err.message(), "bad markup");
        assert_eq!(err.prescription(), "1. Fix it.");
    }
}
