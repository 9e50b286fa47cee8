use std::any::Any;

use super::domain::FieldViolation;
use super::postcodes::PostcodeClientError;
use super::store::StoreError;

/// Typed failure raised anywhere in the resolution chain and carried to the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("postcode '{0}' was not recognised by the postcode service")]
    InvalidPostcode(String),
    #[error("{0}")]
    NoContent(String),
    #[error("{0}")]
    ConflictingResource(String),
    #[error("submitted record failed validation")]
    UnprocessableEntity(Vec<FieldViolation>),
    #[error("{0}")]
    AccessForbidden(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("postcode service call failed: {0}")]
    PostcodeLookup(#[source] PostcodeClientError),
    #[error("document store call failed: {0}")]
    Store(#[source] StoreError),
    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

/// The concrete kind of a [`Fault`]; mapping tables are keyed on this and matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    MalformedRequest,
    InvalidPostcode,
    NoContent,
    ConflictingResource,
    UnprocessableEntity,
    AccessForbidden,
    Unauthorized,
    PostcodeApi,
    PostcodeEmptyResponse,
    PostcodeTransport,
    Store,
    Unexpected,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::MalformedRequest(_) => FaultKind::MalformedRequest,
            Fault::InvalidPostcode(_) => FaultKind::InvalidPostcode,
            Fault::NoContent(_) => FaultKind::NoContent,
            Fault::ConflictingResource(_) => FaultKind::ConflictingResource,
            Fault::UnprocessableEntity(_) => FaultKind::UnprocessableEntity,
            Fault::AccessForbidden(_) => FaultKind::AccessForbidden,
            Fault::Unauthorized => FaultKind::Unauthorized,
            Fault::PostcodeLookup(PostcodeClientError::Api { .. }) => FaultKind::PostcodeApi,
            Fault::PostcodeLookup(PostcodeClientError::EmptyResponse { .. }) => {
                FaultKind::PostcodeEmptyResponse
            }
            Fault::PostcodeLookup(_) => FaultKind::PostcodeTransport,
            Fault::Store(_) => FaultKind::Store,
            Fault::Unexpected { .. } => FaultKind::Unexpected,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Fault::MalformedRequest(message.into())
    }

    pub fn no_content(message: impl Into<String>) -> Self {
        Fault::NoContent(message.into())
    }

    /// Converts a caught panic payload into a fault so it can be mapped like any other failure.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "operation panicked".to_string()
        };
        Fault::Unexpected { message }
    }
}

impl From<PostcodeClientError> for Fault {
    fn from(value: PostcodeClientError) -> Self {
        Fault::PostcodeLookup(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postcode_errors_keep_distinct_kinds() {
        let api = Fault::from(PostcodeClientError::Api {
            status: 500,
            message: "upstream".to_string(),
        });
        let empty = Fault::from(PostcodeClientError::EmptyResponse {
            endpoint: "lookup".to_string(),
        });
        let decode = Fault::from(PostcodeClientError::Decode("bad json".to_string()));

        assert_eq!(api.kind(), FaultKind::PostcodeApi);
        assert_eq!(empty.kind(), FaultKind::PostcodeEmptyResponse);
        assert_eq!(decode.kind(), FaultKind::PostcodeTransport);
    }

    #[test]
    fn panic_payloads_become_unexpected_faults() {
        let fault = Fault::from_panic(Box::new("attempt to divide by zero"));
        assert_eq!(fault.kind(), FaultKind::Unexpected);
        assert_eq!(
            fault.to_string(),
            "unexpected failure: attempt to divide by zero"
        );

        let owned = Fault::from_panic(Box::new(String::from("boom")));
        assert_eq!(owned.to_string(), "unexpected failure: boom");
    }
}
