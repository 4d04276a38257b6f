//! Status-code classification of user service responses.

use http::StatusCode;

use crate::transport::TransportResponse;

/// The kind of request a response answers.
///
/// Lookups distinguish "does not exist" from a service error; creations do
/// not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetUser,
    CreateUser,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetUser => "getUser",
            Self::CreateUser => "createUser",
        }
    }

    /// Prefix of the error message raised when this operation fails upstream.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::GetUser => "Could not fetch user",
            Self::CreateUser => "Could not create user",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// `200`, with the body to decode.
    Success(String),
    /// `404` on a lookup.
    NotFound,
    /// Anything else, kept for diagnostics.
    UnexpectedFailure { status: StatusCode, body: String },
}

/// Classify a response for the given operation.
pub fn classify(response: TransportResponse, operation: Operation) -> Classified {
    match (response.status, operation) {
        (StatusCode::OK, _) => Classified::Success(response.body),
        (StatusCode::NOT_FOUND, Operation::GetUser) => Classified::NotFound,
        (status, _) => Classified::UnexpectedFailure {
            status,
            body: response.body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse::new(StatusCode::from_u16(status).unwrap(), body)
    }

    #[test]
    fn test_ok_is_success_for_both_operations() {
        for op in [Operation::GetUser, Operation::CreateUser] {
            assert_eq!(
                classify(response(200, "{}"), op),
                Classified::Success("{}".to_string())
            );
        }
    }

    #[test]
    fn test_not_found_only_for_lookup() {
        assert_eq!(
            classify(response(404, ""), Operation::GetUser),
            Classified::NotFound
        );
        assert_eq!(
            classify(response(404, "missing"), Operation::CreateUser),
            Classified::UnexpectedFailure {
                status: StatusCode::NOT_FOUND,
                body: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_other_success_codes_are_unexpected() {
        // Only 200 counts; 201 and 204 are not part of the contract.
        for status in [201, 204, 302] {
            assert!(matches!(
                classify(response(status, ""), Operation::CreateUser),
                Classified::UnexpectedFailure { .. }
            ));
        }
    }

    #[test]
    fn test_server_error_keeps_status_and_body() {
        let classified = classify(response(500, "upstream exploded"), Operation::GetUser);
        assert_eq!(
            classified,
            Classified::UnexpectedFailure {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "upstream exploded".to_string(),
            }
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::GetUser.to_string(), "getUser");
        assert_eq!(Operation::CreateUser.failure_message(), "Could not create user");
    }
}
