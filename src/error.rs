use thiserror::Error;

/// Failure modes of the remote chat gateway.
///
/// The backend reports application-level failures as `{"error": "..."}`
/// bodies; everything else (transport failures, unexpected status codes,
/// bodies that do not decode) is indistinguishable from the server being
/// unreachable as far as the user is concerned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, offline).
    #[error("Не удалось подключиться к серверу")]
    Network,

    /// Non-2xx status with no parseable error body.
    #[error("Ошибка сервера: {0}")]
    Http(u16),

    /// The server answered with an application-level error message.
    /// Shown to the user verbatim.
    #[error("{0}")]
    Server(String),

    /// The response body was not the JSON shape we expected. Treated the
    /// same as unreachable when surfaced to the user.
    #[error("Не удалось подключиться к серверу")]
    Decode,
}

impl ApiError {
    /// Message suitable for an inline banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_shown_verbatim() {
        let err = ApiError::Server("Неверный логин или пароль".to_string());
        assert_eq!(err.user_message(), "Неверный логин или пароль");
    }

    #[test]
    fn test_network_and_decode_collapse_to_unreachable() {
        assert_eq!(ApiError::Network.user_message(), ApiError::Decode.user_message());
    }

    #[test]
    fn test_http_status_included() {
        assert!(ApiError::Http(502).user_message().contains("502"));
    }
}
