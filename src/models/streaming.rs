//! Realtime API authentication.

use chrono::{DateTime, Utc};

crate::model! {
    /// Short-lived credentials for the realtime API.
    pub struct Token {
        /// Access token
        pub token: String,
        /// User the token belongs to
        pub user_id: String,
        /// Expiry, sent as epoch milliseconds
        pub expires_at: DateTime<Utc>,
    }
}

impl Token {
    /// Returns `true` once the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_token_epoch_expiry() {
        let token = Token::from_data(&json!({
            "token": "eyJhbGciOi",
            "user_id": "usr_qyGFTww6KpV7FJm7VPJmbz4ymbSWH6PDqg",
            "expires_at": 1644871443759_i64
        }))
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2022, 2, 14, 20, 44, 3).unwrap()
            + chrono::Duration::milliseconds(759);
        assert_eq!(token.expires_at, expected);
        assert!(token.is_expired());
    }
}
