use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Tokens are minted by the identity service that shares `JWT_SECRET`;
/// this service only verifies them.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::models::{Claims, TokenType};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    pub fn issue(
        secret: &str,
        role: u8,
        employee_id: Option<u64>,
        token_type: TokenType,
        ttl_secs: i64,
    ) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_secs() as i64;

        let claims = Claims {
            user_id: 1,
            sub: "tester".to_string(),
            role,
            exp: (now + ttl_secs) as usize,
            jti: Uuid::new_v4().to_string(),
            token_type,
            employee_id,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token encodes")
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::issue;
    use super::*;
    use crate::models::TokenType;

    #[test]
    fn verifies_with_same_secret_only() {
        let token = issue("s3cret", 2, Some(4), TokenType::Access, 60);

        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_id, Some(4));
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        // Default validation allows 60s of leeway.
        let token = issue("s3cret", 2, None, TokenType::Access, -600);
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
