/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Canonical form used for case-insensitive username comparison
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice "), "alice");
        assert_eq!(normalize_username("BOB"), "bob");
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01 UTC
        assert!(now_millis() > 1_704_067_200_000);
    }
}
