//! Shared utility functions for cave-server

pub use shared::util::now_millis;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Retention cutoff: `now` minus `months` calendar months (Unix millis)
pub fn retention_cutoff(now: i64, months: u32) -> i64 {
    let Some(now_dt) = chrono::DateTime::from_timestamp_millis(now) else {
        return now;
    };
    now_dt
        .checked_sub_months(chrono::Months::new(months))
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}

/// Trim a string field and reject it when empty
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("cave-secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("cave-secret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_retention_cutoff_calendar_months() {
        // 2024-03-31T00:00:00Z -> 2024-01-31T00:00:00Z
        let now = 1_711_843_200_000;
        assert_eq!(retention_cutoff(now, 2), 1_706_659_200_000);
        assert_eq!(retention_cutoff(now, 0), now);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Milk "), Some("Milk".to_string()));
        assert_eq!(non_empty("   "), None);
    }
}
