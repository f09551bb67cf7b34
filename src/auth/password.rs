//! Password hashing and strength rules, backed by bcrypt.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// One-way, salted hash of a plaintext password.
pub fn hash_password(plain: &str) -> Result<String, BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Constant-time comparison against a stored hash. A mismatch is the
/// expected negative path (`Ok(false)`); a malformed stored hash surfaces
/// as `Err` so it is never silently treated as "wrong password".
pub fn verify_password(stored_hash: &str, plain: &str) -> Result<bool, BcryptError> {
    verify(plain, stored_hash)
}

/// Strength rules applied to every password chosen through the API:
/// at least 8 characters, one uppercase, one lowercase, one digit.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("A senha deve ter pelo menos 8 caracteres");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("A senha deve conter pelo menos uma letra maiúscula");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("A senha deve conter pelo menos uma letra minúscula");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("A senha deve conter pelo menos um número");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        // low cost keeps the test fast; production path uses DEFAULT_COST
        let hashed = bcrypt::hash("Senha123", 4).unwrap();
        assert!(verify_password(&hashed, "Senha123").unwrap());
        assert!(!verify_password(&hashed, "Senha124").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("not-a-bcrypt-hash", "whatever").is_err());
    }

    #[test]
    fn strength_rules() {
        assert!(validate_password("Senha123").is_ok());
        assert!(validate_password("curta1A").is_err()); // 7 chars
        assert!(validate_password("semnumeroA").is_err());
        assert!(validate_password("sem_maiuscula1").is_err());
        assert!(validate_password("SEM_MINUSCULA1").is_err());
    }
}
