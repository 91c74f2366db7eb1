use crate::error::IdentityError;

/// Scope-string utilities. Exported without any handler capability.
#[idsrv_derive::exported_type]
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeParser;

impl ScopeParser {
    /// Scope tokens are printable ASCII excluding space, `"` and `\`.
    #[must_use]
    pub fn is_valid(scope: &str) -> bool {
        !scope.is_empty()
            && scope.bytes().all(|b| matches!(b, 0x21 | 0x23..=0x5B | 0x5D..=0x7E))
    }

    /// Validates and deduplicates a configured scope list.
    ///
    /// # Errors
    /// Returns [`IdentityError::InvalidScope`] for the first malformed entry.
    pub fn normalize(scopes: &[String]) -> Result<Vec<String>, IdentityError> {
        let mut normalized: Vec<String> = Vec::with_capacity(scopes.len());
        for scope in scopes.iter().map(|s| s.trim()) {
            if !Self::is_valid(scope) {
                return Err(IdentityError::InvalidScope { scope: scope.to_owned(), context: None });
            }
            if !normalized.iter().any(|s| s == scope) {
                normalized.push(scope.to_owned());
            }
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rejects_malformed_scopes() {
        let ok = vec!["openid".to_owned(), " email ".to_owned(), "openid".to_owned()];
        assert_eq!(ScopeParser::normalize(&ok).expect("valid"), vec!["openid", "email"]);

        let bad = vec!["openid".to_owned(), "with\"quote".to_owned()];
        let err = ScopeParser::normalize(&bad).expect_err("invalid");
        assert!(matches!(err, IdentityError::InvalidScope { ref scope, .. } if scope == "with\"quote"));
    }
}
