use vce_core::ID;
use vce_core::Unique;

/// Identity-provider account. Shares its id with the [`Principal`](crate::Principal)
/// profile created at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: ID<Self>,
    email: String,
    disabled: bool,
    revoked_before: Option<i64>,
}

impl Account {
    pub fn new(id: ID<Self>, email: String) -> Self {
        Self {
            id,
            email,
            disabled: false,
            revoked_before: None,
        }
    }
    pub fn with(mut self, disabled: bool, revoked_before: Option<i64>) -> Self {
        self.disabled = disabled;
        self.revoked_before = revoked_before;
        self
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn disabled(&self) -> bool {
        self.disabled
    }
    /// Unix milliseconds; credentials issued strictly before this are invalid.
    pub fn revoked_before(&self) -> Option<i64> {
        self.revoked_before
    }
    /// Whether a credential issued at `issued` (millis) predates the marker.
    pub fn revokes(&self, issued: i64) -> bool {
        self.revoked_before.is_some_and(|before| issued < before)
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id.clone()
    }
}

/// Loose shape check. Deliverability is the provider's business.
pub fn plausible(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use vce_database::*;

    impl Schema for Account {
        fn name() -> &'static str {
            ACCOUNTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ACCOUNTS,
                " (
                    id              TEXT PRIMARY KEY,
                    email           TEXT NOT NULL,
                    disabled        BOOLEAN NOT NULL DEFAULT FALSE,
                    revoked_before  BIGINT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_email ON ",
                ACCOUNTS,
                " (lower(email));"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revocation_marker_spares_credentials_issued_at_or_after() {
        let account = Account::new(ID::from("u1"), "a@x.com".into()).with(false, Some(100));
        assert!(account.revokes(99));
        assert!(!account.revokes(100));
        assert!(!account.revokes(101));
        assert!(!Account::new(ID::from("u1"), "a@x.com".into()).revokes(0));
    }

    #[test]
    fn email_shapes() {
        assert!(plausible("a@x.com"));
        assert!(!plausible("a@x"));
        assert!(!plausible("@x.com"));
        assert!(!plausible("a b@x.com"));
        assert!(!plausible("a@@x.com"));
        assert!(!plausible("ax.com"));
    }

    #[cfg(feature = "database")]
    #[test]
    fn account_emails_are_unique_ignoring_case() {
        use vce_database::Schema;
        assert!(!Account::creates().contains("UNIQUE"));
        assert!(Account::indices().contains("CREATE UNIQUE INDEX"));
        assert!(Account::indices().contains("(lower(email))"));
    }
}
