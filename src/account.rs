use crate::configuration::Settings;
use crate::error::{HarvestError, HarvestResult};
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub secret: String,
    pub token: String,
}

/// Trimmed, non-blank lines of `path`. A missing file reads as empty.
pub async fn read_lines(path: impl AsRef<Path>) -> HarvestResult<Vec<String>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Accounts and the proxy pool, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: Vec<Account>,
    proxies: Vec<String>,
}

impl AccountBook {
    pub fn new(secrets: Vec<String>, tokens: Vec<String>, proxies: Vec<String>) -> HarvestResult<Self> {
        if secrets.is_empty() || tokens.is_empty() {
            return Err(HarvestError::NoCredentials);
        }
        if secrets.len() != tokens.len() {
            return Err(HarvestError::CredentialMismatch {
                secrets: secrets.len(),
                tokens: tokens.len(),
            });
        }

        let accounts = secrets
            .into_iter()
            .zip(tokens)
            .map(|(secret, token)| Account { secret, token })
            .collect();
        Ok(Self { accounts, proxies })
    }

    pub async fn load(settings: &Settings) -> HarvestResult<Self> {
        let secrets = read_lines(&settings.secrets_file).await?;
        let tokens = read_lines(&settings.tokens_file).await?;
        let proxies = read_lines(&settings.proxy_file).await?;
        Self::new(secrets, tokens, proxies)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Proxies are handed out round-robin by account index.
    pub fn proxy_for(&self, index: usize) -> Option<&str> {
        if self.proxies.is_empty() {
            return None;
        }
        Some(self.proxies[index % self.proxies.len()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pairs_secrets_with_tokens_by_index() {
        let book = AccountBook::new(strings(&["s1", "s2"]), strings(&["t1", "t2"]), vec![]).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.accounts()[1],
            Account {
                secret: "s2".into(),
                token: "t2".into()
            }
        );
    }

    #[test]
    fn rejects_empty_credentials() {
        assert!(matches!(
            AccountBook::new(vec![], strings(&["t1"]), vec![]),
            Err(HarvestError::NoCredentials)
        ));
        assert!(matches!(
            AccountBook::new(strings(&["s1"]), vec![], vec![]),
            Err(HarvestError::NoCredentials)
        ));
    }

    #[test]
    fn rejects_mismatched_counts() {
        let err = AccountBook::new(strings(&["s1", "s2"]), strings(&["t1"]), vec![]).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::CredentialMismatch {
                secrets: 2,
                tokens: 1
            }
        ));
    }

    #[test]
    fn proxies_wrap_around() {
        let book = AccountBook::new(
            strings(&["s1", "s2", "s3", "s4", "s5"]),
            strings(&["t1", "t2", "t3", "t4", "t5"]),
            strings(&["p0", "p1"]),
        )
        .unwrap();
        let assigned: Vec<_> = (0..book.len()).map(|i| book.proxy_for(i)).collect();
        assert_eq!(
            assigned,
            vec![Some("p0"), Some("p1"), Some("p0"), Some("p1"), Some("p0")]
        );
    }

    #[test]
    fn empty_pool_assigns_no_proxy() {
        let book = AccountBook::new(strings(&["s1", "s2"]), strings(&["t1", "t2"]), vec![]).unwrap();
        assert_eq!(book.proxy_for(0), None);
        assert_eq!(book.proxy_for(1), None);
    }

    #[tokio::test]
    async fn read_lines_trims_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "abc \n\n  \r\ndef\r\n").unwrap();
        assert_eq!(read_lines(&path).await.unwrap(), strings(&["abc", "def"]));
    }

    #[tokio::test]
    async fn missing_proxy_file_is_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), "s1\ns2\n").unwrap();
        std::fs::write(dir.path().join("token.txt"), "t1\nt2\n").unwrap();

        let settings = Settings {
            secrets_file: dir.path().join("secret.txt"),
            tokens_file: dir.path().join("token.txt"),
            proxy_file: dir.path().join("proxy.txt"),
            ..Settings::default()
        };

        let book = AccountBook::load(&settings).await.unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.proxy_count(), 0);
    }

    #[tokio::test]
    async fn missing_credential_files_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            secrets_file: dir.path().join("secret.txt"),
            tokens_file: dir.path().join("token.txt"),
            proxy_file: dir.path().join("proxy.txt"),
            ..Settings::default()
        };
        assert!(matches!(
            AccountBook::load(&settings).await,
            Err(HarvestError::NoCredentials)
        ));
    }
}
