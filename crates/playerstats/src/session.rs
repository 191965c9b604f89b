use crate::ident;
use crate::{Error, Result};

/// Name of the shared table when no session is given
pub const DEFAULT_TABLE: &str = "PlayerData";

/// Owns the table namespace a run reads and writes
///
/// Without a session name every run shares `PlayerData`. A named session
/// writes to `PlayerData_<name>` so overlapping users do not replace each
/// other's uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    table: String,
}

impl Session {
    pub fn shared(base: &str) -> Result<Self> {
        ident::validate_table(base)?;
        Ok(Self {
            table: base.to_string(),
        })
    }

    pub fn named(base: &str, name: &str) -> Result<Self> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidIdentifier(name.to_string()));
        }
        let table = format!("{base}_{name}");
        ident::validate_table(&table)?;
        Ok(Self { table })
    }

    /// Pick shared or named based on an optional session name
    pub fn resolve(base: &str, name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => Self::named(base, name),
            None => Self::shared(base),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(Session::default().table(), "PlayerData");
        assert_eq!(Session::resolve("PlayerData", None).unwrap(), Session::default());
        assert_eq!(
            Session::resolve("PlayerData", Some("alice_2")).unwrap().table(),
            "PlayerData_alice_2"
        );
        assert!(Session::named("PlayerData", "bad name").is_err());
        assert!(Session::named("PlayerData", "").is_err());
        assert!(Session::shared("Player Data").is_err());
    }
}
