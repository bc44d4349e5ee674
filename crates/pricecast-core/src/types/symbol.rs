//! Ticker symbols and resolver output.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized market ticker, e.g. `AAPL`, `RELIANCE.NS`, `BRK-B`, `^GSPC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidSymbol {
            symbol: input.to_string(),
            reason: reason.to_string(),
        };

        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(invalid("empty"));
        }
        if normalized.chars().count() > MAX_SYMBOL_LEN {
            return Err(invalid("too long"));
        }
        if let Some(first) = normalized.chars().next() {
            if !(first.is_ascii_alphanumeric() || first == '^') {
                return Err(invalid("must start with a letter, digit or '^'"));
            }
        }
        if let Some(ch) = normalized
            .chars()
            .find(|&ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '=')))
        {
            return Err(invalid(&format!("illegal character '{}'", ch)));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// How a symbol was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// The query itself answered a quote probe.
    DirectHit,
    /// The query was looked up through the symbol-search service.
    Searched {
        exchange: Option<String>,
        name: Option<String>,
    },
}

/// Validated ticker plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub symbol: Symbol,
    pub provenance: Provenance,
}

impl ResolvedSymbol {
    pub fn direct(symbol: Symbol) -> Self {
        Self {
            symbol,
            provenance: Provenance::DirectHit,
        }
    }

    pub fn searched(symbol: Symbol, exchange: Option<String>, name: Option<String>) -> Self {
        Self {
            symbol,
            provenance: Provenance::Searched { exchange, name },
        }
    }

    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    pub fn is_direct_hit(&self) -> bool {
        matches!(self.provenance, Provenance::DirectHit)
    }
}

/// One ranked hit from the symbol-search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub symbol: String,
    pub exchange: Option<String>,
    pub name: Option<String>,
    pub quote_type: Option<String>,
}

impl SearchMatch {
    pub fn new(symbol: impl Into<String>, exchange: Option<&str>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.map(str::to_string),
            name: None,
            quote_type: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(Symbol::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("reliance.ns").unwrap().as_str(), "RELIANCE.NS");
        assert_eq!(Symbol::parse("^gspc").unwrap().as_str(), "^GSPC");
        assert_eq!(Symbol::parse("0700.HK").unwrap().as_str(), "0700.HK");
        assert_eq!(Symbol::parse("eurusd=x").unwrap().as_str(), "EURUSD=X");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Symbol::parse("").is_err());
        assert!(Symbol::parse("   ").is_err());
        assert!(Symbol::parse("Reliance Industries").is_err());
        assert!(Symbol::parse("AAPL$").is_err());
        assert!(Symbol::parse("zzz-not-a-real-company-xyz").is_err());
        assert!(Symbol::parse(".NS").is_err());
    }

    #[test]
    fn test_provenance() {
        let symbol = Symbol::parse("TCS.NS").unwrap();
        assert!(ResolvedSymbol::direct(symbol.clone()).is_direct_hit());
        assert!(!ResolvedSymbol::searched(symbol, Some("NSI".into()), None).is_direct_hit());
    }
}
