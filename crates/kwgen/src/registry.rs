use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use kwgen_util::make_type_idx;

pub const DEFAULT_TOKEN_BASE: i32 = 1024;

#[derive(Debug, Clone)]
pub struct Token {
    pub name: String,
}

make_type_idx!(pub TokenId, Token);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no value left for token `{name}`: base {base} plus {index} does not fit in an i32")]
    ValueOverflow { name: String, base: i32, index: usize },
}

/// Deduplicated set of declared token names.
///
/// Tokens keep first-seen order, so the constant assigned to each one is
/// `base + registration index` and stays the same from run to run.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    by_name: FxHashMap<String, TokenId>,
    base: i32,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_BASE)
    }
}

impl TokenRegistry {
    pub fn new(base: i32) -> TokenRegistry {
        TokenRegistry {
            tokens: Vec::new(),
            by_name: FxHashMap::default(),
            base,
        }
    }

    // registering twice is a no-op and returns the existing id
    pub fn register(&mut self, name: &str) -> Result<TokenId, RegistryError> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }

        let index = self.tokens.len();
        let value = i32::try_from(index)
            .ok()
            .and_then(|offset| self.base.checked_add(offset))
            .ok_or_else(|| RegistryError::ValueOverflow {
                name: name.to_string(),
                base: self.base,
                index,
            })?;

        let id = TokenId::from_push(
            &mut self.tokens,
            Token {
                name: name.to_string(),
            },
        );
        self.by_name.insert(name.to_string(), id);
        debug!(token = name, value, "registered token");
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<TokenId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TokenId) -> &str {
        &self.tokens[id].name
    }

    // `register` only hands out ids whose value fits
    pub fn value(&self, id: TokenId) -> i32 {
        self.base + id.as_usize() as i32
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    /// Every declared token with its assigned constant, in registration order.
    pub fn enumerate(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (token.name.as_str(), self.base + idx as i32))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
