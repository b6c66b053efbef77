// Lox keyword recognizer, generated at build time from data/keyword_sets/lox.def

pub mod lox_keyword_tokens {
    include!(concat!(env!("OUT_DIR"), "/lox_keyword_tokens.rs"));
}

pub mod lox_keyword {
    include!(concat!(env!("OUT_DIR"), "/lox_keyword.rs"));
}

pub use lox_keyword::lox_keyword;
pub use lox_keyword_tokens::*;

/// Classifies an identifier lexeme: its keyword token, or `None` for a plain identifier.
pub fn keyword_token(lexeme: &str) -> Option<i32> {
    match lox_keyword(lexeme.as_bytes()) {
        NO_MATCH => None,
        token => Some(token),
    }
}
