// Keyword set definition format:
//
// {
// <token name>          one per line
// }
// <keyword> <token>     whitespace separated, any number of lines
//
// Blank lines inside the token block and after it are skipped.

use thiserror::Error;

use crate::config::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordDef {
    pub keyword: String,
    pub token: String,
    /// 1-based line in the definition file
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSetDef {
    pub name: String,
    pub tokens: Vec<String>,
    pub keywords: Vec<KeywordDef>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeywordDefError {
    #[error("expect {{")]
    MissingOpenBrace,
    #[error("expect }}")]
    MissingCloseBrace,
    #[error("line {line}: token name `{name}` is not a valid identifier")]
    InvalidTokenName { line: usize, name: String },
    #[error("line {line}: expect key - value pair for each line, but got: {text}")]
    MalformedKeywordLine { line: usize, text: String },
    #[error("line {line}: keyword `{keyword}` maps to undeclared token `{token}`")]
    UndeclaredToken {
        line: usize,
        keyword: String,
        token: String,
    },
}

pub fn parse_keyword_def(def_name: String, def_string: &str) -> Result<KeywordSetDef, KeywordDefError> {
    let mut lines = def_string.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    match lines.next() {
        Some((_, first)) if first.trim_end_matches('\r') == "{" => {}
        _ => return Err(KeywordDefError::MissingOpenBrace),
    }

    let mut tokens = Vec::new();
    let mut closed = false;
    for (line_no, line) in lines.by_ref() {
        // exactly `}`, surrounding whitespace makes it a token line
        if line.trim_end_matches('\r') == "}" {
            closed = true;
            break;
        }
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        if !is_identifier(name) {
            return Err(KeywordDefError::InvalidTokenName {
                line: line_no,
                name: name.to_string(),
            });
        }
        tokens.push(name.to_string());
    }

    if !closed {
        return Err(KeywordDefError::MissingCloseBrace);
    }

    let mut keywords = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [keyword, token] => {
                if !tokens.iter().any(|declared| declared == token) {
                    return Err(KeywordDefError::UndeclaredToken {
                        line: line_no,
                        keyword: keyword.to_string(),
                        token: token.to_string(),
                    });
                }
                keywords.push(KeywordDef {
                    keyword: keyword.to_string(),
                    token: token.to_string(),
                    line: line_no,
                });
            }
            _ => {
                return Err(KeywordDefError::MalformedKeywordLine {
                    line: line_no,
                    text: line.to_string(),
                })
            }
        }
    }

    Ok(KeywordSetDef {
        name: def_name,
        tokens,
        keywords,
    })
}
