use convert_case::Case;
use thiserror::Error;

use crate::emit::{stem_identifier, stepper_name, Target};
use crate::registry::DEFAULT_TOKEN_BASE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("entry function name `{0}` is not a valid identifier")]
    InvalidEntry(String),
    #[error("stepper prefix `{0}` is not a valid identifier")]
    InvalidPrefix(String),
    #[error("output stem `{0}` does not give a valid identifier")]
    InvalidStem(String),
    #[error("token name `{0}` is not a valid identifier")]
    InvalidTokenName(String),
    #[error("`{name}` is reserved in {target} output")]
    Reserved { name: String, target: Target },
    #[error("`{name}` clashes with a generated name")]
    NameClash { name: String },
    #[error("token base {0} is negative, values would collide with the no-match sentinel")]
    NegativeBase(i32),
}

/// Knobs for one generation run. `Default` matches the command line defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub target: Target,
    /// Output file stem, e.g. `keyword` for `keyword.h` / `keyword.c`.
    pub stem: String,
    /// Name of the single public recognizer function.
    pub entry: String,
    /// Steppers are named `<prefix>_step_<mangled keyword prefix>`.
    pub prefix: String,
    pub base: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            target: Target::C,
            stem: "keyword".to_string(),
            entry: "recognize_keyword".to_string(),
            prefix: "kw".to_string(),
            base: DEFAULT_TOKEN_BASE,
        }
    }
}

impl GeneratorConfig {
    pub fn with_stem(&self, stem: &str) -> GeneratorConfig {
        GeneratorConfig {
            stem: stem.to_string(),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier(&self.prefix) {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }
        if !is_identifier(&self.entry) {
            return Err(ConfigError::InvalidEntry(self.entry.clone()));
        }
        self.check_free(&self.entry)?;

        // the stem names the include guard and the Rust modules
        let stem_ident = stem_identifier(&self.stem, Case::Snake);
        if !is_identifier(&stem_ident) || self.target.reserves(&stem_ident) {
            return Err(ConfigError::InvalidStem(self.stem.clone()));
        }

        if self.base < 0 {
            return Err(ConfigError::NegativeBase(self.base));
        }
        Ok(())
    }

    /// Checks that a token constant called `name` compiles next to the generated code
    /// for this configuration.
    pub fn check_token_name(&self, name: &str) -> Result<(), ConfigError> {
        if !is_identifier(name) {
            return Err(ConfigError::InvalidTokenName(name.to_string()));
        }
        self.check_free(name)?;
        if name == self.entry {
            return Err(ConfigError::NameClash {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    // not a keyword, not a stepper, not a name derived from the stem
    fn check_free(&self, name: &str) -> Result<(), ConfigError> {
        if self.target.reserves(name) {
            return Err(ConfigError::Reserved {
                name: name.to_string(),
                target: self.target,
            });
        }
        let clashes = name.starts_with(&stepper_name(&self.prefix, b""))
            || self
                .target
                .backend()
                .stem_names(&self.stem)
                .iter()
                .any(|taken| taken == name);
        if clashes {
            return Err(ConfigError::NameClash {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

// plain `[A-Za-z_][A-Za-z0-9_]*`; reserved words are checked per target
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
