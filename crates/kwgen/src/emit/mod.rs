use std::fmt;

use convert_case::{Case, Casing};

use crate::automaton::{Automaton, Stepper, StepperIdx};
use crate::config::GeneratorConfig;
use crate::registry::TokenRegistry;

pub mod c;
pub mod rust;

pub const GENERATED_NOTICE: &str = "generated by kwgen, do not edit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    C,
    Rust,
}

impl Target {
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Target::C => Box::new(c::CBackend),
            Target::Rust => Box::new(rust::RustBackend),
        }
    }

    /// Whether `name` is a keyword of the target language or a name the generated
    /// code already uses.
    pub fn reserves(self, name: &str) -> bool {
        self.backend().reserved_names().contains(&name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::C => write!(f, "c"),
            Target::Rust => write!(f, "rust"),
        }
    }
}

/// One rendered output file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub contents: String,
}

/// The pair of documents produced for one keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    /// Token constants, entry declaration and (for C) stepper prototypes.
    pub interface: Document,
    /// Entry function and stepper bodies.
    pub implementation: Document,
}

/// Everything a backend needs to render a frozen automaton.
pub struct EmitContext<'a> {
    pub automaton: &'a Automaton,
    pub registry: &'a TokenRegistry,
    pub config: &'a GeneratorConfig,
}

impl EmitContext<'_> {
    pub fn stepper_name(&self, idx: StepperIdx) -> String {
        stepper_name(&self.config.prefix, &self.automaton.stepper(idx).prefix)
    }

    pub fn root_name(&self) -> String {
        self.stepper_name(self.automaton.root())
    }

    pub fn steppers(&self) -> impl Iterator<Item = (StepperIdx, &Stepper)> + '_ {
        self.automaton.steppers()
    }
}

// a target language backend; both documents are rendered from the same context
pub trait Backend {
    fn interface_file_name(&self, stem: &str) -> String;
    fn implementation_file_name(&self, stem: &str) -> String;

    /// Language keywords plus the identifiers every generated file uses.
    fn reserved_names(&self) -> &'static [&'static str];

    /// File-scope names the backend derives from the output stem.
    fn stem_names(&self, _stem: &str) -> Vec<String> {
        Vec::new()
    }

    fn emit_interface(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error>;
    fn emit_implementation(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error>;

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<Emitted, fmt::Error> {
        Ok(Emitted {
            interface: Document {
                file_name: self.interface_file_name(&ctx.config.stem),
                contents: self.emit_interface(ctx)?,
            },
            implementation: Document {
                file_name: self.implementation_file_name(&ctx.config.stem),
                contents: self.emit_implementation(ctx)?,
            },
        })
    }
}

/// Name of the stepper for `key_prefix`. ASCII letters and digits are kept, every
/// other byte (including `_`) becomes `_xx` in lowercase hex, so distinct prefixes
/// never share a name.
pub fn stepper_name(prefix: &str, key_prefix: &[u8]) -> String {
    let mut name = format!("{}_step_", prefix);
    for &byte in key_prefix {
        if byte.is_ascii_alphanumeric() {
            name.push(byte as char);
        } else {
            name.push_str(&format!("_{:02x}", byte));
        }
    }
    name
}

/// Identifier derived from an output stem: every byte that is not an ASCII letter or
/// digit separates words, which are then joined in `case`. Empty when the stem has
/// no letters or digits.
pub fn stem_identifier(stem: &str, case: Case) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_case(case)
}

// printable rendering of a keyword for comments in generated code
pub(crate) fn display_keyword(key_prefix: &[u8]) -> String {
    key_prefix.escape_ascii().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_stepper_name() {
        assert_eq!(stepper_name("kw", b""), "kw_step_");
    }

    #[test]
    fn alphanumerics_are_kept() {
        assert_eq!(stepper_name("kw", b"else"), "kw_step_else");
        assert_eq!(stepper_name("lox", b"i32"), "lox_step_i32");
    }

    #[test]
    fn other_bytes_are_escaped() {
        assert_eq!(stepper_name("kw", b"a_b"), "kw_step_a_5fb");
        assert_eq!(stepper_name("kw", b"+="), "kw_step__2b_3d");
        assert_eq!(stepper_name("kw", "é".as_bytes()), "kw_step__c3_a9");
    }

    #[test]
    fn escaping_keeps_names_distinct() {
        // "a_" followed by "5f" must not collide with the escape of "a_"
        assert_ne!(stepper_name("kw", b"a_"), stepper_name("kw", b"a_5f"));
        assert_ne!(stepper_name("kw", b"_"), stepper_name("kw", b"_5f"));
    }

    #[test]
    fn stem_identifiers() {
        assert_eq!(stem_identifier("keyword", Case::UpperSnake), "KEYWORD");
        assert_eq!(stem_identifier("lox.keywords", Case::UpperSnake), "LOX_KEYWORDS");
        assert_eq!(stem_identifier("small-set", Case::Snake), "small_set");
        assert_eq!(stem_identifier("LoxKeywords", Case::Snake), "lox_keywords");
        assert_eq!(stem_identifier("lox_keyword", Case::Snake), "lox_keyword");
        assert_eq!(stem_identifier("--", Case::Snake), "");
    }

    #[test]
    fn reserved_names_depend_on_target() {
        assert!(Target::C.reserves("int"));
        assert!(Target::C.reserves("len"));
        assert!(!Target::C.reserves("NO_MATCH"));
        assert!(!Target::C.reserves("fn"));

        assert!(Target::Rust.reserves("NO_MATCH"));
        assert!(Target::Rust.reserves("fn"));
        assert!(Target::Rust.reserves("self"));
        assert!(!Target::Rust.reserves("int"));

        assert!(!Target::C.reserves("TK_IF"));
        assert!(!Target::Rust.reserves("TK_IF"));
    }

    #[test]
    fn keyword_display() {
        assert_eq!(display_keyword(b"while"), "while");
        assert_eq!(display_keyword(b"a\nb"), "a\\nb");
    }
}
