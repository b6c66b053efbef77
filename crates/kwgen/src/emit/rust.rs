// Rust output, built with `codegen`. The interface is a module of token constants,
// the implementation a sibling module whose steppers match on `split_first`.
// Rust items are visible module-wide, so no prototypes are needed.

use std::fmt;

use codegen::{Block, Function, Scope};
use convert_case::Case;

use crate::automaton::{Stepper, NO_MATCH};

use super::{display_keyword, stem_identifier, Backend, EmitContext, GENERATED_NOTICE};

// strict and reserved keywords, the prelude names the generated matches rely on, and
// the items and bindings every generated module declares
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become",
    "box", "do", "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized",
    "virtual", "yield", "_", "Some", "None", "Option", "NO_MATCH", "token_name", "s",
    "rest", "value",
];

pub struct RustBackend;

impl RustBackend {
    fn module_name(stem: &str) -> String {
        stem_identifier(stem, Case::Snake)
    }

    fn tokens_module_name(stem: &str) -> String {
        format!("{}_tokens", Self::module_name(stem))
    }

    fn stepper_fn(ctx: &EmitContext<'_>, name: &str, stepper: &Stepper) -> Function {
        let mut function = Function::new(name);
        function.arg("s", "&[u8]").ret("i32");
        if !is_snake_case(name) {
            function.allow("non_snake_case");
        }

        let on_end = match &stepper.accept {
            Some(accept) => {
                function.line(format!(
                    "// keyword: {}",
                    display_keyword(&stepper.prefix)
                ));
                accept.token.clone()
            }
            None => "NO_MATCH".to_string(),
        };

        let mut dispatch = Block::new("match s.split_first()");
        dispatch.line(format!("None => {},", on_end));
        for (byte, child) in &stepper.branches {
            dispatch.line(format!(
                "Some((&{}, rest)) => {}(rest),",
                rust_byte_literal(*byte),
                ctx.stepper_name(*child)
            ));
        }
        dispatch.line("_ => NO_MATCH,");
        function.push_block(dispatch);

        function
    }
}

impl Backend for RustBackend {
    fn interface_file_name(&self, stem: &str) -> String {
        format!("{}.rs", Self::tokens_module_name(stem))
    }

    fn implementation_file_name(&self, stem: &str) -> String {
        format!("{}.rs", Self::module_name(stem))
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn emit_interface(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error> {
        let mut scope = Scope::new();
        scope.raw(&format!("// {}", GENERATED_NOTICE));

        let mut constants: Vec<String> = ctx
            .registry
            .enumerate()
            .map(|(name, value)| format!("pub const {}: i32 = {};", name, value))
            .collect();
        constants.push(format!("pub const NO_MATCH: i32 = {};", NO_MATCH));
        scope.raw(&constants.join("\n"));

        // (value) -> (token name) mapping, for diagnostics in the lexer
        let mut token_name = Function::new("token_name");
        token_name
            .vis("pub")
            .arg("value", "i32")
            .ret("Option<&'static str>");

        let mut token_name_match = Block::new("match value");
        ctx.registry.enumerate().for_each(|(name, _)| {
            token_name_match.line(format!("{} => Some(\"{}\"),", name, name));
        });
        token_name_match.line("_ => None,");
        token_name.push_block(token_name_match);
        scope.push_fn(token_name);

        Ok(format!("{}\n", scope.to_string()))
    }

    fn emit_implementation(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error> {
        let mut scope = Scope::new();
        scope.raw(&format!("// {}", GENERATED_NOTICE));
        scope.raw(&format!(
            "use super::{}::*;",
            Self::tokens_module_name(&ctx.config.stem)
        ));

        let mut entry = Function::new(&ctx.config.entry);
        entry
            .vis("pub")
            .arg("s", "&[u8]")
            .ret("i32")
            .line(format!("{}(s)", ctx.root_name()));
        scope.push_fn(entry);

        for (idx, stepper) in ctx.steppers() {
            scope.push_fn(Self::stepper_fn(ctx, &ctx.stepper_name(idx), stepper));
        }

        Ok(format!("{}\n", scope.to_string()))
    }
}

// uppercase keyword bytes and escapes (`__`) trip rustc's non_snake_case lint
fn is_snake_case(name: &str) -> bool {
    !name.chars().any(|c| c.is_ascii_uppercase()) && !name.trim_matches('_').contains("__")
}

fn rust_byte_literal(byte: u8) -> String {
    format!("b'{}'", std::ascii::escape_default(byte))
}
