// C output: a header with token #defines and prototypes for every stepper (so bodies
// can be emitted in any order), and a source file with the bodies.

use std::fmt::{self, Write};

use convert_case::Case;

use crate::automaton::{Stepper, NO_MATCH};

use super::{display_keyword, stem_identifier, Backend, EmitContext, GENERATED_NOTICE};

const INDENT: &str = "    ";

// C99 keywords, then the parameter names of every generated function (a token macro
// with one of these names would rewrite them)
const RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long",
    "register", "restrict", "return", "short", "signed", "sizeof", "static", "struct",
    "switch", "typedef", "union", "unsigned", "void", "volatile", "while", "_Bool",
    "_Complex", "_Imaginary", "s", "len",
];

pub struct CBackend;

impl CBackend {
    fn include_guard(stem: &str) -> String {
        format!("{}_H", stem_identifier(stem, Case::UpperSnake))
    }

    fn signature(name: &str) -> String {
        format!("int {}(const char *s, int len)", name)
    }

    fn write_stepper(
        &self,
        out: &mut String,
        ctx: &EmitContext<'_>,
        name: &str,
        stepper: &Stepper,
    ) -> fmt::Result {
        writeln!(out, "{}", Self::signature(name))?;
        writeln!(out, "{{")?;

        match &stepper.accept {
            Some(accept) => {
                writeln!(
                    out,
                    "{INDENT}/* keyword: {} */",
                    c_comment_text(&display_keyword(&stepper.prefix))
                )?;
                writeln!(out, "{INDENT}if (len == 0)")?;
                writeln!(out, "{INDENT}{INDENT}return {};", accept.token)?;
            }
            None => {
                writeln!(out, "{INDENT}if (len == 0)")?;
                writeln!(out, "{INDENT}{INDENT}return {};", NO_MATCH)?;
            }
        }

        if stepper.branches.is_empty() {
            writeln!(out, "{INDENT}(void)s;")?;
        } else {
            writeln!(out, "{INDENT}switch ((unsigned char)*s) {{")?;
            for (byte, child) in &stepper.branches {
                writeln!(out, "{INDENT}case {}:", c_char_literal(*byte))?;
                writeln!(
                    out,
                    "{INDENT}{INDENT}return {}(s + 1, len - 1);",
                    ctx.stepper_name(*child)
                )?;
            }
            writeln!(out, "{INDENT}}}")?;
        }

        writeln!(out, "{INDENT}return {};", NO_MATCH)?;
        writeln!(out, "}}")
    }
}

impl Backend for CBackend {
    fn interface_file_name(&self, stem: &str) -> String {
        format!("{}.h", stem)
    }

    fn implementation_file_name(&self, stem: &str) -> String {
        format!("{}.c", stem)
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn stem_names(&self, stem: &str) -> Vec<String> {
        vec![Self::include_guard(stem)]
    }

    fn emit_interface(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error> {
        let guard = Self::include_guard(&ctx.config.stem);
        let mut out = String::new();

        writeln!(out, "/* {} */", GENERATED_NOTICE)?;
        writeln!(out, "#ifndef {}", guard)?;
        writeln!(out, "#define {}", guard)?;
        writeln!(out)?;

        for (name, value) in ctx.registry.enumerate() {
            writeln!(out, "#define {} {}", name, value)?;
        }
        writeln!(out)?;

        writeln!(out, "{};", Self::signature(&ctx.config.entry))?;
        writeln!(out)?;

        for (idx, _) in ctx.steppers() {
            writeln!(out, "{};", Self::signature(&ctx.stepper_name(idx)))?;
        }
        writeln!(out)?;

        writeln!(out, "#endif /* {} */", guard)?;
        Ok(out)
    }

    fn emit_implementation(&self, ctx: &EmitContext<'_>) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(out, "/* {} */", GENERATED_NOTICE)?;
        writeln!(
            out,
            "#include \"{}\"",
            self.interface_file_name(&ctx.config.stem)
        )?;
        writeln!(out)?;

        writeln!(out, "{}", Self::signature(&ctx.config.entry))?;
        writeln!(out, "{{")?;
        writeln!(out, "{INDENT}return {}(s, len);", ctx.root_name())?;
        writeln!(out, "}}")?;

        for (idx, stepper) in ctx.steppers() {
            writeln!(out)?;
            self.write_stepper(&mut out, ctx, &ctx.stepper_name(idx), stepper)?;
        }

        Ok(out)
    }
}

// case label for a byte compared against `(unsigned char)*s`
fn c_char_literal(byte: u8) -> String {
    match byte {
        b'\'' => "'\\''".to_string(),
        b'\\' => "'\\\\'".to_string(),
        0x20..=0x7e => format!("'{}'", byte as char),
        _ => format!("0x{:02x}", byte),
    }
}

// no comment delimiters and no trigraphs inside a `/* ... */` comment
fn c_comment_text(text: &str) -> String {
    let text = text.replace("*/", "* /").replace("/*", "/ *");
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '?' && previous == Some('?') {
            out.push('\\');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}
