// Builds the generated C with the system compiler and runs it against the in-process
// automaton. Skipped when no C compiler is installed.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use kwgen::{Generator, GeneratorConfig, Target, NO_MATCH};
use tempfile::tempdir;

const LOX_KEYWORDS: &[(&str, &str)] = &[
    ("and", "TK_AND"),
    ("class", "TK_CLASS"),
    ("else", "TK_ELSE"),
    ("false", "TK_FALSE"),
    ("for", "TK_FOR"),
    ("fun", "TK_FUN"),
    ("if", "TK_IF"),
    ("nil", "TK_NIL"),
    ("or", "TK_OR"),
    ("print", "TK_PRINT"),
    ("return", "TK_RETURN"),
    ("super", "TK_SUPER"),
    ("this", "TK_THIS"),
    ("true", "TK_TRUE"),
    ("var", "TK_VAR"),
    ("while", "TK_WHILE"),
];

fn c_compiler() -> Option<String> {
    let cc = env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let version = Command::new(&cc).arg("--version").output().ok()?;
    version.status.success().then_some(cc)
}

fn generator(config: GeneratorConfig, pairs: &[(&str, &str)]) -> Generator {
    let mut generator = Generator::new(config).unwrap();
    for (_, token) in pairs {
        generator.register_token(token).unwrap();
    }
    for (keyword, token) in pairs {
        generator.add_keyword(keyword, token).unwrap();
    }
    generator
}

// prints one result per line: the entry on every word in full, then each expression
fn driver_source(header: &str, entry: &str, words: &[&str], expressions: &[String]) -> String {
    let words = words
        .iter()
        .map(|word| format!("\"{}\"", word))
        .collect::<Vec<_>>()
        .join(", ");
    let prints: String = expressions
        .iter()
        .map(|expression| format!("    printf(\"%d\\n\", {});\n", expression))
        .collect();

    format!(
        "\
#include <stdio.h>
#include <string.h>
#include \"{header}\"

static const char *words[] = {{ {words} }};

int main(void)
{{
    size_t i;
    for (i = 0; i < sizeof(words) / sizeof(words[0]); i++)
        printf(\"%d\\n\", {entry}(words[i], (int)strlen(words[i])));
{prints}    return 0;
}}
"
    )
}

fn compile_and_run(dir: &Path, generator: &Generator, driver: &str) -> Option<Vec<i32>> {
    let Some(cc) = c_compiler() else {
        eprintln!("no C compiler found, skipping");
        return None;
    };

    let written = generator.write(dir).unwrap();
    let source = written
        .iter()
        .find(|path| path.extension().is_some_and(|ext| ext == "c"))
        .cloned()
        .expect("C backend writes a source file");

    let driver_file = dir.join("driver.c");
    fs::write(&driver_file, driver).unwrap();

    let binary: PathBuf = dir.join("keyword_test");
    let compile = Command::new(&cc)
        .args(["-std=c99", "-Wall", "-Werror", "-o"])
        .arg(&binary)
        .arg(&source)
        .arg(&driver_file)
        .output()
        .expect("unable to launch compiler");
    assert!(
        compile.status.success(),
        "generated C does not compile:\n{}",
        String::from_utf8_lossy(&compile.stderr)
    );

    let run = Command::new(&binary).output().expect("unable to launch executable");
    assert!(run.status.success());
    let stdout = String::from_utf8(run.stdout).unwrap();
    Some(stdout.lines().map(|line| line.parse().unwrap()).collect())
}

#[test]
fn if_else_scenario_in_c() {
    let dir = tempdir().unwrap();
    let generator = generator(
        GeneratorConfig::default(),
        &[("if", "TOKEN_IF"), ("else", "TOKEN_ELSE")],
    );
    let automaton = generator.automaton();
    let if_value = automaton.recognize(b"if");
    let else_value = automaton.recognize(b"else");
    assert!(if_value >= 1024 && else_value >= 1024 && if_value != else_value);

    let driver = driver_source(
        "keyword.h",
        "recognize_keyword",
        &["if", "i", "iff", "else", ""],
        &[
            "recognize_keyword(\"iffy\", 2)".to_string(),
            "recognize_keyword(\"elsewhere\", 4)".to_string(),
            "TOKEN_IF".to_string(),
            "TOKEN_ELSE".to_string(),
        ],
    );
    let Some(results) = compile_and_run(dir.path(), &generator, &driver) else {
        return;
    };

    assert_eq!(
        results,
        vec![
            // whole words
            if_value,
            NO_MATCH,
            NO_MATCH,
            else_value,
            NO_MATCH,
            // length windows
            if_value,
            else_value,
            // header constants
            if_value,
            else_value,
        ]
    );
}

#[test]
fn lox_recognizer_agrees_with_automaton() {
    let dir = tempdir().unwrap();
    let config = GeneratorConfig {
        stem: "lox.keywords".to_string(),
        entry: "lox_keyword".to_string(),
        prefix: "lox".to_string(),
        ..GeneratorConfig::default()
    };
    let generator = generator(config, LOX_KEYWORDS);
    let automaton = generator.automaton();

    let mut words: Vec<String> = Vec::new();
    for (keyword, _) in LOX_KEYWORDS {
        for end in 0..=keyword.len() {
            words.push(keyword[..end].to_string());
        }
        words.push(format!("{}s", keyword));
        words.push(keyword.to_uppercase());
    }
    words.extend(["nokeyword", "whilst", "cla55"].map(String::from));
    let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();

    let driver = driver_source("lox.keywords.h", "lox_keyword", &word_refs, &[]);
    let Some(results) = compile_and_run(dir.path(), &generator, &driver) else {
        return;
    };

    let expected: Vec<i32> = words
        .iter()
        .map(|word| automaton.recognize(word.as_bytes()))
        .collect();
    assert_eq!(results, expected);
}

#[test]
fn awkward_bytes_compile() {
    let dir = tempdir().unwrap();
    let config = GeneratorConfig {
        target: Target::C,
        ..GeneratorConfig::default()
    };
    let generator = generator(
        config,
        &[
            ("a'b", "TK_QUOTE"),
            ("*/", "TK_CLOSE"),
            ("/*", "TK_OPEN"),
            ("a\\b", "TK_BACKSLASH"),
            ("a_b", "TK_UNDERSCORE"),
        ],
    );
    let automaton = generator.automaton();

    let driver = driver_source(
        "keyword.h",
        "recognize_keyword",
        &["a\\'b", "*/", "/*", "a\\\\b", "a_b", "a"],
        &[],
    );
    let Some(results) = compile_and_run(dir.path(), &generator, &driver) else {
        return;
    };

    let expected: Vec<i32> = [&b"a'b"[..], b"*/", b"/*", b"a\\b", b"a_b", b"a"]
        .iter()
        .map(|word| automaton.recognize(word))
        .collect();
    assert_eq!(results, expected);
}
