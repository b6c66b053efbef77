use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use kwgen::{generate::read_keyword_def, Generator, GeneratorConfig, Target};

// relative to root of workspace
const LOX_DEF: &str = "data/keyword_sets/lox.def";

pub const STEM: &str = "lox_keyword";

fn workspace_root() -> Result<PathBuf, anyhow::Error> {
    let package_root = env::var("CARGO_MANIFEST_DIR").context("must use cargo as build system")?;
    Path::new(&package_root)
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .context("corrupted folder structure")
}

pub fn generate_lox_keywords() -> Result<(), anyhow::Error> {
    let def_path = workspace_root()?.join(LOX_DEF);
    println!("cargo:rerun-if-changed={}", def_path.display());

    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR not set")?);
    let def = read_keyword_def(&def_path)?;

    let config = GeneratorConfig {
        target: Target::Rust,
        stem: STEM.to_string(),
        entry: "lox_keyword".to_string(),
        prefix: "lox".to_string(),
        ..GeneratorConfig::default()
    };

    Generator::from_def(config, &def)?
        .write(&out_dir)
        .with_context(|| format!("unable to write recognizer for {}", def_path.display()))?;

    Ok(())
}
