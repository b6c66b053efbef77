use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use glob::glob;
use thiserror::Error;
use tracing::{debug, info};

use crate::automaton::Automaton;
use crate::config::{ConfigError, GeneratorConfig};
use crate::emit::{EmitContext, Emitted};
use crate::keyword_def::{parse_keyword_def, KeywordDefError, KeywordSetDef};
use crate::output::write_emitted;
use crate::registry::{RegistryError, TokenId, TokenRegistry};
use crate::trie::{Trie, TrieError};

pub const DEF_EXTENSION: &str = "def";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Def(#[from] KeywordDefError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("cannot add keyword `{keyword}`")]
    Keyword {
        keyword: String,
        #[source]
        source: TrieError,
    },
    #[error("keyword `{keyword}` maps to undeclared token `{token}`")]
    UndeclaredToken { keyword: String, token: String },
    #[error("failed to render generated code")]
    Format(#[from] fmt::Error),
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write outputs into {}", .dir.display())]
    Write {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot search for keyword definitions")]
    Pattern(#[from] glob::PatternError),
    #[error("cannot search for keyword definitions")]
    Glob(#[from] glob::GlobError),
    #[error("strange definition file name {}", .0.display())]
    DefName(PathBuf),
}

/// State of one generation run: configuration, declared tokens and the keyword trie.
/// Build it up with [`Generator::register_token`] / [`Generator::add_keyword`] (or all
/// at once with [`Generator::from_def`]), then [`Generator::emit`].
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    registry: TokenRegistry,
    trie: Trie,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Generator, GenerateError> {
        config.validate()?;
        let registry = TokenRegistry::new(config.base);
        Ok(Generator {
            config,
            registry,
            trie: Trie::new(),
        })
    }

    pub fn from_def(config: GeneratorConfig, def: &KeywordSetDef) -> Result<Generator, GenerateError> {
        let mut generator = Generator::new(config)?;
        for token in &def.tokens {
            generator.register_token(token)?;
        }
        for keyword in &def.keywords {
            generator.add_keyword(&keyword.keyword, &keyword.token)?;
        }
        Ok(generator)
    }

    /// Declares a token. The name must not collide with anything the configured
    /// backend emits, and its value must fit in an `i32`.
    pub fn register_token(&mut self, name: &str) -> Result<TokenId, GenerateError> {
        self.config.check_token_name(name)?;
        Ok(self.registry.register(name)?)
    }

    pub fn add_keyword(&mut self, keyword: &str, token: &str) -> Result<(), GenerateError> {
        let id = self
            .registry
            .lookup(token)
            .ok_or_else(|| GenerateError::UndeclaredToken {
                keyword: keyword.to_string(),
                token: token.to_string(),
            })?;

        self.trie
            .insert(keyword.as_bytes(), id)
            .map_err(|source| GenerateError::Keyword {
                keyword: keyword.to_string(),
                source,
            })?;
        debug!(keyword, token, "added keyword");
        Ok(())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn automaton(&self) -> Automaton {
        Automaton::from_trie(&self.trie, &self.registry)
    }

    pub fn emit(&self) -> Result<Emitted, GenerateError> {
        let automaton = self.automaton();
        let ctx = EmitContext {
            automaton: &automaton,
            registry: &self.registry,
            config: &self.config,
        };
        let emitted = self.config.target.backend().emit(&ctx)?;
        debug!(
            backend = %self.config.target,
            steppers = automaton.len(),
            "emitted recognizer"
        );
        Ok(emitted)
    }

    pub fn write(&self, out_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
        let emitted = self.emit()?;
        write_emitted(out_dir, &emitted).map_err(|source| GenerateError::Write {
            dir: out_dir.to_path_buf(),
            source,
        })
    }
}

pub fn read_keyword_def(path: &Path) -> Result<KeywordSetDef, GenerateError> {
    let def_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| GenerateError::DefName(path.to_path_buf()))?
        .to_string();

    let def_string = fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_keyword_def(def_name, &def_string)?)
}

/// Reads one definition file and writes its two outputs into `out_dir`.
pub fn generate_file(
    def_path: &Path,
    out_dir: &Path,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>, GenerateError> {
    let def = read_keyword_def(def_path)?;
    info!(
        def = %def_path.display(),
        tokens = def.tokens.len(),
        keywords = def.keywords.len(),
        "generating keyword recognizer"
    );

    Generator::from_def(config.clone(), &def)?.write(out_dir)
}

/// Every `*.def` file directly inside `dir`, sorted by path.
pub fn collect_def_files(dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let pattern = dir.join(format!("*.{}", DEF_EXTENSION));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| GenerateError::DefName(dir.to_path_buf()))?;

    let mut def_files = Vec::new();
    for entry in glob(pattern)? {
        def_files.push(entry?);
    }
    def_files.sort();
    Ok(def_files)
}

/// Generates one output pair per definition file in `dir`, each named after its
/// definition file. Every set is rendered before anything is written.
pub fn generate_dir(
    dir: &Path,
    out_dir: &Path,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>, GenerateError> {
    let mut rendered = Vec::new();
    for def_path in collect_def_files(dir)? {
        let def = read_keyword_def(&def_path)?;
        let config = config.with_stem(&def.name);
        info!(def = %def_path.display(), stem = %config.stem, "generating keyword recognizer");
        rendered.push(Generator::from_def(config, &def)?.emit()?);
    }

    let mut written = Vec::new();
    for emitted in &rendered {
        written.extend(write_emitted(out_dir, emitted).map_err(|source| GenerateError::Write {
            dir: out_dir.to_path_buf(),
            source,
        })?);
    }
    Ok(written)
}
