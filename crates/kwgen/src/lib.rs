pub mod automaton;
pub mod config;
pub mod emit;
pub mod generate;
pub mod graph;
pub mod keyword_def;
pub mod output;
pub mod registry;
pub mod trie;


pub use automaton::{Automaton, NO_MATCH};
pub use config::GeneratorConfig;
pub use emit::Target;
pub use generate::{generate_dir, generate_file, GenerateError, Generator};
