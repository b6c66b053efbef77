mod build_keywords;

fn main() {
    build_keywords::generate_lox_keywords().expect("failed to generate lox keyword recognizer");
}
