//! Polyglot CLI entry point

fn main() {
    polyglot::cli::run();
}
