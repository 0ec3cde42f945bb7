fn main() {
    if let Err(e) = schemascope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
