fn main() {
    if let Err(e) = mdtoc::cli::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
