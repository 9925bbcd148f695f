fn main() {
    env_logger::init();

    if let Err(error) = roi_cli::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
