use galaxygen::Viewer;

fn main() {
    env_logger::init();

    if let Err(err) = Viewer::new().run() {
        eprintln!("galaxygen: {}", err);
        std::process::exit(1);
    }
}
