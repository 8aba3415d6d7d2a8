fn main() {
    if let Err(err) = cam_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
