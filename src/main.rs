fn main() {
    if let Err(err) = map_label_collision::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
