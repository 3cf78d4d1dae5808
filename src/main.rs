fn main() {
    sml::cli::run();
}
