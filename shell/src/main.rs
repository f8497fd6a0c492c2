fn main() {
    std::process::exit(meme_lib::run());
}
