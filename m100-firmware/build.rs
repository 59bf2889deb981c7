fn main() {
    m100_config::builder::build_rs();
}
