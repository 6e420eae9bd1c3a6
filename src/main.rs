fn main() {
    cpak::run_cli();
}
