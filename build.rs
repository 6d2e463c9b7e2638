fn main() {
    // Propagate the ESP-IDF build environment (sysroot, linker args) only
    // when actually targeting the chip. Host builds and tests never need
    // the Xtensa toolchain.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
