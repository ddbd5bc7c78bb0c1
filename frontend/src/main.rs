//! Entry point for the WASM application

pub fn main() {
    leafscan_frontend::start();
}
