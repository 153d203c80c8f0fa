//! Version command

/// Run the version command.
pub fn run() {
    println!("appdeploy {}", env!("CARGO_PKG_VERSION"));
}
