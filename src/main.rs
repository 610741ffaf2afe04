#[cfg(not(target_arch = "wasm32"))]
mod cli;

/// Livery headless renderer entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    cli::run(cli::CliArgs::parse())
}

// No filesystem or process on WASM; hosts use the library directly
#[cfg(target_arch = "wasm32")]
fn main() {}
