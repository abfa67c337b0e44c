use std::path::PathBuf;

use sheetsync::envjs;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let env_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("env.local"));

    match envjs::generate(&env_path) {
        Ok(out) => {
            tracing::info!(path = %out.display(), "wrote client env");
            println!("env.js generated successfully.");
        }
        Err(err) => {
            eprintln!("ENVJS_ERROR {}", err);
            std::process::exit(1);
        }
    }
}
