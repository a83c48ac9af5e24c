use clap::Parser;
use quickdo::cli::commands::Cli;
use quickdo::cli::handlers;
use quickdo::cli::output::Reply;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => usage_failure(e),
    };
    let json = cli.json;

    if let Err(e) = handlers::dispatch(cli) {
        if json {
            print_failure(&e.to_string());
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Bad arguments. A `--json` caller still gets a reply object on stdout;
/// everyone else gets clap's usage text.
fn usage_failure(e: clap::Error) -> ! {
    let json = std::env::args_os().any(|arg| arg == "--json");
    if !json || !e.use_stderr() {
        e.exit();
    }
    let rendered = e.to_string();
    let message = rendered.lines().next().unwrap_or_default();
    print_failure(message.trim_start_matches("error: "));
    std::process::exit(e.exit_code());
}

fn print_failure(message: &str) {
    match serde_json::to_string(&Reply::failure(message)) {
        Ok(out) => println!("{}", out),
        Err(_) => eprintln!("error: {}", message),
    }
}

/// Log to stderr so stdout stays parseable. Level comes from `QD_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("QD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
