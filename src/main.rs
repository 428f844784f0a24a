use std::process::ExitCode;

fn main() -> ExitCode {
    refgraph::cli::run()
}
