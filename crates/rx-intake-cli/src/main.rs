use std::process::ExitCode;

fn main() -> ExitCode {
    rx_intake_cli::run()
}
