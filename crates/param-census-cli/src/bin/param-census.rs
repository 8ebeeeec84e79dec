use std::process::ExitCode;

fn main() -> ExitCode {
    param_census_cli::cli::cli_main()
}
