mod cli;
mod exit;
mod run;

use std::process::ExitCode;

use exit::ExitStatus;

fn main() -> ExitCode {
    let args = match cli::parse() {
        Ok(args) => args,
        Err(err) => return report_parse_error(&err),
    };
    run::initialise_tracing();

    match run::run(args) {
        Ok(()) => ExitStatus::Success.into(),
        Err(err) => {
            let status = ExitStatus::from_run_error(&err);
            tracing::debug!(code = status.code(), "shader preview failed");
            eprintln!("shaker: {err:#}");
            status.into()
        }
    }
}

/// Help and version go to stdout with a zero status; every other parse
/// failure prints the parser message plus usage to stdout.
fn report_parse_error(err: &clap::Error) -> ExitCode {
    let status = ExitStatus::from_parse_error(err);
    if status == ExitStatus::Success {
        print!("{}", err.render());
        return status.into();
    }

    let rendered = err.render().to_string();
    print!("{rendered}");
    if !rendered.contains("Usage:") {
        println!("\n{}", cli::usage());
    }
    status.into()
}
