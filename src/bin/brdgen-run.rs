//! Headless runner: sign in, run the pipeline, print the dashboard summary.

mod run;

fn main() {
    if let Err(err) = brdgen::logging::init_for(brdgen::logging::LogSession::Headless) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run::run(std::env::args().skip(1).collect()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
