//! devconsole - A typed command console for game developers and admins.

use devconsole::cli::Cli;
use devconsole::config::Config;
use devconsole::error::{ConsoleError, Result};
use devconsole::sandbox::{self, Player};
use devconsole::session::{Session, SessionOutput};
use devconsole::{builtins, logging, AdapterRegistry, Console};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();
    if cli.log_file {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    cli.validate().map_err(ConsoleError::config)?;
    let format = cli.parse_output_format().map_err(ConsoleError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut console = Console::new(AdapterRegistry::basic(), config.console.clone());
    let help = builtins::help(console.directory().clone());
    let failures = console.register_all(std::iter::once(help).chain(sandbox::commands()));
    if let Some(first) = failures.into_iter().next() {
        return Err(first);
    }

    let player = Player::from_config(&config.caller);
    let output = SessionOutput::new(format);

    if let Some(line) = &cli.complete {
        let candidates = console.complete(line, &player)?;
        print!("{}", output.format_candidates(&candidates));
        return Ok(0);
    }

    let mut session = Session::new(player);
    for line in &cli.exec {
        session.push_line(line.as_str());
    }
    if let Some(path) = &cli.script {
        session.load_script(path)?;
    }

    let result = session.run(&console);
    print!("{}", output.format(&result));

    Ok(if result.errors > 0 { 1 } else { 0 })
}
