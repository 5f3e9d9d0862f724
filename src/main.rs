use anyhow::Context;
use version_launcher::cli::{self, CliArgs, Command};
use version_launcher::confirm::{AssumeYes, Confirm, TerminalPrompt};
use version_launcher::teardown::TeardownOutcome;
use version_launcher::{Error, commands, logging, registry};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.verbose, args.quiet) {
        eprintln!("version-launcher: {err:#}");
    }

    if let Err(err) = run_main(args).await {
        eprintln!("version-launcher error: {err:#}");
        let code = err.downcast_ref::<Error>().map(Error::exit_code).unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run_main(args: CliArgs) -> anyhow::Result<()> {
    let confirm: Box<dyn Confirm> = if args.no_interaction {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };

    match args.command {
        Command::StartServers(start) => {
            let pids = commands::start_servers(&start, confirm.as_ref())
                .await
                .context("Failed to start servers")?;
            println!("{}", registry::encode(&pids));
        }
        Command::KillServers(kill) => {
            match commands::kill_servers(&kill, confirm.as_ref())
                .context("Failed to kill servers")?
            {
                TeardownOutcome::Terminated(pids) => {
                    tracing::info!("Killed {}", registry::encode(&pids));
                }
                TeardownOutcome::Declined => {}
            }
        }
    }

    Ok(())
}
