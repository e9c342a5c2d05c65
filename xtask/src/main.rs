use anyhow::Result as AnyResult;
use clap::{Parser, Subcommand, ValueEnum};

use duct::{cmd, Expression};

#[derive(Debug, Subcommand)]
pub enum Subcommands {
    /// Runs tests.
    Test,

    /// Checks the driver for errors.
    Check {
        /// Which logging backend to check with. Checks all of them by default.
        logging: Option<Logging>,

        /// Check for a bare-metal target to make sure the driver stays no_std.
        #[clap(long)]
        embedded: bool,
    },

    /// Builds the documentation.
    Doc {
        /// Whether to open the documentation in a browser.
        #[clap(long)]
        open: bool,
    },

    /// Runs extra checks (formatting, clippy).
    ExtraCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Logging {
    None,
    Log,
    Defmt,
}

impl Logging {
    const ALL: [Logging; 3] = [Logging::None, Logging::Log, Logging::Defmt];

    fn features(&self) -> &str {
        match self {
            Logging::None => "--features=ufmt-impl",
            Logging::Log => "--features=log,ufmt-impl",
            Logging::Defmt => "--features=defmt,ufmt-impl",
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about, version, propagate_version = true)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommands,
}

fn cargo(args: &[&str]) -> Expression {
    println!("🛠️  Running command: cargo {}", args.join(" "));

    cmd("cargo", args.to_vec())
}

fn checks(logging: Option<Logging>, embedded: bool) -> AnyResult<()> {
    let options = match logging {
        Some(logging) => vec![logging],
        None => Logging::ALL.to_vec(),
    };

    for logging in options {
        let mut args = vec!["check", "-p", "lc709203f", logging.features()];
        if embedded {
            args.push("--target=thumbv7em-none-eabihf");
        }

        cargo(&args).run()?;
    }

    Ok(())
}

fn docs(open: bool) -> AnyResult<()> {
    let mut args = vec!["doc", "-p", "lc709203f", "--no-deps"];

    if open {
        args.push("--open");
    }

    cargo(&args).run()?;

    Ok(())
}

fn extra_checks() -> AnyResult<()> {
    cargo(&["fmt", "--check"]).run()?;
    cargo(&["clippy", "--workspace", "--all-targets"]).run()?;

    Ok(())
}

fn test() -> AnyResult<()> {
    let packages = ["lc709203f", "device-descriptor"];

    let mut args = vec!["test"];

    for p in packages {
        args.push("-p");
        args.push(p);
    }

    cargo(&args).run()?;

    Ok(())
}

fn main() -> AnyResult<()> {
    let cli = Cli::parse();

    match cli.subcommand {
        Subcommands::Test => test(),
        Subcommands::Check { logging, embedded } => checks(logging, embedded),
        Subcommands::Doc { open } => docs(open),
        Subcommands::ExtraCheck => extra_checks(),
    }
}
