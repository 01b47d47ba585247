use clap::{Parser, Subcommand};
use commands::{
    aggregate::{run_aggregate, AggregateArgs},
    demo::{run_demo, DemoArgs},
    import::{run_import, ImportArgs},
};
use env_logger::Env;
use yansi::Condition;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Import(ImportArgs),
    Aggregate(AggregateArgs),
    Demo(DemoArgs),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    yansi::whenever(Condition::from(|| {
        Condition::stderr_is_tty() && Condition::clicolor() && Condition::no_color()
    }));

    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => run_import(args),
        Commands::Aggregate(args) => run_aggregate(args),
        Commands::Demo(args) => run_demo(args),
    }
}
