use crate::demo::{
    run_demo, run_financial_compare, run_weighted_score, FinancialCompareArgs, WeightedScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use decision_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Decision AI",
    about = "Run the decision support service or its calculators from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compare a financing against a consortium
    Financial {
        #[command(subcommand)]
        command: FinancialCommand,
    },
    /// Score options against weighted criteria
    Weighted {
        #[command(subcommand)]
        command: WeightedCommand,
    },
    /// Walk through both calculators and the decision history with sample data
    Demo,
}

#[derive(Subcommand, Debug)]
enum FinancialCommand {
    /// Print totals and installments for both options
    Compare(FinancialCompareArgs),
}

#[derive(Subcommand, Debug)]
enum WeightedCommand {
    /// Print final scores and the ranking
    Score(WeightedScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Financial {
            command: FinancialCommand::Compare(args),
        } => run_financial_compare(args),
        Command::Weighted {
            command: WeightedCommand::Score(args),
        } => run_weighted_score(args),
        Command::Demo => run_demo(),
    }
}
