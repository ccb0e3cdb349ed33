use anyhow::{ensure, Result};
use clap::Parser;
use rocchio::{Outcome, Session, SessionConfig};
use tracing_subscriber::{fmt, EnvFilter};

mod console;
mod google;

use console::ConsoleJudge;
use google::GoogleSearch;

#[derive(Parser)]
#[command(name = "rocchio")]
#[command(about = "Expand a web search query from per-result relevance feedback", long_about = None)]
struct Cli {
    /// Google API key
    api_key: String,
    /// Custom search engine id (cx)
    engine_id: String,
    /// Target precision in (0, 1]
    precision: f64,
    /// Initial query
    query: String,
    /// Positive feedback weight
    #[arg(long, default_value_t = 0.75)]
    beta: f64,
    /// Negative feedback weight
    #[arg(long, default_value_t = 0.75)]
    gamma: f64,
    /// Stop after this many rounds even if the target precision is not reached
    #[arg(long)]
    max_rounds: Option<u32>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    ensure!(
        args.precision > 0.0 && args.precision <= 1.0,
        "precision must be in (0, 1]"
    );

    let mut search = GoogleSearch::new(args.api_key.clone(), args.engine_id.clone())?;
    let stdin = std::io::stdin();
    let mut judge = ConsoleJudge::new(stdin.lock(), std::io::stdout());

    let config = SessionConfig {
        target_precision: args.precision,
        beta: args.beta,
        gamma: args.gamma,
        max_rounds: args.max_rounds,
    };
    let mut session = Session::new(&args.query, config);

    loop {
        println!("Parameters:");
        println!("Client Key = {}", args.api_key);
        println!("Engine Key = {}", args.engine_id);
        println!("Query      = {}", session.query_string());
        println!("Precision  = {}", args.precision);
        println!("Google Search Results:");
        println!("=======================");

        let report = session.run_round(&mut search, &mut judge)?;

        println!("=======================");
        println!("FEEDBACK SUMMARY:");
        println!("Precision: {}", report.precision);
        match report.outcome {
            Outcome::TargetReached => {
                println!("The desired precision has been reached.");
                break;
            }
            Outcome::DeadEnd => {
                println!("No relevant documents among the results. Please try another query.");
                break;
            }
            Outcome::RoundLimit => {
                println!("Round limit reached before the target precision.");
                break;
            }
            Outcome::Expanded { ref added } => {
                println!("Still below the desired precision of {}", args.precision);
                println!("Augmenting by: {}", added.join(" "));
                println!("Next query: {}", report.query);
            }
        }
    }
    Ok(())
}
