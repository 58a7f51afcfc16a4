//! valbet CLI - stake recommendations from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use valbet::backtesting::{
    analyze_by_market, analyze_by_odds_range, BankrollSimulator, SimulationConfig,
};
use valbet::config::RiskConfig;
use valbet::core::kelly::stake_amount;
use valbet::core::odds::{american_to_decimal, decimal_to_american, implied_probability};
use valbet::core::recommend::{rank_by_edge, StakeRecommender};
use valbet::data::{load_candidates, load_settled};
use valbet::models::{MarketType, RecommendRequest, StakeRecommendation};

#[derive(Parser)]
#[command(name = "valbet")]
#[command(author, version, about = "Kelly-criterion stake recommendation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single market quote
    Recommend {
        /// Market type: match_winner, map_winner, total_rounds, player_prop
        #[arg(short, long, default_value = "match_winner")]
        market: String,

        /// Decimal odds on offer
        #[arg(short, long)]
        odds: f64,

        /// Model win probability (0-1)
        #[arg(short, long)]
        probability: Option<f64>,

        /// Model mean for a line market
        #[arg(long)]
        mu: Option<f64>,

        /// Model standard deviation for a line market
        #[arg(long)]
        sigma: Option<f64>,

        /// Quoted line for a line market
        #[arg(long)]
        line: Option<f64>,

        /// Team, map side or player the odds are quoted for
        #[arg(long)]
        selection: Option<String>,

        /// Bookmaker offering the quote
        #[arg(long)]
        bookmaker: Option<String>,

        /// Model confidence (0-1)
        #[arg(long)]
        confidence: Option<f64>,

        /// Maximum single stake as a bankroll fraction
        #[arg(long, default_value = "0.05")]
        max_stake: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "0.25")]
        kelly: f64,

        /// Minimum edge required to bet
        #[arg(long, default_value = "0.02")]
        min_edge: f64,

        /// Bankroll for converting the fraction into a stake
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Stake rounding step
        #[arg(long, default_value = "1")]
        round_to: f64,

        /// Smallest stake worth placing
        #[arg(long, default_value = "1")]
        min_stake: f64,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a CSV of candidates and rank the eligible ones
    Batch {
        /// Path to the candidates CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Number of top bets to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Maximum single stake as a bankroll fraction
        #[arg(long, default_value = "0.05")]
        max_stake: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "0.25")]
        kelly: f64,

        /// Minimum edge required to bet
        #[arg(long, default_value = "0.02")]
        min_edge: f64,

        /// Print the ranked bets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a settled-bet CSV through the bankroll simulator
    Simulate {
        /// Path to the settled bets CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Starting bankroll
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Stake rounding step
        #[arg(long, default_value = "1")]
        round_to: f64,

        /// Smallest stake worth placing
        #[arg(long, default_value = "1")]
        min_stake: f64,

        /// Maximum single stake as a bankroll fraction
        #[arg(long, default_value = "0.05")]
        max_stake: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "0.25")]
        kelly: f64,

        /// Minimum edge required to bet
        #[arg(long, default_value = "0.02")]
        min_edge: f64,
    },

    /// Convert between decimal odds, American odds and implied probability
    Convert {
        /// Decimal odds to convert
        #[arg(short, long)]
        decimal: Option<f64>,

        /// American odds to convert
        #[arg(short, long, allow_hyphen_values = true)]
        american: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!(
        "{}",
        format!("valbet v{}", env!("CARGO_PKG_VERSION")).cyan().bold()
    );
    println!();

    if cli.interactive {
        run_interactive()?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Recommend {
                market,
                odds,
                probability,
                mu,
                sigma,
                line,
                selection,
                bookmaker,
                confidence,
                max_stake,
                kelly,
                min_edge,
                bankroll,
                round_to,
                min_stake,
                json,
            } => {
                let risk = RiskConfig::new(max_stake, kelly, min_edge)?;
                recommend_quote(
                    &market,
                    odds,
                    probability,
                    mu,
                    sigma,
                    line,
                    selection,
                    bookmaker,
                    confidence,
                    risk,
                    bankroll,
                    round_to,
                    min_stake,
                    json,
                )?;
            }
            Commands::Batch {
                input,
                top,
                max_stake,
                kelly,
                min_edge,
                json,
            } => {
                let risk = RiskConfig::new(max_stake, kelly, min_edge)?;
                run_batch(&input, risk, top, json)?;
            }
            Commands::Simulate {
                input,
                bankroll,
                round_to,
                min_stake,
                max_stake,
                kelly,
                min_edge,
            } => {
                let config = SimulationConfig {
                    starting_bankroll: bankroll,
                    round_to,
                    min_stake,
                    risk: RiskConfig::new(max_stake, kelly, min_edge)?,
                };
                run_simulate(&input, config)?;
            }
            Commands::Convert { decimal, american } => {
                run_convert(decimal, american)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn recommend_quote(
    market: &str,
    odds: f64,
    probability: Option<f64>,
    mu: Option<f64>,
    sigma: Option<f64>,
    line: Option<f64>,
    selection: Option<String>,
    bookmaker: Option<String>,
    confidence: Option<f64>,
    risk: RiskConfig,
    bankroll: f64,
    round_to: f64,
    min_stake: f64,
    json: bool,
) -> Result<()> {
    let market_type: MarketType = market.parse()?;

    let request = RecommendRequest {
        market_type,
        selection,
        bookmaker,
        decimal_odds: odds,
        predicted_probability: probability,
        mu,
        sigma,
        line,
        confidence,
    };

    let recommender = StakeRecommender::new(risk);
    let candidate = request.to_candidate()?;
    let rec = recommender.recommend_candidate(&candidate)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }

    print_recommendation(&rec);
    println!();

    if rec.eligible {
        let stake = stake_amount(rec.recommended_stake_fraction, bankroll, round_to, min_stake);
        if stake > 0.0 {
            println!(
                "{} stake {:.2} on a {:.2} bankroll",
                "BET".green().bold(),
                stake,
                bankroll
            );
        } else {
            println!(
                "{} the recommended fraction rounds below the {:.2} minimum stake",
                "PASS".yellow().bold(),
                min_stake
            );
        }
    } else if rec.edge < recommender.config().min_edge_threshold {
        println!(
            "{} edge {:+.1}% is below the {:.1}% minimum",
            "PASS".yellow().bold(),
            rec.edge * 100.0,
            recommender.config().min_edge_threshold * 100.0
        );
    } else {
        println!(
            "{} Kelly sizing finds no stake worth placing",
            "PASS".yellow().bold()
        );
    }

    Ok(())
}

fn run_batch(input: &Path, risk: RiskConfig, top: usize, json: bool) -> Result<()> {
    println!("{}: {}", "Evaluating".green(), input.display());
    println!();

    let rows = load_candidates(input)
        .with_context(|| format!("Failed to load candidates from {:?}", input))?;

    if rows.is_empty() {
        println!("{}", "No candidates found in the file.".yellow());
        return Ok(());
    }

    let recommender = StakeRecommender::new(risk);

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut recommendations = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        pb.set_message(format!("candidate {}", index + 1));

        let rec = row
            .to_candidate()
            .and_then(|candidate| recommender.recommend_candidate(&candidate))
            .with_context(|| format!("Candidate {} is invalid", index + 1))?;

        recommendations.push(rec);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let ranked = rank_by_edge(&recommendations);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    println!("{}", "Eligible bets (best edge first):".yellow().bold());
    println!(
        "{:>3} {:<13} {:<16} {:>6} {:>7} {:>7} {:>7} {:>7}",
        "#", "Market", "Selection", "Odds", "Prob", "Edge", "Stake%", "Conf"
    );
    println!("{}", "-".repeat(75));

    for (i, rec) in ranked.iter().take(top).enumerate() {
        println!(
            "{:>3} {:<13} {:<16} {:>6.2} {:>6.1}% {:>+6.1}% {:>6.2}% {:>7}",
            i + 1,
            rec.market_type.to_string(),
            rec.selection.as_deref().unwrap_or("-"),
            rec.decimal_odds,
            rec.predicted_probability * 100.0,
            rec.edge * 100.0,
            rec.recommended_stake_fraction * 100.0,
            rec.confidence
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    println!();
    println!(
        "Total: {} candidates, {} eligible",
        recommendations.len(),
        ranked.len()
    );

    Ok(())
}

fn run_simulate(input: &Path, config: SimulationConfig) -> Result<()> {
    println!("{}: {}", "Simulating".green(), input.display());

    let rows = load_settled(input)
        .with_context(|| format!("Failed to load settled bets from {:?}", input))?;

    if rows.is_empty() {
        println!("{}", "No settled bets found in the file.".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Replaying {} bets...", rows.len()));

    let simulator = BankrollSimulator::new(config);
    let result = simulator.run(&rows).context("Simulation failed")?;

    pb.finish_and_clear();

    simulator.print_summary(&result);

    if !result.bets.is_empty() {
        println!("\n{}", "Analysis by Market:".yellow().bold());
        let market_analysis = analyze_by_market(&result.bets);
        println!(
            "{:>16} {:>6} {:>6} {:>9} {:>11} {:>9}",
            "Market", "Bets", "Wins", "Win Rate", "Profit", "ROI"
        );
        println!("{}", "-".repeat(62));
        for a in &market_analysis {
            println!(
                "{:>16} {:>6} {:>6} {:>8.1}% {:>11.2} {:>8.1}%",
                a.key,
                a.bets,
                a.wins,
                a.win_rate * 100.0,
                a.profit,
                a.roi * 100.0
            );
        }

        println!("\n{}", "Analysis by Odds Range:".yellow().bold());
        let odds_analysis = analyze_by_odds_range(&result.bets);
        println!(
            "{:>16} {:>6} {:>6} {:>9} {:>11} {:>9}",
            "Range", "Bets", "Wins", "Win Rate", "Profit", "ROI"
        );
        println!("{}", "-".repeat(62));
        for a in &odds_analysis {
            println!(
                "{:>16} {:>6} {:>6} {:>8.1}% {:>11.2} {:>8.1}%",
                a.key,
                a.bets,
                a.wins,
                a.win_rate * 100.0,
                a.profit,
                a.roi * 100.0
            );
        }
    }

    Ok(())
}

fn run_convert(decimal: Option<f64>, american: Option<i32>) -> Result<()> {
    match (decimal, american) {
        (Some(d), _) => {
            if d <= 1.0 {
                anyhow::bail!("Decimal odds must be greater than 1.0, got {}", d);
            }
            println!("{:<22} {:.3}", "Decimal odds:", d);
            println!(
                "{:<22} {}",
                "American odds:",
                format_american(decimal_to_american(d))
            );
            println!(
                "{:<22} {:.1}%",
                "Implied probability:",
                implied_probability(d) * 100.0
            );
        }
        (None, Some(a)) => {
            if a == 0 {
                anyhow::bail!("American odds must be nonzero");
            }
            let d = american_to_decimal(a);
            println!("{:<22} {}", "American odds:", format_american(a));
            println!("{:<22} {:.3}", "Decimal odds:", d);
            println!(
                "{:<22} {:.1}%",
                "Implied probability:",
                implied_probability(d) * 100.0
            );
        }
        (None, None) => {
            anyhow::bail!("Provide --decimal or --american");
        }
    }

    Ok(())
}

fn run_interactive() -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Recommend a stake", "Convert odds", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let markets = vec!["match_winner", "map_winner", "total_rounds", "player_prop"];
                let market = Select::with_theme(&theme)
                    .with_prompt("Market")
                    .items(&markets)
                    .default(0)
                    .interact()?;

                let odds: f64 = Input::with_theme(&theme)
                    .with_prompt("Decimal odds")
                    .interact_text()?;

                // Line markets take a distribution, the rest a probability
                let (probability, mu, sigma, line) = if market >= 2 {
                    let mu: f64 = Input::with_theme(&theme)
                        .with_prompt("Model mean")
                        .interact_text()?;
                    let sigma: f64 = Input::with_theme(&theme)
                        .with_prompt("Model standard deviation")
                        .interact_text()?;
                    let line: f64 = Input::with_theme(&theme)
                        .with_prompt("Quoted line")
                        .interact_text()?;
                    (None, Some(mu), Some(sigma), Some(line))
                } else {
                    let p: f64 = Input::with_theme(&theme)
                        .with_prompt("Win probability (0-1)")
                        .interact_text()?;
                    (Some(p), None, None, None)
                };

                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll")
                    .default(1000.0)
                    .interact_text()?;

                println!();
                let outcome = recommend_quote(
                    markets[market],
                    odds,
                    probability,
                    mu,
                    sigma,
                    line,
                    None,
                    None,
                    None,
                    RiskConfig::default(),
                    bankroll,
                    1.0,
                    1.0,
                    false,
                );
                if let Err(e) = outcome {
                    println!("{}: {}", "Failed".red(), e);
                }
                println!();
            }
            1 => {
                let d: f64 = Input::with_theme(&theme)
                    .with_prompt("Decimal odds")
                    .interact_text()?;

                println!();
                if let Err(e) = run_convert(Some(d), None) {
                    println!("{}: {}", "Failed".red(), e);
                }
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_recommendation(rec: &StakeRecommendation) {
    let mut title = format!("{} @ {:.2}", rec.market_type, rec.decimal_odds);
    if let Some(ref selection) = rec.selection {
        title.push_str(&format!(" on {}", selection));
    }
    if let Some(ref bookmaker) = rec.bookmaker {
        title.push_str(&format!(" ({})", bookmaker));
    }

    println!("{}", title.yellow().bold());
    println!("{}", "-".repeat(46));
    println!(
        "{:<24} {:>7.1}%",
        "Model probability:",
        rec.predicted_probability * 100.0
    );
    println!(
        "{:<24} {:>7.1}%",
        "Implied probability:",
        rec.implied_probability * 100.0
    );

    let edge_str = format!("{:+.1}%", rec.edge * 100.0);
    println!(
        "{:<24} {:>8}",
        "Edge:",
        if rec.edge >= 0.0 {
            edge_str.green()
        } else {
            edge_str.red()
        }
    );

    println!("{:<24} {:>8.3}", "Expected value:", rec.expected_value);
    println!("{:<24} {:>7.2}%", "Full Kelly:", rec.full_kelly * 100.0);
    println!(
        "{:<24} {:>7.2}%",
        "Fractional Kelly:",
        rec.kelly_stake_fraction * 100.0
    );
    println!(
        "{:<24} {:>7.2}%",
        "Recommended stake:",
        rec.recommended_stake_fraction * 100.0
    );
    if let Some(confidence) = rec.confidence {
        println!("{:<24} {:>8}", "Confidence:", confidence.to_string());
    }
}

fn format_american(american: i32) -> String {
    if american >= 0 {
        format!("+{}", american)
    } else {
        american.to_string()
    }
}
