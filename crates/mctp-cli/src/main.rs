use clap::{Args, Parser, Subcommand};

use mctp_model::{Instance, ModelError, builder, report};
use mctp_solver::Solver;

#[derive(Parser)]
#[command(name = "mctp")]
#[command(about = "A multi-commodity transportation problem solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProblemArgs {
    /// Number of supply centers
    #[arg(short = 'm', long)]
    supply_centers: usize,
    /// Number of demand centers
    #[arg(short = 'n', long)]
    demand_centers: usize,
    /// Number of goods
    #[arg(short = 'p', long)]
    goods: usize,
    /// Supply limits, e.g. "10,15;20,5"
    #[arg(long)]
    supply: String,
    /// Demand requirements, e.g. "15,10;15,10"
    #[arg(long)]
    demand: String,
    /// Transportation costs, e.g. "2,3:3,2;4,1:1,4"
    #[arg(long)]
    costs: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the problem and print the shipment report
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Validate the input and report the model shape without solving
    Check {
        #[command(flatten)]
        problem: ProblemArgs,
    },
    /// Print the LP model built from the input
    Model {
        #[command(flatten)]
        problem: ProblemArgs,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

fn parse_instance(args: &ProblemArgs) -> Result<Instance, ModelError> {
    let dims = mctp_model::Dimensions::new(args.supply_centers, args.demand_centers, args.goods)?;
    Ok(Instance::parse(dims, &args.supply, &args.demand, &args.costs)?)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { problem, format } => {
            let instance = match parse_instance(&problem) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let lp = builder::build(&instance);
            let solution = match Solver::new().solve(&lp) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", report::render(instance.dims(), &solution));
            }

            if !solution.status.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Check { problem } => match parse_instance(&problem) {
            Ok(instance) => {
                let lp = builder::build(&instance);
                println!("✓ input is valid");
                println!("  {} variables", lp.num_variables());
                println!("  {} supply constraints", lp.num_ub_constraints());
                println!("  {} demand constraints", lp.num_eq_constraints());
            }
            Err(e) => {
                eprintln!("✗ invalid input: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Model { problem, format } => {
            let instance = match parse_instance(&problem) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let lp = builder::build(&instance);
            if format == "json" {
                match serde_json::to_string_pretty(&lp) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{:#?}", lp);
            }
        }
    }
}
