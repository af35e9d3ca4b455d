//! `roi-sim` command line front end

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roi_core::{InputField, ScenarioId, SimulationInputs};
use roi_sim::{view, SimulatorConfig, SimulatorController, SimulatorError, SimulatorState};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const INPUT_ARGS: [(InputField, &str); 4] = [
    (InputField::LaborCostManual, "labor-cost-manual"),
    (InputField::ErrorSavings, "error-savings"),
    (InputField::AutoCost, "auto-cost"),
    (InputField::ImplementationCost, "implementation-cost"),
];

const INTERACTIVE_HELP: &str = "\
commands:
  <field> [value]   set or clear a field (labor, errors, auto, implementation)
  name <text>       scenario name for save
  email <address>   report recipient
  save | list | load <id> | delete <id> | report
  show | help | quit";

fn input_args() -> Vec<Arg> {
    INPUT_ARGS
        .iter()
        .map(|(field, name)| {
            Arg::new(*name)
                .long(*name)
                .value_name("AMOUNT")
                .help(format!("{field}"))
        })
        .collect()
}

fn inputs_from(args: &ArgMatches) -> anyhow::Result<SimulationInputs> {
    let mut inputs = SimulationInputs::new();
    for (field, name) in INPUT_ARGS {
        if let Some(text) = args.get_one::<String>(name) {
            inputs
                .set_from_text(field, text)
                .with_context(|| format!("--{name}"))?;
        }
    }
    Ok(inputs)
}

fn cli() -> Command {
    Command::new("roi-sim")
        .version(roi_core::VERSION)
        .about("ROI simulator client")
        .subcommand_required(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Simulation service URL"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory for downloaded reports"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (repeat for more)"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run one simulation and print the results")
                .args(input_args()),
        )
        .subcommand(
            Command::new("scenarios")
                .about("Manage saved scenarios")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List saved scenarios"))
                .subcommand(
                    Command::new("save")
                        .about("Save inputs under a name")
                        .arg(Arg::new("name").required(true).help("Scenario name"))
                        .args(input_args()),
                )
                .subcommand(
                    Command::new("load")
                        .about("Load a scenario and simulate it")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a scenario")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Download a PDF report")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Recipient email"),
                )
                .args(input_args()),
        )
        .subcommand(Command::new("health").about("Check the service"))
        .subcommand(Command::new("interactive").about("Edit inputs line by line"))
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Scenario id")
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("ROI_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<SimulatorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulatorConfig::new(),
    };
    if let Some(url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(url.clone());
    }
    if let Some(dir) = matches.get_one::<PathBuf>("out-dir") {
        config = config.with_download_dir(dir.clone());
    }
    Ok(config)
}

fn scenario_id(args: &ArgMatches) -> anyhow::Result<ScenarioId> {
    args.get_one::<i64>("id")
        .copied()
        .map(ScenarioId)
        .context("missing scenario id")
}

/// Print the results view and fail if it carries an error message
fn finish(state: &SimulatorState) -> anyhow::Result<()> {
    print!("{}", view::render(state));
    match &state.message {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

async fn simulate(controller: &SimulatorController, inputs: SimulationInputs) -> anyhow::Result<()> {
    if !inputs.can_simulate() {
        let missing: Vec<String> = InputField::REQUIRED
            .into_iter()
            .filter(|field| !inputs.is_field_usable(*field))
            .map(|field| field.to_string())
            .collect();
        bail!("missing or invalid: {}", missing.join(", "));
    }
    controller.set_inputs(inputs);
    let state = controller.wait_for_simulation().await;
    finish(&state)
}

/// Apply inputs and let their simulation settle before acting on them
///
/// The results are shown so the simulate request is not a silent side effect.
async fn stage_inputs(controller: &SimulatorController, inputs: SimulationInputs) -> SimulatorState {
    controller.set_inputs(inputs);
    let state = controller.wait_for_simulation().await;
    if state.result.is_some() || state.message.is_some() {
        print!("{}", view::render(&state));
    }
    state
}

async fn scenarios(controller: &SimulatorController, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => {
            if !controller.refresh_scenarios().await {
                bail!("could not fetch scenarios");
            }
            print!("{}", view::render_scenarios(&controller.snapshot().scenarios));
        }
        Some(("save", args)) => {
            let name = args.get_one::<String>("name").cloned().unwrap_or_default();
            stage_inputs(controller, inputs_from(args)?).await;
            controller.set_scenario_name(name);
            controller.save_scenario().await?;
            print!("{}", view::render_scenarios(&controller.snapshot().scenarios));
        }
        Some(("load", args)) => {
            let inputs = controller.load_scenario(scenario_id(args)?).await?;
            for field in InputField::ALL {
                let value = inputs
                    .get(field)
                    .map_or_else(|| "—".to_string(), |v| v.to_string());
                println!("{field}: {value}");
            }
            if inputs.can_simulate() {
                let state = controller.wait_for_simulation().await;
                finish(&state)?;
            }
        }
        Some(("delete", args)) => {
            controller.delete_scenario(scenario_id(args)?).await?;
            print!("{}", view::render_scenarios(&controller.snapshot().scenarios));
        }
        _ => unreachable!("subcommand required"),
    }
    Ok(())
}

async fn report(controller: &SimulatorController, args: &ArgMatches) -> anyhow::Result<()> {
    let email = args.get_one::<String>("email").cloned().unwrap_or_default();
    stage_inputs(controller, inputs_from(args)?).await;
    controller.set_email(email);
    let path = controller.download_report().await?;
    println!("Report saved to {}", path.display());
    Ok(())
}

fn spawn_printer(mut updates: watch::Receiver<SimulatorState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = String::new();
        while updates.changed().await.is_ok() {
            let text = view::render(&updates.borrow_and_update());
            if text != last {
                print!("{text}");
                last = text;
            }
        }
    })
}

/// Failures with a visible message are printed by the view
fn print_local_error<T>(result: Result<T, SimulatorError>) {
    if let Err(e @ (SimulatorError::Busy(_) | SimulatorError::StateMachine(_))) = result {
        println!("{e}");
    }
}

async fn interactive(controller: &SimulatorController) -> anyhow::Result<()> {
    controller.mount().await;
    let printer = spawn_printer(controller.subscribe());
    println!("{INTERACTIVE_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        match command {
            "quit" | "exit" => break,
            "help" => println!("{INTERACTIVE_HELP}"),
            "show" => print!("{}", view::render(&controller.snapshot())),
            "list" => {
                controller.refresh_scenarios().await;
                print!("{}", view::render_scenarios(&controller.snapshot().scenarios));
            }
            "name" => {
                controller.set_scenario_name(rest);
                if !controller.can_save() {
                    println!("save disabled");
                }
            }
            "email" => {
                controller.set_email(rest);
                if !controller.can_download() {
                    println!("report download disabled");
                }
            }
            "save" => print_local_error(controller.save_scenario().await),
            "report" => match controller.download_report().await {
                Ok(path) => println!("Report saved to {}", path.display()),
                Err(e) => print_local_error::<()>(Err(e)),
            },
            "load" | "delete" => match rest.parse::<ScenarioId>() {
                Ok(id) if command == "load" => print_local_error(controller.load_scenario(id).await),
                Ok(id) => print_local_error(controller.delete_scenario(id).await),
                Err(_) => println!("usage: {command} <id>"),
            },
            other => match other.parse::<InputField>() {
                Ok(field) => {
                    if let Err(e) = controller.set_field_text(field, rest) {
                        println!("ignored: {e}");
                    }
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    printer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let config = load_config(&matches)?;
    let controller = SimulatorController::from_config(config)?;

    match matches.subcommand() {
        Some(("simulate", args)) => simulate(&controller, inputs_from(args)?).await,
        Some(("scenarios", args)) => scenarios(&controller, args).await,
        Some(("report", args)) => report(&controller, args).await,
        Some(("health", _)) => {
            let health = controller.api().health().await?;
            println!("{}", health.status);
            if health.is_ok() {
                Ok(())
            } else {
                bail!("service reported {}", health.status)
            }
        }
        Some(("interactive", _)) => interactive(&controller).await,
        _ => unreachable!("subcommand required"),
    }
}
