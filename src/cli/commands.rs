//! Command dispatch: maps parsed arguments onto services and prints results.

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{IoResultExt, OperationReport, TreeService};
use crate::cli::args::{Cli, Commands, ConfigCommands, TracesCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::{verify, TreeRender};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `rbtrace --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "rbtrace", &mut io::stdout());
        return Ok(());
    }

    let settings = build_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Insert { values } => cmd_insert(&container, values),
        Commands::Remove { values } => cmd_remove(&container, values),
        Commands::Show { json } => cmd_show(&container, *json),
        Commands::Stats => cmd_stats(&container),
        Commands::Check => cmd_check(&container),
        Commands::Clear => cmd_clear(&container),
        Commands::Traces { command } => match command {
            TracesCommands::List => cmd_traces_list(&container),
            TracesCommands::Show { name, json } => cmd_traces_show(&container, name, *json),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&container),
            ConfigCommands::Path => cmd_config_path(cli),
            ConfigCommands::Init { global } => cmd_config_init(cli, *global),
        },
        Commands::Completion { .. } => Ok(()),
    }
}

/// Layered settings with command line flags applied last.
fn build_settings(cli: &Cli) -> CliResult<Settings> {
    let local_dir = local_dir(cli)?;
    let mut settings = Settings::load(Some(&local_dir))?;
    if let Some(state) = &cli.state {
        settings.state_file = Some(state.clone());
    }
    if cli.trace {
        settings.trace = true;
    }
    if let Some(label) = &cli.label {
        settings.label = label.clone();
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

fn print_report(report: &OperationReport) {
    let value = report.value.map(|v| v.to_string()).unwrap_or_default();
    if report.success {
        output::success(&format!("{}: {}", report.message, value));
    } else {
        output::warning(&format!("{}: {}", report.message, value));
    }
    if let Some(path) = &report.trace_file {
        output::detail(&format!("trace: {}", path.display()));
    }
}

fn print_tree(service: &TreeService) {
    output::info(&service.tree().to_tree_string());
}

#[instrument(level = "debug", skip(container))]
fn cmd_insert(container: &ServiceContainer, values: &[i64]) -> CliResult<()> {
    let mut service = container.tree_service()?;
    for &value in values {
        let report = service.insert(value)?;
        print_report(&report);
    }
    service.save()?;
    print_tree(&service);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_remove(container: &ServiceContainer, values: &[i64]) -> CliResult<()> {
    let mut service = container.tree_service()?;
    for &value in values {
        let report = service.remove(value)?;
        print_report(&report);
    }
    service.save()?;
    print_tree(&service);
    Ok(())
}

fn cmd_show(container: &ServiceContainer, json: bool) -> CliResult<()> {
    let service = container.tree_service()?;
    if json {
        let text = service
            .tree()
            .to_document()
            .to_json_string(container.settings.pretty)
            .with_path_context("serialize state", service.state_store().path())?;
        output::info(&text);
    } else {
        print_tree(&service);
    }
    Ok(())
}

fn cmd_stats(container: &ServiceContainer) -> CliResult<()> {
    let service = container.tree_service()?;
    let tree = service.tree();
    output::header("Tree statistics");
    output::action("nodes", &tree.len());
    output::action("height", &tree.height());
    output::action("black height", &tree.black_height());
    output::action("state", &service.state_store().path().display());
    Ok(())
}

fn cmd_check(container: &ServiceContainer) -> CliResult<()> {
    let service = container.tree_service()?;
    match verify(service.tree()) {
        Ok(black_height) => {
            output::success(&format!(
                "valid red-black tree: {} nodes, black height {}",
                service.tree().len(),
                black_height
            ));
            Ok(())
        }
        Err(violation) => Err(CliError::Invariant(violation.to_string())),
    }
}

fn cmd_clear(container: &ServiceContainer) -> CliResult<()> {
    let mut service = container.tree_service()?;
    let report = service.clear();
    service.save()?;
    output::success(&report.message);
    Ok(())
}

fn cmd_traces_list(container: &ServiceContainer) -> CliResult<()> {
    let store = container.trace_store();
    let names = store.list()?;
    output::header(&store.dir().display());
    if names.is_empty() {
        output::detail("(no traces)");
    }
    for name in names {
        output::detail(&name);
    }
    Ok(())
}

fn cmd_traces_show(container: &ServiceContainer, name: &str, json: bool) -> CliResult<()> {
    let store = container.trace_store();
    let trace = store.load(name)?;

    if json {
        let path = store.dir().join(name);
        let text = serde_json::to_string_pretty(&trace).with_path_context("serialize trace", &path)?;
        output::info(&text);
        return Ok(());
    }

    output::header(&format!(
        "{} {} [{}]: {} steps",
        trace.operation,
        trace.value,
        trace.label,
        trace.steps.len()
    ));
    for (i, step) in trace.steps.iter().enumerate() {
        output::action(
            &format!("{:>3} {}", i + 1, step.operation),
            &format!("{} (+{}us)", step.description, step.elapsed_us),
        );
        output::info(&step.tree.to_tree_string());
    }
    Ok(())
}

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    let local = local_config_path(&local_dir(cli)?);
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::warning("no global config directory on this platform"),
    }
    output::action("local", &local.display());
    Ok(())
}

fn cmd_config_init(cli: &Cli, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("no global config directory on this platform".into()))?
    } else {
        local_config_path(&local_dir(cli)?)
    };
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if global {
        if let Some(dir) = global_config_dir() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
        }
    }
    std::fs::write(&path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}
