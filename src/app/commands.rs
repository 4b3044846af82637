use crate::app::cli::{Cli, CliCommand, ExtensionCommand};
use crate::config::LauncherConfig;
use crate::extension::{parse_cli_params, ExtensionRegistry, Mode, ParameterBinding};
use crate::protocol::{decode_output, Action, ListItem, Page, PageBody, PRIMARY_SHORTCUT};
use crate::runner::{
    build_invocation, check_status, run_captured, run_discarding_output, run_interactive,
};
use crate::services::SystemServices;
use crate::shared::{Logger, PageError};
use crate::tui::{
    run_tui, terminal_size, Command, ExitReason, ListView, Page as StackPage, PageStack, Screen,
};
use std::io::IsTerminal;
use std::sync::Arc;

/// What the launcher shows first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Root,
    Info,
    Extension(String),
    Script {
        extension: String,
        script: String,
        params: ParameterBinding,
    },
}

/// Runs one CLI invocation and returns the process exit status.
pub fn run_cli(cli: Cli) -> Result<i32, String> {
    let config = LauncherConfig::from_env().map_err(|err| err.to_string())?;
    let logger = Logger::to_file(&config.log_file);
    let registry = ExtensionRegistry::load(&config.extension_root).map_err(|err| err.to_string())?;
    for warning in registry.warnings() {
        logger.warn("extension.warning", &warning.to_string());
    }

    let target = match cli.command {
        Some(CliCommand::Extension {
            action: ExtensionCommand::List,
        }) => {
            for line in extension_list_lines(&registry) {
                println!("{line}");
            }
            return Ok(0);
        }
        Some(CliCommand::Run {
            extension,
            script,
            params,
        }) => resolve_run_target(extension, script, &params, &registry)?,
        Some(CliCommand::Info) => LaunchTarget::Info,
        None => LaunchTarget::Root,
    };

    if !std::io::stderr().is_terminal() {
        return run_headless(&target, &registry, &config);
    }
    run_interactive_session(&target, &registry, &config, &logger)
}

/// Target for `run <extension> [script] [-p name=value]...`.
pub fn resolve_run_target(
    extension: String,
    script: Option<String>,
    params: &[String],
    registry: &ExtensionRegistry,
) -> Result<LaunchTarget, String> {
    let Some(script) = script else {
        registry.extension(&extension).map_err(|err| err.to_string())?;
        return Ok(LaunchTarget::Extension(extension));
    };
    let (_, script_def) = registry
        .resolve(&extension, &script)
        .map_err(|err| err.to_string())?;
    let params = parse_cli_params(&script, script_def, params).map_err(|err| err.to_string())?;
    Ok(LaunchTarget::Script {
        extension,
        script,
        params,
    })
}

pub fn extension_list_lines(registry: &ExtensionRegistry) -> Vec<String> {
    registry
        .iter()
        .map(|extension| {
            if extension.description.is_empty() {
                extension.name.clone()
            } else {
                format!("{}\t{}", extension.name, extension.description)
            }
        })
        .collect()
}

pub fn info_items(config: &LauncherConfig) -> Vec<ListItem> {
    [
        ("Version", env!("CARGO_PKG_VERSION").to_string()),
        (
            "Extension Root",
            config.extension_root.display().to_string(),
        ),
        ("Log File", config.log_file.display().to_string()),
    ]
    .into_iter()
    .map(|(title, value)| {
        ListItem::new(title)
            .with_subtitle(value.clone())
            .with_action(Action::copy("Copy", value).with_shortcut(PRIMARY_SHORTCUT))
    })
    .collect()
}

fn static_page(
    target: &LaunchTarget,
    registry: &ExtensionRegistry,
    config: &LauncherConfig,
) -> Result<Option<Page>, String> {
    match target {
        LaunchTarget::Root => Ok(Some(Page::list("Sunbeam", registry.root_list_items()))),
        LaunchTarget::Info => Ok(Some(Page::list("Info", info_items(config)))),
        LaunchTarget::Extension(name) => {
            let extension = registry.extension(name).map_err(|err| err.to_string())?;
            let items = registry
                .extension_list_items(name)
                .map_err(|err| err.to_string())?;
            Ok(Some(Page::list(extension.title.clone(), items)))
        }
        LaunchTarget::Script { .. } => Ok(None),
    }
}

/// Prints the first page as JSON on stdout instead of starting the TUI.
pub fn run_headless(
    target: &LaunchTarget,
    registry: &ExtensionRegistry,
    config: &LauncherConfig,
) -> Result<i32, String> {
    let page = match static_page(target, registry, config)? {
        Some(page) => page,
        None => {
            let LaunchTarget::Script {
                extension,
                script,
                params,
            } = target
            else {
                return Ok(0);
            };
            let (ext, script_def) = registry
                .resolve(extension, script)
                .map_err(|err| err.to_string())?;
            let invocation = build_invocation(script, script_def, params, &ext.dir)
                .map_err(|err| err.to_string())?;
            if script_def.mode == Mode::Silent {
                run_interactive(&invocation)
                    .and_then(check_status)
                    .map_err(|err| err.to_string())?;
                return Ok(0);
            }
            let output = run_captured(&invocation).map_err(|err| err.to_string())?;
            decode_output(&script_def.mode, &ext.name, &script_def.title, &output.stdout)
                .map_err(|err| err.to_string())?
        }
    };
    let encoded = serde_json::to_string_pretty(&page)
        .map_err(|err| format!("failed to encode page: {err}"))?;
    println!("{encoded}");
    Ok(0)
}

fn run_interactive_session(
    target: &LaunchTarget,
    registry: &ExtensionRegistry,
    config: &LauncherConfig,
    logger: &Logger,
) -> Result<i32, String> {
    let options = config.viewport();
    let terminal = terminal_size().map_err(|err| err.to_string())?;
    let (mut stack, initial): (PageStack<'_>, Vec<Command>) = match target {
        LaunchTarget::Script {
            extension,
            script,
            params,
        } => PageStack::for_script(
            registry,
            options,
            terminal,
            extension,
            script,
            params.clone(),
        )
        .map_err(|err| err.to_string())?,
        other => {
            let Some(Page { title, body }) = static_page(other, registry, config)? else {
                return Ok(0);
            };
            let items = match body {
                PageBody::List { items } => items,
                PageBody::Detail { .. } => Vec::new(),
            };
            let root = StackPage::List(ListView::new(title).with_items(items));
            (PageStack::new(registry, options, terminal, root), Vec::new())
        }
    };

    let reason = run_tui(
        &mut stack,
        initial,
        Arc::new(SystemServices::default()),
        logger,
        Screen::for_options(&options),
    )
    .map_err(|err| err.to_string())?;
    logger.info("app.exit", reason.as_str());
    finish(reason, logger)
}

/// Runs whatever has to happen after the terminal is restored and picks the
/// exit status.
fn finish(reason: ExitReason, logger: &Logger) -> Result<i32, String> {
    let ExitReason::Exec { invocation, silent } = reason else {
        return Ok(0);
    };
    logger.info(
        "effect.exec",
        &format!("silent={silent} command={}", invocation.command_form()),
    );
    let status = if silent {
        run_discarding_output(&invocation)
    } else {
        run_interactive(&invocation)
    }
    .map_err(|err: PageError| err.to_string())?;
    Ok(status.code().unwrap_or(1))
}
