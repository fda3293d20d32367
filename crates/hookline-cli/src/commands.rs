use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use hookline_dispatch::{
    DispatchError, DispatchResult, ErrorPolicy, EventDispatcher, ListenerRegistry, Priority,
    SharedListener,
};

use crate::cli::*;
use crate::plan::{BuiltPlan, Plan, TraceEvent};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Plan(args) => cmd_plan(args, cli.format),
        Command::Dispatch(args) => cmd_dispatch(args, cli.format),
    }
}

fn cmd_plan(args: PlanArgs, format: OutputFormat) -> anyhow::Result<()> {
    let plan = Plan::load(&args.file)?;
    let built = plan.build(plan.dispatcher.clone())?;
    debug!(file = %args.file.display(), listeners = plan.listeners.len(), "plan loaded");
    print!("{}", render_plan(&built, args.event.as_deref(), format)?);
    Ok(())
}

fn cmd_dispatch(args: DispatchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let plan = Plan::load(&args.file)?;
    let mut config = plan.dispatcher.clone();
    if args.continue_on_error {
        config.error_policy = ErrorPolicy::ContinueOnError;
    }
    let built = plan.build(config)?;
    debug!(event = %args.event, frozen = args.frozen, "dispatching plan event");

    let (trace, outcome) = dispatch_trace(&built, &args.event, args.frozen);
    print!(
        "{}",
        render_dispatch(&args.event, args.frozen, &trace, outcome.as_ref().err(), format)?
    );
    outcome.map_err(|e| anyhow::Error::new(e).context(format!("dispatch of '{}' failed", args.event)))
}

/// Dispatch a fresh trace event, through the read-only view when `frozen`.
fn dispatch_trace(built: &BuiltPlan, event: &str, frozen: bool) -> (TraceEvent, DispatchResult<()>) {
    let view = built.registry.freeze();
    let dispatcher: &dyn EventDispatcher<TraceEvent> = if frozen { &view } else { &built.registry };
    let mut trace = TraceEvent::default();
    let outcome = dispatcher.dispatch(&mut trace, event).map(|_| ());
    (trace, outcome)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventListing {
    event: String,
    listeners: Vec<ListenerRow>,
}

#[derive(Debug, Serialize)]
struct ListenerRow {
    name: String,
    priority: Option<Priority>,
}

fn plan_listing(built: &BuiltPlan, filter: Option<&str>) -> Vec<EventListing> {
    let row = |event: &str, listeners: &[SharedListener<TraceEvent>]| {
        EventListing {
            event: event.to_string(),
            listeners: listeners
                .iter()
                .map(|l| ListenerRow {
                    name: built.name_of(l).to_string(),
                    priority: built.registry.listener_priority(event, l),
                })
                .collect(),
        }
    };
    match filter {
        Some(event) => vec![row(event, &built.registry.listeners(event))],
        None => built
            .registry
            .all_listeners()
            .iter()
            .map(|(event, listeners)| row(event.as_str(), listeners))
            .collect(),
    }
}

fn render_plan(built: &BuiltPlan, filter: Option<&str>, format: OutputFormat) -> anyhow::Result<String> {
    let listing = plan_listing(built, filter);
    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&listing)?));
    }

    let mut out = String::new();
    if listing.is_empty() {
        out.push_str("No listeners registered.\n");
    }
    for entry in &listing {
        out.push_str(&format!("{}\n", entry.event.bold()));
        if entry.listeners.is_empty() {
            out.push_str(&format!("  {}\n", "(no listeners)".dimmed()));
        }
        for row in &entry.listeners {
            let priority = row.priority.map_or_else(|| "?".to_string(), |p| p.to_string());
            out.push_str(&format!("  {:>6}  {}\n", priority.cyan(), row.name));
        }
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct DispatchReport<'a> {
    event: &'a str,
    frozen: bool,
    ran: &'a [String],
    stopped_by: Option<&'a str>,
    error: Option<String>,
}

fn render_dispatch(
    event: &str,
    frozen: bool,
    trace: &TraceEvent,
    error: Option<&DispatchError>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let report = DispatchReport {
            event,
            frozen,
            ran: &trace.ran,
            stopped_by: trace.stopped_by.as_deref(),
            error: error.map(ToString::to_string),
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&report)?));
    }

    let mut out = String::new();
    let via = if frozen { " (read-only view)" } else { "" };
    out.push_str(&format!("Dispatched {}{}\n", event.yellow().bold(), via));
    if trace.ran.is_empty() {
        out.push_str(&format!("  {}\n", "no listeners ran".dimmed()));
    }
    for name in &trace.ran {
        out.push_str(&format!("  {} {}\n", "✓".green(), name));
    }
    if let Some(by) = &trace.stopped_by {
        out.push_str(&format!("  propagation stopped by {}\n", by.bold()));
    }
    match error {
        Some(DispatchError::ListenersFailed { failures, .. }) => {
            for failure in failures {
                out.push_str(&format!("  {} {}\n", "✗".red(), failure.source));
            }
        }
        Some(err) => out.push_str(&format!("  {} {}\n", "✗".red(), err)),
        None => {}
    }
    Ok(out)
}
