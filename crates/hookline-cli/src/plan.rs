use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use hookline_dispatch::{
    same_listener, DispatcherConfig, Dispatcher, Event, EventName, Listener, ListenerError,
    MutableListenerRegistry, Priority, SharedListener,
};

/// Event carried through a plan dispatch: records who ran.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TraceEvent {
    pub ran: Vec<String>,
    pub stopped_by: Option<String>,
}

impl Event for TraceEvent {
    fn is_propagation_stopped(&self) -> bool {
        self.stopped_by.is_some()
    }
}

/// One `[[listener]]` table of a plan file.
#[derive(Clone, Debug, Deserialize)]
pub struct ListenerSpec {
    pub name: String,
    pub events: Vec<EventName>,
    #[serde(default)]
    pub priority: Priority,
    /// Stop propagation after this listener has run.
    #[serde(default)]
    pub stop: bool,
    /// Return an error instead of succeeding.
    #[serde(default)]
    pub fail: bool,
}

/// A listener plan: dispatcher settings plus the listeners to register.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default, rename = "listener")]
    pub listeners: Vec<ListenerSpec>,
}

impl Plan {
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let plan: Plan = toml::from_str(source).context("invalid plan file")?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plan {}", path.display()))?;
        Self::from_toml(&source)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (i, entry) in self.listeners.iter().enumerate() {
            if entry.name.trim().is_empty() {
                bail!("listener #{i} has an empty name");
            }
            if entry.events.is_empty() {
                bail!("listener '{}' does not listen to any event", entry.name);
            }
            if let Some(blank) = entry.events.iter().find(|e| e.as_str().trim().is_empty()) {
                bail!("listener '{}' lists a blank event name {blank:?}", entry.name);
            }
        }
        Ok(())
    }

    /// Register every listener of the plan on a fresh dispatcher.
    pub fn build(&self, config: DispatcherConfig) -> anyhow::Result<BuiltPlan> {
        let registry = Dispatcher::with_config(config);
        let mut names = Vec::with_capacity(self.listeners.len());
        for entry in &self.listeners {
            let listener: SharedListener<TraceEvent> = Arc::new(PlanListener {
                name: entry.name.clone(),
                stop: entry.stop,
                fail: entry.fail,
            });
            registry.add_listener(
                entry.events.clone().into(),
                Arc::clone(&listener),
                entry.priority,
            )?;
            names.push((listener, entry.name.clone()));
        }
        Ok(BuiltPlan { registry, names })
    }
}

/// A dispatcher populated from a plan, with listener names for display.
pub struct BuiltPlan {
    pub registry: Dispatcher<TraceEvent>,
    names: Vec<(SharedListener<TraceEvent>, String)>,
}

impl BuiltPlan {
    /// Display name of a registered listener.
    pub fn name_of(&self, listener: &SharedListener<TraceEvent>) -> &str {
        self.names
            .iter()
            .find(|(l, _)| same_listener(l, listener))
            .map(|(_, name)| name.as_str())
            .unwrap_or("<unknown>")
    }
}

struct PlanListener {
    name: String,
    stop: bool,
    fail: bool,
}

impl Listener<TraceEvent> for PlanListener {
    fn handle(&self, event: &mut TraceEvent, name: &EventName) -> Result<(), ListenerError> {
        if self.fail {
            return Err(format!("listener '{}' failed on '{name}'", self.name).into());
        }
        event.ran.push(self.name.clone());
        if self.stop {
            event.stopped_by = Some(self.name.clone());
        }
        Ok(())
    }
}
