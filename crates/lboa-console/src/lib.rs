//! Console output for master initialization.
//!
//! Provides a `tracing` layer that renders the structured events emitted by
//! `lboa-init` as colored, one-line progress messages.
//!
//! ## Log Levels
//!
//! - **INFO**: Strategy and set covering lifecycle
//! - **DEBUG**: Individual relaxation and subproblem solves
//! - **WARN/ERROR**: Skipped attempts, iteration limits, infeasibility hints

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

const DEFAULT_FILTER: &str = "lboa_init=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default `lboa_init=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(InitConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

/// A tracing layer that formats initialization events with colors.
pub struct InitConsoleLayer;

impl<S: Subscriber> Layer<S> for InitConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("lboa_") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    strategy: Option<String>,
    state: Option<String>,
    duration_ms: Option<u64>,
    relaxation_solves: Option<u64>,
    iterations: Option<u64>,
    iteration_limit: Option<u64>,
    disjuncts: Option<u64>,
    uncovered: Option<u64>,
    mip_iteration: Option<u64>,
    nlp_iteration: Option<u64>,
    success: Option<bool>,
    feasible: Option<bool>,
    improved: Option<bool>,
    objective: Option<f64>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s),
            "strategy" => self.strategy = Some(s.trim_matches('"').to_string()),
            "state" => self.state = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "duration_ms" => self.duration_ms = Some(value),
            "relaxation_solves" => self.relaxation_solves = Some(value),
            "iterations" => self.iterations = Some(value),
            "iteration_limit" => self.iteration_limit = Some(value),
            "disjuncts" => self.disjuncts = Some(value),
            "uncovered" => self.uncovered = Some(value),
            "mip_iteration" => self.mip_iteration = Some(value),
            "nlp_iteration" => self.nlp_iteration = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            "lower_bound" => self.lower_bound = Some(value),
            "upper_bound" => self.upper_bound = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "success" => self.success = Some(value),
            "feasible" => self.feasible = Some(value),
            "improved" => self.improved = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "state" => self.state = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref() {
        Some("init_start") => format_init_start(v),
        Some("init_end") => format_init_end(v),
        Some("set_cover_start") => format_set_cover_start(v),
        Some("set_cover_end") => format_set_cover_end(v),
        Some("relaxation_solved") => format_relaxation(v),
        Some("subproblem_solved") => format_subproblem(v),
        Some(_) => String::new(),
        None => format_message(v, level),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_init_start(v: &EventVisitor) -> String {
    let strategy = v.strategy.as_deref().unwrap_or("unknown");
    format!(
        "{} {} Initialization {} started",
        format_elapsed(),
        "▶".bright_green().bold(),
        strategy.white().bold()
    )
}

fn format_init_end(v: &EventVisitor) -> String {
    let strategy = v.strategy.as_deref().unwrap_or("unknown");
    let status = if v.success.unwrap_or(false) {
        "OK".bright_green().bold().to_string()
    } else {
        "FAILED".bright_red().bold().to_string()
    };
    format!(
        "{} {} Initialization {} ended │ {} │ {} relaxation solves │ bounds {} │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        strategy.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.relaxation_solves.unwrap_or(0).bright_magenta(),
        format_bounds(v),
        status
    )
}

fn format_set_cover_start(v: &EventVisitor) -> String {
    format!(
        "{} {} Set covering │ {} of {} disjuncts uncovered │ {} iteration limit",
        format_elapsed(),
        "▶".bright_blue(),
        v.uncovered.unwrap_or(0).bright_yellow(),
        v.disjuncts.unwrap_or(0).bright_yellow(),
        v.iteration_limit.unwrap_or(0).bright_yellow()
    )
}

fn format_set_cover_end(v: &EventVisitor) -> String {
    let state = v.state.as_deref().unwrap_or("Unknown");
    let state = if state == "Solved" {
        state.bright_green().bold().to_string()
    } else {
        state.bright_red().bold().to_string()
    };
    format!(
        "{} {} Set covering {} │ {} iterations │ {} uncovered",
        format_elapsed(),
        "◀".bright_blue(),
        state,
        v.iterations.unwrap_or(0).white(),
        v.uncovered.unwrap_or(0).bright_yellow()
    )
}

fn format_relaxation(v: &EventVisitor) -> String {
    let icon = if v.feasible.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };
    format!(
        "{} {} Relaxation {:>5}",
        format_elapsed(),
        icon,
        v.mip_iteration.unwrap_or(0).bright_black()
    )
}

fn format_subproblem(v: &EventVisitor) -> String {
    let marker = if v.improved.unwrap_or(false) { "★" } else { "·" };
    format!(
        "{} {} Subproblem {:>5} │ objective {} │ bounds {}",
        format_elapsed(),
        marker.bright_cyan(),
        v.nlp_iteration.unwrap_or(0).bright_black(),
        format_bound(v.objective).bright_white(),
        format_bounds(v)
    )
}

fn format_message(v: &EventVisitor, level: Level) -> String {
    let Some(message) = v.message.as_deref() else {
        return String::new();
    };
    match level {
        Level::ERROR => format!("{} {} {}", format_elapsed(), "✗".bright_red().bold(), message.red()),
        Level::WARN => format!("{} {} {}", format_elapsed(), "!".bright_yellow().bold(), message.yellow()),
        Level::INFO => format!("{} {} {}", format_elapsed(), "·".bright_black(), message),
        _ => String::new(),
    }
}

fn format_bounds(v: &EventVisitor) -> String {
    format!(
        "[{}, {}]",
        format_bound(v.lower_bound),
        format_bound(v.upper_bound)
    )
}

fn format_bound(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v == f64::INFINITY => "+inf".to_string(),
        Some(v) if v == f64::NEG_INFINITY => "-inf".to_string(),
        Some(v) => format!("{:.6}", v),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
