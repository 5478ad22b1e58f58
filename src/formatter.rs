//! Log line layout shared by the console and the log file.
//!
//! Every line carries the wall-clock time and the simulation tick it was emitted on, so log output
//! can be lined up with gameplay:
//!
//! ```text
//! 2026-10-18 21:04:11.532 t:01A4  INFO level{id=2}> christmas_adventures::systems::rules: Level finished outcome=Win
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Simulation ticks since startup, across every level played.
static TICKS: AtomicU64 = AtomicU64::new(0);

const TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// Counts one simulation tick. Called once per level tick.
pub fn increment_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn tick_count() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// The tick label printed on each line: the low 16 bits in hex.
pub fn tick_label(tick: u64) -> String {
    format!("t:{:04X}", tick & 0xFFFF)
}

#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
    Color(&'static str),
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Dim => "\x1b[2m",
            Style::Bold => "\x1b[1m",
            Style::Color(code) => code,
        }
    }
}

fn paint(writer: &mut Writer<'_>, style: Style, content: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{}{}\x1b[0m", style.code(), content)
    } else {
        write!(writer, "{}", content)
    }
}

/// Fixed-width label and ANSI color of a level.
fn level_style(level: &Level) -> (&'static str, Style) {
    match *level {
        Level::TRACE => ("TRACE", Style::Color("\x1b[35m")),
        Level::DEBUG => ("DEBUG", Style::Color("\x1b[34m")),
        Level::INFO => (" INFO", Style::Color("\x1b[32m")),
        Level::WARN => (" WARN", Style::Color("\x1b[33m")),
        Level::ERROR => ("ERROR", Style::Color("\x1b[31m")),
    }
}

/// Formats events as `date time tick level spans target: fields`.
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP).map_err(|_| fmt::Error)?;
        paint(&mut writer, Style::Dim, timestamp)?;
        writer.write_char(' ')?;
        paint(&mut writer, Style::Dim, tick_label(tick_count()))?;
        writer.write_char(' ')?;

        let (label, style) = level_style(meta.level());
        paint(&mut writer, style, label)?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                paint(&mut writer, Style::Bold, span.metadata().name())?;
                if let Some(fields) = span.extensions().get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                paint(&mut writer, Style::Dim, ">")?;
            }
            writer.write_char(' ')?;
        }

        paint(&mut writer, Style::Dim, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
