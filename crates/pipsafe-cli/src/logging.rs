use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Writes `LEVEL: message`, or `target - LEVEL - message` in verbose mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelPrefixFormat {
    with_target: bool,
}

impl LevelPrefixFormat {
    pub(crate) fn new(with_target: bool) -> Self {
        Self { with_target }
    }
}

pub(crate) fn event_prefix(level: &Level, target: &str, with_target: bool) -> String {
    if with_target {
        format!("{target} - {level} - ")
    } else {
        format!("{level}: ")
    }
}

impl<S, N> FormatEvent<S, N> for LevelPrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "{}",
            event_prefix(metadata.level(), metadata.target(), self.with_target)
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
