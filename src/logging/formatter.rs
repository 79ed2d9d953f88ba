use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event format wrapping each field in brackets:
/// `[TIMESTAMP] [LEVEL] [FUNCTION] [TARGET: FILE:LINE]: MESSAGE`
///
/// FUNCTION is the innermost span name (set by `#[instrument]`), or the last
/// segment of the target when the event has no span.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "[{}]  ", now.format("%Y-%m-%dT%H:%M:%S%.6f"))?;
        write!(writer, "[{:5}] ", metadata.level())?;

        let function_name = ctx
            .event_scope()
            .and_then(|scope| scope.from_root().last().map(|span| span.name()))
            .unwrap_or_else(|| target_leaf(metadata.target()));
        write!(writer, "[{}] ", function_name)?;

        match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => {
                write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?
            }
            _ => write!(writer, "[{}]: ", metadata.target())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn target_leaf(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_leaf() {
        assert_eq!(
            target_leaf("leaf_dataset_tools::core::analysis::rebalancer"),
            "rebalancer"
        );
        assert_eq!(target_leaf("balance"), "balance");
    }
}
