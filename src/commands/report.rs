//! Handlers for the time-bucketed chart data and the dashboard summary.

use crate::args::{ChartArgs, SummaryArgs};
use crate::commands::{open_journal, plural, today, Out};
use crate::engine::{self, BucketReport, BucketRequest};
use crate::error::{ErrorType, IntoResult};
use crate::summary::{self, Summary};
use crate::{render, Config, Result};
use chrono::NaiveDate;

/// Buckets spending by day, week or month.
///
/// `--month` and `--year` pick the reference month and default to the current one. With
/// `--group`, each bucket holds a total per category instead of one total.
pub async fn chart(config: Config, args: ChartArgs) -> Result<Out<BucketReport>> {
    chart_at(config, args, today()).await
}

/// `chart`, with `today` supplied by the caller.
pub async fn chart_at(
    config: Config,
    args: ChartArgs,
    today: NaiveDate,
) -> Result<Out<BucketReport>> {
    let reference = args.period.reference(today).pub_result(ErrorType::Request)?;
    let journal = open_journal(&config).await?;
    let categories = journal.categories();

    let mut request =
        BucketRequest::new(journal.records(), args.period.by, today).reference(reference);
    if args.group {
        request = request.grouped(categories);
    }
    let report = engine::bucket(&request);

    let display = render::buckets(&report, categories, args.format, config.currency_symbol())
        .pub_result(ErrorType::Request)?;
    let mut message = format!(
        "Charted {} by {}, totalling {}",
        plural(report.buckets().len(), "period", "periods"),
        args.period.by,
        report.total().display_with(config.currency_symbol())
    );
    if report.unassigned() > 0 {
        message.push_str(&format!(
            " ({} outside these periods)",
            plural(report.unassigned(), "record", "records")
        ));
    }
    Ok(Out::new(message, report).with_display(display))
}

/// Shows the all-time total, the total for the selected time scope and the breakdown by
/// category.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<Summary>> {
    summary_at(config, args, today()).await
}

/// `summary`, with `today` supplied by the caller.
pub async fn summary_at(
    config: Config,
    args: SummaryArgs,
    today: NaiveDate,
) -> Result<Out<Summary>> {
    let reference = args.period.reference(today).pub_result(ErrorType::Request)?;
    let journal = open_journal(&config).await?;
    let summary = summary::summarize(journal.records(), args.period.by, Some(reference), today);

    let display = render::summary(&summary, args.format, config.currency_symbol())
        .pub_result(ErrorType::Request)?;
    let message = format!(
        "Spent {} in total, {} for the {} view",
        summary.total_all_time.display_with(config.currency_symbol()),
        summary.total_filtered.display_with(config.currency_symbol()),
        args.period.by
    );
    Ok(Out::new(message, summary).with_display(display))
}
