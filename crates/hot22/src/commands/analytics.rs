//! Analytics report handlers.

use std::collections::BTreeMap;

use hot22_core::domains::analytics::AnalyticsAction;
use hot22_core::{AnalyticsFilter, AnalyticsReport, Dashboard, GroupBy};

use crate::cli::{AnalyticsArgs, GlobalOpts, GroupByArg, ReportArg};
use crate::error::CliError;
use crate::output;

use super::util;

fn to_report(arg: ReportArg) -> AnalyticsReport {
    match arg {
        ReportArg::Revenue => AnalyticsReport::Revenue,
        ReportArg::Commission => AnalyticsReport::Commission,
        ReportArg::Performance => AnalyticsReport::Performance,
        ReportArg::TravelPatterns => AnalyticsReport::TravelPatterns,
    }
}

fn to_group_by(arg: GroupByArg) -> GroupBy {
    match arg {
        GroupByArg::Day => GroupBy::Day,
        GroupByArg::Week => GroupBy::Week,
        GroupByArg::Month => GroupBy::Month,
        GroupByArg::Year => GroupBy::Year,
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (start, end) = util::parse_range(&args.dates)?;
    for change in [
        AnalyticsFilter::DateRange(start, end),
        AnalyticsFilter::GroupBy(args.group_by.map(to_group_by)),
        AnalyticsFilter::AgentCode(args.agent),
    ] {
        dashboard
            .analytics()
            .dispatch(AnalyticsAction::SetFilter(change));
    }

    if let Some(arg) = args.report {
        let report = to_report(arg);
        dashboard
            .analytics()
            .dispatch(AnalyticsAction::SetActive(report));
        let value = dashboard.load_analytics(report).await?;
        let out = output::render_single(
            global.output,
            value.as_ref(),
            output::json_view,
            ToString::to_string,
        )?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    // Every report: print whatever loaded, then surface the first failure.
    let outcome = dashboard.load_all_analytics().await;
    let loaded: BTreeMap<String, serde_json::Value> = dashboard.analytics().read(|s| {
        s.reports
            .iter()
            .filter_map(|(r, slice)| slice.data.clone().map(|v| (r.to_string(), v)))
            .collect()
    });
    let out = output::render_single(
        global.output,
        &loaded,
        |reports| {
            reports
                .iter()
                .map(|(name, value)| format!("── {name} ──\n{}", output::json_view(value)))
                .collect::<Vec<_>>()
                .join("\n\n")
        },
        |reports| reports.keys().cloned().collect::<Vec<_>>().join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    outcome.map_err(CliError::from)
}
