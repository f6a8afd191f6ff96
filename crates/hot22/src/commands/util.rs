//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::NaiveDate;

use hot22_core::{Filters, ResourceAction, Sort, SortOrder};

use crate::cli::{DateRangeArgs, ListArgs, SortOrderArg};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, refuses instead of guessing.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| CliError::Validation {
                field: field.into(),
                reason: format!("expected YYYY-MM-DD, got '{v}'"),
            })
        })
        .transpose()
}

pub fn parse_range(
    dates: &DateRangeArgs,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CliError> {
    let from = parse_date("from", dates.from.as_deref())?;
    let to = parse_date("to", dates.to.as_deref())?;
    if let (Some(start), Some(end)) = (from, to) {
        if start > end {
            return Err(CliError::Validation {
                field: "from".into(),
                reason: format!("{start} is after {end}"),
            });
        }
    }
    Ok((from, to))
}

/// `10s`, `1m30s`, ... via humantime.
pub fn parse_interval(field: &str, value: &str) -> Result<Duration, CliError> {
    let interval = humantime::parse_duration(value.trim()).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("'{value}': {e}"),
    })?;
    if interval < Duration::from_secs(1) {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must be at least 1s".into(),
        });
    }
    Ok(interval)
}

pub fn sort(list: &ListArgs) -> Option<Sort> {
    if list.sort_by.is_none() && list.order.is_none() {
        return None;
    }
    Some(Sort {
        by: list.sort_by.clone(),
        order: list.order.map(|o| match o {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }),
    })
}

/// Filter edits first (each resets to page 1), then limit, then page.
pub fn list_actions<R, F: Filters, D>(
    changes: Vec<F::Change>,
    list: &ListArgs,
) -> Vec<ResourceAction<R, F, D>> {
    let mut actions: Vec<_> = changes.into_iter().map(ResourceAction::SetFilter).collect();
    if let Some(limit) = list.limit {
        actions.push(ResourceAction::SetLimit(limit));
    }
    actions.push(ResourceAction::SetPage(list.page));
    actions
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("from", Some("2024-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(matches!(
            parse_date("from", Some("01/03/2024")),
            Err(CliError::Validation { .. })
        ));
        assert_eq!(parse_date("from", None).unwrap(), None);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let dates = DateRangeArgs {
            from: Some("2024-03-02".into()),
            to: Some("2024-03-01".into()),
        };
        assert!(parse_range(&dates).is_err());
    }

    #[test]
    fn intervals_use_humantime() {
        assert_eq!(parse_interval("interval", "1m30s").unwrap(), Duration::from_secs(90));
        assert!(parse_interval("interval", "500ms").is_err());
        assert!(parse_interval("interval", "soon").is_err());
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Delete?", "cleanup", true).unwrap());
    }
}
