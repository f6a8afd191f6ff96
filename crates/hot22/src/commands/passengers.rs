//! Passenger command handlers.

use tabled::Tabled;

use hot22_core::domains::passengers::{PassengerResourceAction, PassengersAction};
use hot22_core::{Dashboard, HistoryRecord, Passenger, PassengerFilter};

use crate::cli::{GlobalOpts, PassengersArgs, PassengersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PassengerRow {
    #[tabled(rename = "TRNN")]
    transaction_number: String,
    #[tabled(rename = "AGTN")]
    agent_code: String,
    #[tabled(rename = "Passenger")]
    passenger_name: String,
    #[tabled(rename = "Ticket")]
    ticket_number: String,
    #[tabled(rename = "Issued")]
    issue_date: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&Passenger> for PassengerRow {
    fn from(p: &Passenger) -> Self {
        Self {
            transaction_number: p.transaction_number.clone(),
            agent_code: output::opt(p.agent_code.as_deref()),
            passenger_name: output::opt(p.passenger_name.as_deref()),
            ticket_number: output::opt(p.ticket_number.as_deref()),
            issue_date: output::opt(p.issue_date.as_deref()),
            amount: amount(p),
        }
    }
}

fn amount(p: &Passenger) -> String {
    match (p.amount, p.currency.as_deref()) {
        (Some(a), Some(cur)) => format!("{a:.2} {cur}"),
        (Some(a), None) => format!("{a:.2}"),
        (None, _) => "-".into(),
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Record")]
    record_type: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(h: &HistoryRecord) -> Self {
        Self {
            record_type: output::opt(h.record_type.as_deref()),
            created_at: output::opt(h.created_at.as_deref()),
        }
    }
}

fn detail(p: &Passenger) -> String {
    output::detail_block(&[
        ("TRNN", p.transaction_number.clone()),
        ("AGTN", output::opt(p.agent_code.as_deref())),
        ("Passenger", output::opt(p.passenger_name.as_deref())),
        ("Ticket", output::opt(p.ticket_number.as_deref())),
        ("Issued", output::opt(p.issue_date.as_deref())),
        ("Code", output::opt(p.transaction_code.as_deref())),
        ("Amount", amount(p)),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: PassengersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PassengersCommand::List {
            list,
            dates,
            search,
            agent,
            ticket,
        } => {
            let (start, end) = util::parse_range(&dates)?;
            let mut changes = vec![
                PassengerFilter::Search(search),
                PassengerFilter::AgentCode(agent),
                PassengerFilter::TicketNumber(ticket),
                PassengerFilter::DateRange(start, end),
            ];
            if let Some(sort) = util::sort(&list) {
                changes.push(PassengerFilter::Sort(sort));
            }
            let actions: Vec<PassengerResourceAction> = util::list_actions(changes, &list);
            for action in actions {
                dashboard.passengers().dispatch(PassengersAction::Resource(action));
            }

            let page = dashboard.load_passengers().await?;
            let out = output::render_list(
                global.output,
                &page.data,
                |p| PassengerRow::from(p),
                |p| p.transaction_number.clone(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_pagination(global.output, &page.pagination, global.quiet);
            Ok(())
        }

        PassengersCommand::Get { transaction_number } => {
            let passenger = dashboard.load_passenger(&transaction_number).await?;
            let out = output::render_single(global.output, passenger.as_ref(), detail, |p| {
                p.transaction_number.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassengersCommand::History { transaction_number } => {
            let history = dashboard.load_passenger_history(&transaction_number).await?;
            let out = output::render_list(
                global.output,
                history.as_slice(),
                |h| HistoryRow::from(h),
                |h| h.record_type.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
