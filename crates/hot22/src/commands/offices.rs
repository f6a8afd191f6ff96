//! Office command handlers.

use tabled::Tabled;

use hot22_core::domains::offices::OfficesAction;
use hot22_core::{Dashboard, Office, OfficeFilter};

use crate::cli::{GlobalOpts, OfficesArgs, OfficesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OfficeRow {
    #[tabled(rename = "AGTN")]
    agent_code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Transactions")]
    transactions: String,
}

impl From<&Office> for OfficeRow {
    fn from(o: &Office) -> Self {
        Self {
            agent_code: o.agent_code.clone(),
            name: output::opt(o.name.as_deref()),
            city: output::opt(o.city.as_deref()),
            country: output::opt(o.country.as_deref()),
            status: output::opt(o.status.as_deref()),
            transactions: output::opt(o.total_transactions),
        }
    }
}

fn detail(o: &Office) -> String {
    output::detail_block(&[
        ("AGTN", o.agent_code.clone()),
        ("Name", output::opt(o.name.as_deref())),
        ("City", output::opt(o.city.as_deref())),
        ("Country", output::opt(o.country.as_deref())),
        ("Status", output::opt(o.status.as_deref())),
        ("Transactions", output::opt(o.total_transactions)),
        ("Amount", output::opt(o.total_amount.map(|a| format!("{a:.2}")))),
        ("Last activity", output::opt(o.last_activity.as_deref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: OfficesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OfficesCommand::List {
            list,
            search,
            city,
            country,
            status,
        } => {
            let mut changes = vec![
                OfficeFilter::Search(search),
                OfficeFilter::City(city),
                OfficeFilter::Country(country),
                OfficeFilter::Status(status),
            ];
            if let Some(sort) = util::sort(&list) {
                changes.push(OfficeFilter::Sort(sort));
            }
            let actions: Vec<OfficesAction> = util::list_actions(changes, &list);
            for action in actions {
                dashboard.offices().dispatch(action);
            }

            let page = dashboard.load_offices().await?;
            let out = output::render_list(
                global.output,
                &page.data,
                |o| OfficeRow::from(o),
                |o| o.agent_code.clone(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_pagination(global.output, &page.pagination, global.quiet);
            Ok(())
        }

        OfficesCommand::Get { agent_code } => {
            let office = dashboard.load_office(&agent_code).await?;
            let out = output::render_single(global.output, office.as_ref(), detail, |o| {
                o.agent_code.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
