// Offices: a plain resource slice keyed by `AGTN`.

use hot22_api::Office;

use crate::filters::OfficeFilters;
use crate::store::{Keyed, ResourceAction, ResourceState};

impl Keyed for Office {
    fn key(&self) -> &str {
        &self.agent_code
    }
}

pub type OfficesState = ResourceState<Office, OfficeFilters, Office>;
pub type OfficesAction = ResourceAction<Office, OfficeFilters, Office>;
