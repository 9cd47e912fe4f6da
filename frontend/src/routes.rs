use dioxus::prelude::*;

use explorer_common::search_params::RawSearchParams;

use crate::pages::logs_page::LogsPage;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    // the whole query string is the table state, see `search_params`
    #[route("/?:..search")]
    LogsPage { search: RawSearchParams },
}

impl Route {
    pub fn logs_page(search: RawSearchParams) -> Self {
        Self::LogsPage { search }
    }
}
