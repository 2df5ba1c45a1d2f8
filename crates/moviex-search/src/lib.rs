//! Search session orchestration for moviex.
//!
//! Turns user intents (submit a query, change a filter, change page,
//! select a title) into OMDb requests and folds their results back into
//! a single session state.
//!
//! [`SearchSession`] is a pure state machine: intents return the request
//! to issue and completions are applied with [`SearchSession::finish_search`]
//! and [`SearchSession::finish_details`]. Every request carries a sequence
//! number so a slow, superseded response can never overwrite a newer one.
//! [`Orchestrator`] drives a session sequentially against an API for
//! callers that simply await each step.

mod orchestrator;
mod session;
mod status;

pub use orchestrator::{Orchestrator, fetch_details, fetch_page, run_details, run_search};
pub use session::{
    DetailCompletion, DetailRequest, PAGE_SIZE, SearchCompletion, SearchPage, SearchRequest,
    SearchSession, total_pages,
};
pub use status::{
    CONNECTIVITY_MESSAGE, DETAIL_FAILED_MESSAGE, FetchStatus, SessionError,
};
