//! Trait definitions for the collaborators around the redraft core.
//!
//! The write-back core does not own view definitions, saved queries or job
//! scheduling. This crate describes what it needs from them.

mod collaborators;
mod records;

pub use collaborators::{CollaboratorResult, RefreshQueue, StatementExecutor, ViewStore};
pub use records::{
    DataSource, DataSourceBuilder, FormView, FormViewBuilder, RefreshJob, RefreshJobBuilder,
    RefreshRequest, Requester, RequesterBuilder, SourceQuery, SourceQueryBuilder,
};
