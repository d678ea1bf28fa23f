pub mod api;
pub mod client;
pub mod groups;
pub mod jobs;
pub mod links;
pub mod outcome;
pub mod pipelines;
pub mod provider;
pub mod refs;
pub mod tags;
#[cfg(test)]
mod testing;
pub mod types;

pub use groups::{ResolveOptions, RootFailurePolicy};
pub use jobs::JobAction;
pub use provider::GitLabProvider;
