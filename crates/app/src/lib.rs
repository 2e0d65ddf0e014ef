//! Persistence, collaborators and checkout orchestration for the storefront.

pub mod context;
pub mod database;
pub mod domain;
pub mod payments;
pub mod uuids;

#[cfg(test)]
mod test;
