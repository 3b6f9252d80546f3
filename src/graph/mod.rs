//! Core graph data structures

mod node;
mod paper;
mod statement;

pub use node::{NodeClass, NodeRef};
pub use paper::{ContributionRef, Paper, PaperMeta, ResearchField};
pub use statement::{BucketedStatement, Predicate, Statement};
