//! Cluster bookkeeping shared by the canopy and refinement phases.

pub mod cluster_map;

pub use cluster_map::{ClusterAssignment, MemberRecord};
