//! figset : protein family (figfam) sets across genomes.
//!
//! From RAST per-genome protein tables we build one family set per genome and a registry
//! of everything known on each family. We then derive:
//! - families common to all genomes, families unique to one genome, all distinct families
//! - a pairwise similarity |A ∩ B| / max(|A|, |B|) between genomes
//!
//! A master table (the registry dump of a previous run) gives a feature to family index,
//! used to join RAST subsystem exports onto the families.

pub mod errors;
pub mod featureindex;
pub mod ingest;
pub mod partition;
pub mod records;
pub mod registry;
pub mod report;
pub mod similarity;
pub mod subsystem;
pub mod utils;

pub use errors::{FigsetError, Result};
