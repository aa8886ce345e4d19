//! Heading id stabilization and cross-reference repair.
//!
//! The indexer walks headings in document order and gives each one a
//! stable slug id; the rewriter then redirects every link that pointed at
//! a replaced id. Both passes mutate the same tree, one after the other.

use std::collections::HashSet;

use markup5ever_rcdom::Handle;
use tracing::{debug, warn};

use crate::dom;
use crate::model::{BrokenLinkRecord, HeadingRow, IdentifierMap};

mod ids;
mod links;
mod outline;

pub use links::{RewriteOutcome, rewrite_cross_references};
pub use outline::{HeadingIndex, index_headings};

use ids::*;
