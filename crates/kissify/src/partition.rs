//! Splits collected dependencies into scripts and stylesheets

use log::debug;
use swc_core::ecma::atoms::Atom;

use crate::types::{DependencyEntry, PartitionedDependencies, ScriptDependency};

/// Route entries whose path starts with `stylesheet_prefix` to the
/// stylesheet list (prefix stripped) and everything else to the script list.
/// Both lists keep the entries' original relative order.
pub fn partition(entries: Vec<DependencyEntry>, stylesheet_prefix: &str) -> PartitionedDependencies {
    let mut dependencies = PartitionedDependencies::default();
    for entry in entries {
        match entry.path.strip_prefix(stylesheet_prefix) {
            Some(stylesheet) => {
                debug!("Routing {:?} to stylesheet requires", &*entry.path);
                dependencies.stylesheets.push(Atom::from(stylesheet));
            }
            None => dependencies.scripts.push(ScriptDependency {
                path: entry.path,
                binding: entry.binding,
            }),
        }
    }
    dependencies
}
