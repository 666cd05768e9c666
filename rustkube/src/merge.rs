//! Folding one kubeconfig into another.
//!
//! Clusters go first, then users, then contexts: a context's name and references
//! are rewritten with whatever renames the first two passes produced.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::context_name;
use crate::direct::KubeConfig;
use crate::resolve::{resolve, EntityKind, NamePrompter, ResolveError};

/// What a single [`Merger::merge`] call appended and renamed.
///
/// Rename maps are keyed by the name the entry had in the source config.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub clusters_added: usize,
    pub users_added: usize,
    pub contexts_added: usize,
    pub renamed_clusters: BTreeMap<String, String>,
    pub renamed_users: BTreeMap<String, String>,
    pub renamed_contexts: BTreeMap<String, String>,
}

impl MergeReport {
    pub fn renames(&self) -> usize {
        self.renamed_clusters.len() + self.renamed_users.len() + self.renamed_contexts.len()
    }
}

fn known_names<'a>(names: impl Iterator<Item = &'a str>) -> HashSet<String> {
    names.map(str::to_owned).collect()
}

pub struct Merger<P> {
    prompter: P,
}

impl<P: NamePrompter> Merger<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Appends everything in `src` to `dst`, renaming entries whose names are
    /// already taken. `dst.current_context` is left as it was.
    pub fn merge(
        &mut self,
        dst: &mut KubeConfig,
        src: KubeConfig,
    ) -> Result<MergeReport, ResolveError> {
        let mut report = MergeReport::default();

        // region: Clusters
        let mut known = known_names(dst.cluster_names());
        for mut cluster in src.clusters {
            let name = resolve(EntityKind::Cluster, &cluster.name, &known, &mut self.prompter)?;
            if name != cluster.name {
                info!(from = %cluster.name, to = %name, "renamed cluster");
                report
                    .renamed_clusters
                    .insert(std::mem::replace(&mut cluster.name, name.clone()), name.clone());
            }
            known.insert(name);
            dst.clusters.push(cluster);
            report.clusters_added += 1;
        }
        // endregion

        // region: Users
        let mut known = known_names(dst.user_names());
        for mut user in src.users {
            let name = resolve(EntityKind::User, &user.name, &known, &mut self.prompter)?;
            if name != user.name {
                info!(from = %user.name, to = %name, "renamed user");
                report
                    .renamed_users
                    .insert(std::mem::replace(&mut user.name, name.clone()), name.clone());
            }
            known.insert(name);
            dst.users.push(user);
            report.users_added += 1;
        }
        // endregion

        // region: Contexts
        let mut known = known_names(dst.context_names());
        for mut context in src.contexts {
            let original = context.name.clone();
            let spec = &mut context.context;

            if let Some(new) = report.renamed_clusters.get(&spec.cluster) {
                context.name = context_name::rename_cluster(&context.name, &spec.cluster, new);
                spec.cluster = new.clone();
            }
            if let Some(new) = report.renamed_users.get(&spec.user) {
                context.name = context_name::rename_user(&context.name, &spec.user, new);
                spec.user = new.clone();
            }
            if context.name != original {
                debug!(from = %original, to = %context.name, "rewrote context after renames");
            }

            context.name =
                resolve(EntityKind::Context, &context.name, &known, &mut self.prompter)?;
            if context.name != original {
                info!(from = %original, to = %context.name, "renamed context");
                report.renamed_contexts.insert(original, context.name.clone());
            }
            known.insert(context.name.clone());
            dst.contexts.push(context);
            report.contexts_added += 1;
        }
        // endregion

        Ok(report)
    }
}
