use serde::Serialize;
use sizewatch_core::{CommitRecord, find_commit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitPair {
    pub base_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPair<'a> {
    pub base: &'a CommitRecord,
    pub target: &'a CommitRecord,
}

impl ResolvedPair<'_> {
    pub fn ids(&self) -> CommitPair {
        CommitPair {
            base_id: self.base.commit_id(),
            target_id: self.target.commit_id(),
        }
    }
}

/// Pair preselected when a folder opens: the `head` commit as target and a
/// different `branch` commit as base. Without a head the first commit is
/// the target; without a branch the base equals the target.
pub fn default_comparison_pair(commits: &[CommitRecord]) -> Option<CommitPair> {
    let head = commits
        .iter()
        .find(|commit| commit.kind_is("head"))
        .or_else(|| commits.first())?;
    let head_id = head.commit_id();

    let mut branches = commits.iter().filter(|commit| commit.kind_is("branch"));
    let base = branches
        .clone()
        .find(|commit| commit.commit_id() != head_id)
        .or_else(|| branches.next())
        .unwrap_or(head);

    Some(CommitPair {
        base_id: base.commit_id(),
        target_id: head_id,
    })
}

/// Resolves selected ids against the folder's commits. Unknown or missing
/// ids fall back to the first commit for the base and the second (or only)
/// commit for the target. `None` only when there are no commits.
pub fn resolve_comparison_pair<'a>(
    commits: &'a [CommitRecord],
    base_id: Option<&str>,
    target_id: Option<&str>,
) -> Option<ResolvedPair<'a>> {
    let base = base_id
        .and_then(|id| find_commit(commits, id))
        .or_else(|| commits.first())?;
    let target = target_id
        .and_then(|id| find_commit(commits, id))
        .or_else(|| commits.get(1).or_else(|| commits.first()))
        .unwrap_or(base);

    Some(ResolvedPair { base, target })
}
