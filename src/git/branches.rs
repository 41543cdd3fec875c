//! Patch branch discovery

use regex::Regex;
use std::sync::LazyLock;

static PATCH_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^refs/heads/(\d+\.\d+\.x)$").unwrap());

/// Patch branch names found in `git ls-remote --heads` output.
///
/// Each line is `<sha>\t<ref>`; a bare ref per line is accepted too.
pub fn parse_patch_branches(ls_remote: &str) -> Vec<String> {
    ls_remote
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|reference| PATCH_HEAD.captures(reference))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Pick the patch branch: the first after a descending string sort.
///
/// This is a plain lexicographic order, so `1.10.x` sorts below `1.2.x`.
/// It only ranks versions correctly while the components keep the same
/// number of digits.
pub fn discover_patch_branch(ls_remote: &str) -> Option<String> {
    let mut branches = parse_patch_branches(ls_remote);
    branches.sort_unstable_by(|a, b| b.cmp(a));
    branches.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LS_REMOTE: &str = "\
1111111111111111111111111111111111111111\trefs/heads/master
2222222222222222222222222222222222222222\trefs/heads/1.2.x
3333333333333333333333333333333333333333\trefs/heads/1.10.x
4444444444444444444444444444444444444444\trefs/heads/2.0.x
5555555555555555555555555555555555555555\trefs/heads/feature/2.1.x
6666666666666666666666666666666666666666\trefs/heads/3.0.x-rc";

    #[test]
    fn test_parse_only_patch_heads() {
        assert_eq!(parse_patch_branches(LS_REMOTE), vec!["1.2.x", "1.10.x", "2.0.x"]);
    }

    #[test]
    fn test_discover_picks_highest() {
        assert_eq!(discover_patch_branch(LS_REMOTE).as_deref(), Some("2.0.x"));
    }

    #[test]
    fn test_discover_lexicographic_not_numeric() {
        let refs = "refs/heads/1.2.x\nrefs/heads/1.10.x\n";
        assert_eq!(discover_patch_branch(refs).as_deref(), Some("1.2.x"));
    }

    #[test]
    fn test_discover_none() {
        assert_eq!(discover_patch_branch("abc\trefs/heads/master\n"), None);
        assert_eq!(discover_patch_branch(""), None);
    }
}
