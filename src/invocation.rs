//! Invocation parameters parsed from the command line

use crate::error::{Error, Result};

/// One run of the merge tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// PR to merge, always non-zero
    pub pr_number: u64,
    /// Skip the final push
    pub dry_run: bool,
    /// Proceed even when the status check is not green
    pub force: bool,
}

impl Invocation {
    /// Resolve the positional PR tokens into an invocation.
    ///
    /// The last token wins. Returns `Ok(None)` when no token was given or
    /// the PR number is `0`, which means "show usage".
    pub fn from_tokens<I, S>(tokens: I, dry_run: bool, force: bool) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(last) = tokens.into_iter().last() else {
            return Ok(None);
        };
        let raw = last.as_ref().trim();
        let pr_number: u64 = raw
            .parse()
            .map_err(|_| Error::InvalidPrNumber(raw.to_string()))?;

        if pr_number == 0 {
            return Ok(None);
        }

        Ok(Some(Self {
            pr_number,
            dry_run,
            force,
        }))
    }
}
