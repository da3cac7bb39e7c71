//! Cache key derivation.

const KEY_ROOT: &str = "cache/";
const KEY_EXT: &str = ".cache";

/// Identity of one cache object: namespace prefix, branch, and an optional
/// suffix distinguishing sub-caches under the same prefix/branch.
///
/// Keys are immutable; the `with_*` constructors derive related keys rather
/// than mutating. Derivation is pure, so a restore with the same inputs
/// always addresses the object the matching save produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    prefix: Option<String>,
    branch: Option<String>,
    suffix: Option<String>,
}

impl CacheKey {
    pub fn new(prefix: Option<String>, branch: Option<String>, suffix: Option<String>) -> Self {
        Self {
            prefix,
            branch,
            suffix,
        }
    }

    /// The remote object identifier:
    /// `"cache/" [prefix "/"] [branch] ["." suffix] ".cache"`.
    ///
    /// All-absent components still yield a valid degenerate key.
    pub fn object_key(&self) -> String {
        let mut key = String::from(KEY_ROOT);
        if let Some(prefix) = &self.prefix {
            key.push_str(prefix);
            key.push('/');
        }
        if let Some(branch) = &self.branch {
            key.push_str(branch);
        }
        if let Some(suffix) = &self.suffix {
            key.push('.');
            key.push_str(suffix);
        }
        key.push_str(KEY_EXT);
        key
    }

    /// Same prefix and suffix with the branch replaced; used to derive the
    /// base-branch fallback key.
    pub fn with_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            prefix: self.prefix.clone(),
            branch: Some(branch.into()),
            suffix: self.suffix.clone(),
        }
    }

    /// Same prefix and branch with the suffix replaced; used for variant
    /// sub-caches. Variant levels chain by token (`stack`, `stack-work`),
    /// each deriving its own key independently.
    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            prefix: self.prefix.clone(),
            branch: self.branch.clone(),
            suffix: Some(suffix.into()),
        }
    }
}
