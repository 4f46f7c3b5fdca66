use diffy::PatchFormatter;
use std::path::Path;

/// Whether the sorted text differs from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conformance {
    Conforming,
    NonConforming,
}

impl Conformance {
    pub fn of(original: &str, sorted: &str) -> Self {
        if original == sorted {
            Self::Conforming
        } else {
            Self::NonConforming
        }
    }

    pub fn conforms(self) -> bool {
        self == Self::Conforming
    }
}

/// Unified diff between `original` and `sorted` with `a/` and `b/` headers.
///
/// Empty when the texts are equal.
pub fn unified_diff(path: &Path, original: &str, sorted: &str) -> String {
    if original == sorted {
        return String::new();
    }

    let display = path.display().to_string().replace('\\', "/");
    let mut out = String::new();
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", display));

    let patch = diffy::create_patch(original, sorted);
    let formatter = PatchFormatter::new();
    let rendered = formatter.fmt_patch(&patch).to_string();
    // diffy prints its own `---`/`+++` header first; keep only the hunks.
    let hunks = rendered
        .find("\n@@")
        .map(|index| &rendered[index + 1..])
        .unwrap_or("");
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
