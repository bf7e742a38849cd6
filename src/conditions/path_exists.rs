use super::{path_exists, CheckOutcome, EvalError};
use crate::diagnostic::FileHighlight;
use crate::rule::ResolvedPath;

/// Pass iff every target exists. Every missing target becomes evidence.
pub fn evaluate_path_exists(targets: &[ResolvedPath]) -> Result<CheckOutcome, EvalError> {
    let mut outcome = CheckOutcome::pass();

    for target in targets {
        if !path_exists(&target.absolute)? {
            outcome.passed = false;
            outcome
                .highlights
                .push(FileHighlight::path_only(&target.relative));
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_file_passes_without_evidence() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "# Title\n").unwrap();

        let targets = vec![ResolvedPath::new(temp.path(), "./README.md")];
        let outcome = evaluate_path_exists(&targets).unwrap();

        assert!(outcome.passed);
        assert!(outcome.highlights.is_empty());
    }

    #[test]
    fn test_existing_directory_passes() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("blueprint/images")).unwrap();

        let targets = vec![ResolvedPath::new(temp.path(), "blueprint/images")];
        assert!(evaluate_path_exists(&targets).unwrap().passed);
    }

    #[test]
    fn test_all_missing_paths_are_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("present.md"), "").unwrap();

        let targets = vec![
            ResolvedPath::new(temp.path(), "missing-a.md"),
            ResolvedPath::new(temp.path(), "present.md"),
            ResolvedPath::new(temp.path(), "missing-b.md"),
        ];
        let outcome = evaluate_path_exists(&targets).unwrap();

        assert!(!outcome.passed);
        let paths: Vec<_> = outcome.highlights.iter().map(|h| h.path.as_str()).collect();
        assert_eq!(paths, vec!["missing-a.md", "missing-b.md"]);
    }

    #[test]
    fn test_path_through_regular_file_is_missing() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "# Title\n").unwrap();

        let targets = vec![ResolvedPath::new(temp.path(), "README.md/child.md")];
        let outcome = evaluate_path_exists(&targets).unwrap();

        assert!(!outcome.passed);
        assert_eq!(
            outcome.highlights,
            vec![FileHighlight::path_only("README.md/child.md")]
        );
    }
}
