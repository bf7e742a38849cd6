use super::{compile, read_content, CheckOutcome, EvalError};
use crate::diagnostic::FileHighlight;
use crate::rule::ResolvedPath;
use regex::Regex;

/// Fail on any line matching any pattern; each offending line is evidence.
pub fn evaluate_not_contains(
    targets: &[ResolvedPath],
    patterns: &[String],
) -> Result<CheckOutcome, EvalError> {
    let compiled = patterns
        .iter()
        .map(|p| compile(p))
        .collect::<Result<Vec<Regex>, _>>()?;

    let mut outcome = CheckOutcome::pass();

    for target in targets {
        let content = read_content(target)?;

        for re in &compiled {
            for (index, line) in content.lines().enumerate() {
                if re.is_match(line) {
                    outcome.passed = false;
                    outcome
                        .highlights
                        .push(FileHighlight::new(&target.relative, index + 1, line));
                }
            }
        }
    }

    Ok(outcome)
}
