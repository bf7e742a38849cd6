use super::{compile, path_exists, read_content, CheckOutcome, EvalError};
use crate::diagnostic::FileHighlight;
use crate::rule::{normalize_relative, ResolvedPath};
use regex::Regex;
use std::path::Path;

/// Every reference captured by a pattern must exist relative to the
/// directory of the file that mentions it.
///
/// Capture group 1 holds the referenced path. Every examined reference is
/// recorded, resolved or not.
pub fn evaluate_reference_exist(
    targets: &[ResolvedPath],
    patterns: &[String],
) -> Result<CheckOutcome, EvalError> {
    let compiled = patterns
        .iter()
        .map(|p| {
            let re = compile(p)?;
            if re.captures_len() < 2 {
                return Err(EvalError::Config(format!(
                    "pattern '{}' has no capturing group for the referenced path",
                    p
                )));
            }
            Ok(re)
        })
        .collect::<Result<Vec<Regex>, _>>()?;

    let mut outcome = CheckOutcome::pass();

    for target in targets {
        let content = read_content(target)?;
        let base = target.absolute.parent().unwrap_or(Path::new("."));

        for re in &compiled {
            for (index, line) in content.lines().enumerate() {
                let Some(caps) = re.captures(line) else {
                    continue;
                };

                let resolved = match caps.get(1) {
                    Some(reference) => reference_exists(base, reference.as_str())?,
                    None => false,
                };
                if !resolved {
                    outcome.passed = false;
                }

                outcome
                    .highlights
                    .push(FileHighlight::new(&target.relative, index + 1, line));
            }
        }
    }

    Ok(outcome)
}

/// References are always taken relative to `base`, even when written with a
/// leading separator.
fn reference_exists(base: &Path, reference: &str) -> Result<bool, EvalError> {
    path_exists(&base.join(normalize_relative(reference)))
}
