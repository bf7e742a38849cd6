use super::{compile, line_at_offset, line_of_offset, read_content, CheckOutcome, EvalError, MatchKind};
use crate::diagnostic::FileHighlight;
use crate::rule::ResolvedPath;
use regex::Regex;

/// Every entry must be found in every file.
///
/// Static entries report the whole line holding the first occurrence; regex
/// entries report the matched text itself and how many lines it spans.
pub fn evaluate_contains(
    targets: &[ResolvedPath],
    entries: &[(MatchKind, String)],
) -> Result<CheckOutcome, EvalError> {
    let compiled = entries
        .iter()
        .map(|(kind, value)| match kind {
            MatchKind::Static => Ok(None),
            MatchKind::Regex => compile(value).map(Some),
        })
        .collect::<Result<Vec<Option<Regex>>, _>>()?;

    let mut outcome = CheckOutcome::pass();

    for target in targets {
        let content = read_content(target)?;

        for ((_, value), regex) in entries.iter().zip(&compiled) {
            let highlight = match regex {
                None => find_literal(&content, value, &target.relative),
                Some(re) => find_regex(&content, re, &target.relative),
            };

            match highlight {
                Some(h) => outcome.highlights.push(h),
                None => outcome.passed = false,
            }
        }
    }

    Ok(outcome)
}

fn find_literal(content: &str, needle: &str, path: &str) -> Option<FileHighlight> {
    let index = content.find(needle)?;
    Some(FileHighlight::new(
        path,
        line_of_offset(content, index),
        line_at_offset(content, index),
    ))
}

fn find_regex(content: &str, re: &Regex, path: &str) -> Option<FileHighlight> {
    let m = re.find(content)?;
    let spanned = m.as_str().matches('\n').count() + 1;
    Some(
        FileHighlight::new(path, line_of_offset(content, m.start()), m.as_str())
            .with_line_count(spanned),
    )
}
