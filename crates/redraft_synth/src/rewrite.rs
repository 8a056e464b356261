//! Keyword-anchored rewrite of a SELECT into an UPDATE.
//!
//! The rewrite never parses SQL. It locates the first `from`, `limit`,
//! `order by` and `where` keywords (case-insensitive, whole words) and cuts
//! the statement at those anchors:
//!
//! ```text
//! SELECT <projection> FROM <target> WHERE <filter> ORDER BY <..> LIMIT <..>
//!                          ^^^^^^^^       ^^^^^^^^
//! ```
//!
//! `limit` is cut before `order by` is searched for; valid SQL places
//! `order by` first, so the result does not depend on which clauses exist.
//! An anchor found inside a literal, quoted identifier, comment or
//! parenthesized expression fails the rewrite instead of cutting there, and
//! so does a top-level clause an UPDATE cannot carry (`group by`, `having`,
//! `offset`, set operations) left between `from` and the cut.

use crate::lexical::{TopLevel, unsupported};
use redraft_core::{ColumnRoleMapping, UpdateStatement};
use redraft_error::{SynthesisError, SynthesisErrorKind};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, instrument};

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static FROM: Pattern = LazyLock::new(|| anchor(r"from"));
static LIMIT: Pattern = LazyLock::new(|| anchor(r"limit"));
static ORDER_BY: Pattern = LazyLock::new(|| anchor(r"order\s+by"));
static WHERE: Pattern = LazyLock::new(|| anchor(r"where"));
// MySQL's XOR binds looser than AND, so it needs the same grouping as OR.
static DISJUNCTION: Pattern = LazyLock::new(|| anchor(r"x?or"));
static UNSUPPORTED_CLAUSE: Pattern = LazyLock::new(|| {
    anchor(r"group\s+by|having|offset|fetch|window|union|intersect|except|for\s+update")
});
static COLUMN_NAME: Pattern = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$"));

fn anchor(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{})\b", keyword))
}

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, SynthesisError> {
    pattern
        .as_ref()
        .map_err(|e| SynthesisError::new(SynthesisErrorKind::Pattern(e.to_string())))
}

/// Rewrite `source_query` into an UPDATE of the columns in `mapping`.
///
/// Produces `UPDATE <target> SET <field = :field, ..> WHERE [<filter> AND]
/// <id = :id AND ..> RETURNING <ids, fields>`.
///
/// # Errors
///
/// * `MissingIdentifiers` / `MissingFields` when the mapping lacks either role.
/// * `MalformedMapping` when a column name is not a plain identifier.
/// * `UnsupportedQuery` when the source is outside the single-target SELECT
///   shape the rewrite handles.
/// * `Pattern` if a rewrite pattern fails to compile.
///
/// # Examples
///
/// ```
/// use redraft_core::{ColumnRole, ColumnRoleMapping};
/// use redraft_synth::synthesize;
///
/// let mapping = ColumnRoleMapping::new()
///     .with("id", ColumnRole::Identifier)
///     .with("name", ColumnRole::Field);
/// let stmt = synthesize("SELECT id, name FROM users WHERE active = true", &mapping).unwrap();
/// assert_eq!(
///     stmt.sql(),
///     "UPDATE users SET name = :name WHERE active = true AND id = :id RETURNING id, name"
/// );
/// ```
#[instrument(skip_all, fields(columns = mapping.len(), query_len = source_query.len()))]
pub fn synthesize(
    source_query: &str,
    mapping: &ColumnRoleMapping,
) -> Result<UpdateStatement, SynthesisError> {
    let fields = mapping.fields();
    let identifiers = mapping.identifiers();
    if identifiers.is_empty() {
        return Err(SynthesisError::new(SynthesisErrorKind::MissingIdentifiers));
    }
    if fields.is_empty() {
        return Err(SynthesisError::new(SynthesisErrorKind::MissingFields));
    }
    let column_name = compiled(&COLUMN_NAME)?;
    if let Some((bad, _)) = mapping.iter().find(|(name, _)| !column_name.is_match(name)) {
        return Err(SynthesisError::new(SynthesisErrorKind::MalformedMapping(
            format!("Column '{}' is not a plain column name", bad),
        )));
    }

    let text = normalize(source_query);
    let scan = TopLevel::scan(&text)?;

    let from = first_anchor(&FROM, "from", &text, 0..text.len(), &scan)?
        .ok_or_else(|| unsupported("no 'from' clause found"))?;
    let mut body = from.end..text.len();

    if let Some(limit) = first_anchor(&LIMIT, "limit", &text, body.clone(), &scan)? {
        body.end = limit.start;
    }
    if let Some(order_by) = first_anchor(&ORDER_BY, "order by", &text, body.clone(), &scan)? {
        body.end = order_by.start;
    }

    reject_unsupported_clauses(&text, body.clone(), &scan)?;

    let (target, filter) = match first_anchor(&WHERE, "where", &text, body.clone(), &scan)? {
        Some(kw) => (body.start..kw.start, Some(kw.end..body.end)),
        None => (body.clone(), None),
    };

    let target_text = text[target.clone()].trim();
    if target_text.is_empty() {
        return Err(unsupported("no table follows 'from'"));
    }
    if scan.top_level_bytes(&text, target, b',').next().is_some() {
        return Err(unsupported("multiple comma-separated tables in 'from'"));
    }

    let filter_text = match filter {
        None => None,
        Some(range) => {
            let fragment = text[range.clone()].trim();
            if fragment.is_empty() {
                return Err(unsupported("'where' has no condition"));
            }
            if has_top_level_disjunction(&text, range, &scan)? {
                Some(format!("({})", fragment))
            } else {
                Some(fragment.to_string())
            }
        }
    };

    debug!(
        target = %target_text,
        filter = ?filter_text,
        fields = fields.len(),
        identifiers = identifiers.len(),
        "Rewrote source query fragments"
    );

    Ok(UpdateStatement::new(
        target_text,
        filter_text,
        fields,
        identifiers,
    ))
}

/// Fold line breaks into spaces and drop trailing statement terminators.
fn normalize(source_query: &str) -> String {
    let folded = source_query.replace(['\r', '\n'], " ");
    folded.trim_end().trim_end_matches(';').trim_end().to_string()
}

/// First occurrence of an anchor in `range`, as the byte range of the
/// keyword. An occurrence below the top level is an error rather than a
/// reason to keep looking.
fn first_anchor(
    pattern: &'static Pattern,
    keyword: &str,
    text: &str,
    range: Range<usize>,
    scan: &TopLevel,
) -> Result<Option<Range<usize>>, SynthesisError> {
    let regex = compiled(pattern)?;
    for found in regex.find_iter(&text[range.clone()]) {
        let start = range.start + found.start();
        if is_qualified(text, start) {
            continue;
        }
        if !scan.is_top_level(start) {
            return Err(unsupported(format!(
                "'{}' appears inside a literal, comment or nested expression",
                keyword
            )));
        }
        return Ok(Some(start..range.start + found.end()));
    }
    Ok(None)
}

/// Keywords preceded by `.` are qualified column names such as `t.limit`.
fn is_qualified(text: &str, start: usize) -> bool {
    start
        .checked_sub(1)
        .and_then(|i| text.as_bytes().get(i))
        .is_some_and(|&byte| byte == b'.')
}

fn reject_unsupported_clauses(
    text: &str,
    range: Range<usize>,
    scan: &TopLevel,
) -> Result<(), SynthesisError> {
    let regex = compiled(&UNSUPPORTED_CLAUSE)?;
    let clause = regex.find_iter(&text[range.clone()]).find(|found| {
        let start = range.start + found.start();
        !is_qualified(text, start) && scan.is_top_level(start)
    });
    match clause {
        Some(found) => Err(unsupported(format!(
            "'{}' clauses are not supported",
            found.as_str().to_lowercase()
        ))),
        None => Ok(()),
    }
}

/// Whether the filter has a top-level `or`, `xor` or `|` that would bind
/// looser than the appended identifier equalities.
fn has_top_level_disjunction(
    text: &str,
    range: Range<usize>,
    scan: &TopLevel,
) -> Result<bool, SynthesisError> {
    let regex = compiled(&DISJUNCTION)?;
    let keyword = regex
        .find_iter(&text[range.clone()])
        .any(|found| scan.is_top_level(range.start + found.start()));
    // MySQL reads `||` as OR unless PIPES_AS_CONCAT is set.
    Ok(keyword || scan.top_level_bytes(text, range, b'|').next().is_some())
}
