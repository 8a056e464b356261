//! Tests for rewriting source queries into UPDATE statements.

use redraft_core::{ColumnRole, ColumnRoleMapping};
use redraft_error::SynthesisErrorKind;
use redraft_synth::{bind, synthesize};
use serde_json::json;

fn mapping(entries: &[(&str, ColumnRole)]) -> ColumnRoleMapping {
    entries.iter().map(|(c, r)| (*c, *r)).collect()
}

fn id_name() -> ColumnRoleMapping {
    mapping(&[("id", ColumnRole::Identifier), ("name", ColumnRole::Field)])
}

#[test]
fn test_filter_is_kept_ahead_of_identifier_equalities() {
    let stmt = synthesize("SELECT id, name FROM users WHERE active = true", &id_name()).unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE users SET name = :name WHERE active = true AND id = :id RETURNING id, name"
    );
}

#[test]
fn test_documented_example_binds_submitted_values() {
    let stmt = synthesize("SELECT id, name FROM users WHERE active = true", &id_name()).unwrap();
    let payload = json!({"id": 7, "name": "Alice"});
    let bound = bind(stmt, payload.as_object().unwrap()).unwrap();

    assert_eq!(
        bound.parameters(),
        &vec![
            ("name".to_string(), json!("Alice")),
            ("id".to_string(), json!(7)),
        ]
    );
}

#[test]
fn test_order_by_and_limit_are_both_discarded() {
    let with_limit = synthesize("SELECT a FROM t ORDER BY a LIMIT 5", &id_name()).unwrap();
    let without_limit = synthesize("SELECT a FROM t ORDER BY a", &id_name()).unwrap();
    let limit_only = synthesize("SELECT a FROM t LIMIT 5", &id_name()).unwrap();

    assert_eq!(with_limit.target(), "t");
    assert_eq!(with_limit, without_limit);
    assert_eq!(with_limit, limit_only);
}

#[test]
fn test_filter_survives_order_by_and_limit() {
    let stmt = synthesize(
        "SELECT * FROM t WHERE x = 1 ORDER BY x DESC LIMIT 10",
        &id_name(),
    )
    .unwrap();
    assert_eq!(stmt.filter().as_deref(), Some("x = 1"));
}

#[test]
fn test_without_where_only_identifier_equalities_remain() {
    let stmt = synthesize("SELECT * FROM users", &id_name()).unwrap();
    let sql = stmt.sql();
    assert!(sql.contains("WHERE id = :id RETURNING"));
    assert!(!sql.contains("WHERE AND"));
    assert!(!sql.contains("WHERE  AND"));
}

#[test]
fn test_multiple_identifiers_and_fields_keep_mapping_order() {
    let roles = mapping(&[
        ("email", ColumnRole::Field),
        ("tenant", ColumnRole::Identifier),
        ("name", ColumnRole::Field),
        ("id", ColumnRole::Identifier),
    ]);
    let stmt = synthesize("SELECT * FROM accounts", &roles).unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE accounts SET email = :email, name = :name \
         WHERE tenant = :tenant AND id = :id RETURNING tenant, id, email, name"
    );
}

#[test]
fn test_join_clauses_are_reused_as_target() {
    let stmt = synthesize(
        "SELECT u.id, u.name FROM users u JOIN orgs o ON o.id = u.org_id WHERE o.active",
        &id_name(),
    )
    .unwrap();
    assert_eq!(stmt.target(), "users u JOIN orgs o ON o.id = u.org_id");
    assert_eq!(stmt.filter().as_deref(), Some("o.active"));
}

// Boundary of the rewrite: an UPDATE needs at least one assigned column.
// Rather than emitting `SET  WHERE ...`, synthesis refuses the mapping.
#[test]
fn test_mapping_without_fields_is_rejected() {
    let roles = mapping(&[("id", ColumnRole::Identifier)]);
    let err = synthesize("SELECT * FROM users", &roles).unwrap_err();
    assert_eq!(err.kind, SynthesisErrorKind::MissingFields);
}

// Without identifiers the UPDATE would touch every row the filter matches.
#[test]
fn test_mapping_without_identifiers_is_rejected() {
    let roles = mapping(&[("name", ColumnRole::Field)]);
    let err = synthesize("SELECT * FROM users WHERE active", &roles).unwrap_err();
    assert_eq!(err.kind, SynthesisErrorKind::MissingIdentifiers);
}

#[test]
fn test_anchor_inside_literal_fails_closed() {
    let err = synthesize(
        "SELECT * FROM notes WHERE body = 'see order by clause' ORDER BY id",
        &id_name(),
    )
    .unwrap_err();
    assert!(matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)));
}

#[test]
fn test_limit_inside_subquery_fails_closed() {
    let err = synthesize(
        "SELECT * FROM t WHERE id IN (SELECT id FROM s LIMIT 3)",
        &id_name(),
    )
    .unwrap_err();
    assert!(matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)));
}

#[test]
fn test_comma_separated_tables_fail_closed() {
    let err = synthesize("SELECT * FROM a, b WHERE a.id = b.id", &id_name()).unwrap_err();
    assert!(matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)));
}

#[test]
fn test_query_without_from_fails_closed() {
    let err = synthesize("SELECT 1", &id_name()).unwrap_err();
    assert!(matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)));
}

#[test]
fn test_quoted_identifiers_in_target() {
    let stmt = synthesize("SELECT * FROM \"Order Items\" WHERE qty > 0", &id_name()).unwrap();
    assert_eq!(stmt.target(), "\"Order Items\"");
}

#[test]
fn test_or_next_to_parentheses_is_grouped_before_identifiers() {
    let trailing = synthesize(
        "SELECT * FROM users WHERE active = true OR(role = 'admin')",
        &id_name(),
    )
    .unwrap();
    assert_eq!(
        trailing.sql(),
        "UPDATE users SET name = :name WHERE (active = true OR(role = 'admin')) \
         AND id = :id RETURNING id, name"
    );

    let leading = synthesize(
        "SELECT * FROM users WHERE (active = true)OR role = 'admin'",
        &id_name(),
    )
    .unwrap();
    assert_eq!(
        leading.filter().as_deref(),
        Some("((active = true)OR role = 'admin')")
    );
}

#[test]
fn test_xor_and_pipes_are_grouped_before_identifiers() {
    let xor = synthesize("SELECT * FROM t WHERE a XOR b", &id_name()).unwrap();
    assert_eq!(xor.filter().as_deref(), Some("(a XOR b)"));

    let pipes = synthesize("SELECT * FROM t WHERE a || b", &id_name()).unwrap();
    assert_eq!(pipes.filter().as_deref(), Some("(a || b)"));
}

#[test]
fn test_anchors_next_to_parentheses_still_cut() {
    let stmt = synthesize(
        "SELECT * FROM users WHERE(active = true) ORDER BY(name) LIMIT 5",
        &id_name(),
    )
    .unwrap();
    assert_eq!(stmt.target(), "users");
    assert_eq!(stmt.filter().as_deref(), Some("(active = true)"));
}

#[test]
fn test_qualified_column_named_like_a_keyword_is_not_an_anchor() {
    let stmt = synthesize("SELECT * FROM t WHERE t.limit > 3", &id_name()).unwrap();
    assert_eq!(stmt.filter().as_deref(), Some("t.limit > 3"));
}

#[test]
fn test_where_without_condition_fails_closed() {
    let err = synthesize("SELECT * FROM users WHERE", &id_name()).unwrap_err();
    assert!(matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)));
}

#[test]
fn test_clauses_an_update_cannot_carry_fail_closed() {
    for query in [
        "SELECT id FROM users WHERE active = true GROUP BY id",
        "SELECT id FROM users GROUP BY id HAVING count(*) > 1",
        "SELECT id FROM users WHERE active OFFSET 10",
        "SELECT id FROM users UNION SELECT id FROM admins",
    ] {
        let err = synthesize(query, &id_name()).unwrap_err();
        assert!(
            matches!(err.kind, SynthesisErrorKind::UnsupportedQuery(_)),
            "{}",
            query
        );
    }
}

#[test]
fn test_grouping_inside_a_subquery_is_allowed() {
    let stmt = synthesize(
        "SELECT * FROM users WHERE id IN (SELECT user_id FROM logins GROUP BY user_id)",
        &id_name(),
    )
    .unwrap();
    assert_eq!(
        stmt.filter().as_deref(),
        Some("id IN (SELECT user_id FROM logins GROUP BY user_id)")
    );
}
