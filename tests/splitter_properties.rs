// Behavioral tests for the public splitter and normalizer API
// WHY: pins the observable contract that init loading depends on

use initsql::statement_splitter::{collapse_whitespace, STATEMENT_TERMINATOR};
use initsql::{detect_statements, normalize_statement, split_statements};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{EXTENSION_INIT, SQLITE_INIT};

fn split(text: &str) -> Vec<String> {
    split_statements(text).expect("split never fails")
}

#[test]
fn test_plain_text_splits_to_trimmed_self() {
    let samples = [
        "SELECT 1",
        "  CREATE TABLE t (id INTEGER)  ",
        "\n\tVACUUM\n",
        "SELECT a\nFROM b\nWHERE c = 1",
        "SELECT 世界",
    ];

    for sample in samples {
        assert_eq!(split(sample), vec![sample.trim().to_string()], "input: {sample:?}");
    }
}

#[test]
fn test_empty_inputs() {
    for sample in ["", "   \n\t\n   ", "-- comment only", "/* only */", "-- a\n/* b */\n;\n"] {
        assert!(split(sample).is_empty(), "input: {sample:?}");
    }
}

#[test]
fn test_statement_count_equals_terminator_count() {
    let text = "SELECT 1; SELECT 2; SELECT 3;";
    let terminators = text.chars().filter(|&c| c == STATEMENT_TERMINATOR).count();
    assert_eq!(split(text).len(), terminators);
    assert_eq!(split(text), vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
}

#[test]
fn test_string_and_comment_masking() {
    assert_eq!(split("SELECT 1;"), vec!["SELECT 1"]);
    assert_eq!(split("SELECT 1"), vec!["SELECT 1"]);
    assert_eq!(split("SELECT 'a;b;c';"), vec!["SELECT 'a;b;c'"]);
    assert_eq!(split("SELECT 'it''s working';"), vec!["SELECT 'it''s working'"]);
    assert_eq!(
        split("SELECT '-- not a comment'; SELECT '/* also not */';"),
        vec!["SELECT '-- not a comment'", "SELECT '/* also not */'"]
    );
    assert_eq!(split("SELECT /* comment */ 1;"), vec!["SELECT  1"]);
}

#[test]
fn test_extension_init_script() {
    assert_eq!(
        split(EXTENSION_INIT),
        vec!["SET autoinstall_known_extensions = 1", "LOAD httpfs"]
    );
}

#[test]
fn test_sqlite_init_script() {
    let statements = split(SQLITE_INIT);

    assert_eq!(statements.len(), 5);
    assert_eq!(
        statements[0],
        "CREATE TABLE users (\n    id INTEGER PRIMARY KEY, \n    name TEXT NOT NULL,\n    note TEXT\n)"
    );
    assert_eq!(
        statements[2],
        "INSERT INTO users (name, note) VALUES ('bob', 'it''s -- not a comment')"
    );
    assert_eq!(statements[4], "CREATE INDEX users_name ON users (name)");
}

#[test]
fn test_located_statements_agree_with_plain_split() {
    let plain = split(SQLITE_INIT);
    let located = detect_statements(SQLITE_INIT).unwrap();

    assert_eq!(plain.len(), located.len());
    for (i, (text, statement)) in plain.iter().zip(&located).enumerate() {
        assert_eq!(statement.index, i);
        assert_eq!(&statement.sql, text);
        assert!(statement.span.start_line <= statement.span.end_line);
    }

    // CREATE TABLE runs from line 2 to the closing paren on line 6
    assert_eq!(located[0].span.start_line, 2);
    assert_eq!(located[0].span.end_line, 6);
    // Last statement has no terminator and sits on the final line
    assert_eq!(located[4].span.start_line, SQLITE_INIT.lines().count());
}

#[test]
fn test_normalize_bounds() {
    let long = "SELECT\n  col_a,\n  col_b,\n  col_c\nFROM some_table\nWHERE col_a > 10";
    let collapsed = collapse_whitespace(long);

    for max_len in 4..=collapsed.chars().count() + 2 {
        let result = normalize_statement(long, max_len);
        let len = result.chars().count();
        assert!(len <= max_len, "max_len {max_len}: {result:?}");

        if collapsed.chars().count() > max_len {
            assert!(result.ends_with("..."), "max_len {max_len}: {result:?}");
            assert_eq!(len, max_len);
        } else {
            assert_eq!(result, collapsed);
        }
    }
}

#[test]
fn test_normalize_multiline_example() {
    assert_eq!(
        normalize_statement("SELECT\n  id,\n  name\nFROM users", 50),
        "SELECT id, name FROM users"
    );
}

#[test]
fn test_split_is_thread_safe() {
    let handles: Vec<_> = (0..4)
        .map(|n| {
            std::thread::spawn(move || {
                let text = format!("SELECT {n}; SELECT '{n};{n}';");
                split_statements(&text).unwrap()
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let statements = handle.join().unwrap();
        assert_eq!(statements, vec![format!("SELECT {n}"), format!("SELECT '{n};{n}'")]);
    }
}
