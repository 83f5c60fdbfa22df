use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use assembler::{MessageError, MessageReader, ReaderConfig, SwiftMessage};
use swiftmsg::read_blocks;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// If true, the test expects reading the messages to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// The error's Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Number of messages the file must hold.
    #[serde(default)]
    pub expect_messages: Option<usize>,

    /// Block ids of the first message, in `SwiftMessage::blocks` order.
    #[serde(default)]
    pub expect_blocks: Option<Vec<String>>,

    /// If true, re-rendering every message must reproduce the input
    /// (whitespace between top-level blocks excepted).
    #[serde(default)]
    pub expect_roundtrip: bool,

    /// Reader settings for this fixture, replacing the ones from `--config`.
    #[serde(default)]
    pub config: Option<ReaderConfig>,
}

/// Parse a `.test.fin` file into its TOML config and FIN source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    /// Passed; the summary says what was read or which error was raised.
    Pass(String),
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(".test.fin"))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path, base_config: &ReaderConfig) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (test, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let reader_config = test.config.clone().unwrap_or_else(|| base_config.clone());
    let result: Result<Vec<SwiftMessage>, MessageError> =
        MessageReader::new(source, reader_config).collect();

    let outcome = match check_result(&test, source, result) {
        Ok(summary) => TestOutcome::Pass(summary),
        Err(reason) => TestOutcome::Fail(reason),
    };
    TestResult {
        path: path.to_path_buf(),
        description: test.description,
        outcome,
    }
}

/// Compare a read result against the fixture's expectations.
/// Returns a one-line summary on success and the mismatch otherwise.
fn check_result(
    test: &TestConfig,
    source: &str,
    result: Result<Vec<SwiftMessage>, MessageError>,
) -> Result<String, String> {
    let expects_error = test.expect_parse_error || test.expect_error.is_some();

    let messages = match (expects_error, result) {
        (true, Err(err)) => {
            if let Some(expected) = &test.expect_error {
                if !err.to_string().contains(expected.as_str()) {
                    return Err(format!(
                        "expected error containing \"{}\", got: {}",
                        expected, err
                    ));
                }
            }
            let line = line_of(source, err.span().start);
            return Ok(format!("rejected on line {}: {}", line, err));
        }
        (true, Ok(messages)) => {
            return Err(format!(
                "expected parse error, but {} message(s) were read",
                messages.len()
            ));
        }
        (false, Err(err)) => {
            let line = line_of(source, err.span().start);
            return Err(format!("unexpected parse error on line {}: {}", line, err));
        }
        (false, Ok(messages)) => messages,
    };

    if let Some(expected) = test.expect_messages {
        if messages.len() != expected {
            return Err(format!(
                "expected {} message(s), got {}",
                expected,
                messages.len()
            ));
        }
    }

    if let Some(expected) = &test.expect_blocks {
        let Some(first) = messages.first() else {
            return Err("expected blocks, but the file holds no message".into());
        };
        let actual: Vec<String> = first.blocks().iter().map(|b| b.id().to_string()).collect();
        if &actual != expected {
            return Err(format!(
                "block mismatch\n  expected: {}\n  actual:   {}",
                expected.join(" "),
                actual.join(" ")
            ));
        }
    }

    if test.expect_roundtrip {
        let expected = normalized_source(source)
            .map_err(|e| format!("cannot normalize source: {}", e))?;
        let actual: String = messages.iter().map(SwiftMessage::to_text).collect();
        if actual != expected {
            return Err(format!(
                "roundtrip mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ));
        }
    }

    let types: Vec<String> = messages
        .iter()
        .map(|m| format!("MT{}", m.message_type()))
        .collect();
    Ok(format!("{} message(s): {}", messages.len(), types.join(" ")))
}

/// The source with whitespace between top-level blocks removed.
fn normalized_source(source: &str) -> Result<String, swiftmsg::BlockError> {
    Ok(read_blocks(source)?
        .iter()
        .map(|record| record.to_text())
        .collect())
}

/// 1-based line of a byte offset, counted from the start of the fixture body.
fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Find `.test.fin` files below `root`, grouped by the folder they sit in
/// (relative to `root`, "" for `root` itself). Files are sorted per group.
fn discover(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let is_fixture = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".test.fin"));
            if is_fixture {
                let category = dir
                    .strip_prefix(root)
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                groups.entry(category).or_default().push(path);
            }
        }
    }
    for files in groups.values_mut() {
        files.sort();
    }
    groups
}

fn category_name(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let groups = discover(path);
    if groups.is_empty() {
        eprintln!("no .test.fin files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &groups {
        eprintln!("  {} ({} tests)", category_name(category), files.len());
    }
}

/// ANSI styling for the report, disabled by `--no-color`.
struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn status(&self, outcome: &TestOutcome) -> String {
        match outcome {
            TestOutcome::Pass(_) => self.paint("32", "PASS"),
            TestOutcome::Fail(_) => self.paint("31", "FAIL"),
        }
    }
}

/// Run all `.test.fin` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(
    path: &Path,
    config: &ReaderConfig,
    no_color: bool,
    categories: &[String],
) -> i32 {
    let style = Style { color: !no_color };
    let single_file = path.is_file();

    let groups = if single_file {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all = discover(path);
        if all.is_empty() {
            eprintln!("no .test.fin files found in {}", path.display());
            return 1;
        }
        select_categories(all, categories)
    };
    if groups.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &groups {
        if !single_file {
            eprintln!();
            eprintln!("{}", style.paint("1", category_name(category)));
        }
        for file in files {
            let result = run_single_test(file, config);
            match &result.outcome {
                TestOutcome::Pass(summary) => {
                    passed += 1;
                    eprintln!(
                        "  {}  {}  {}",
                        style.status(&result.outcome),
                        result.label(),
                        style.paint("2", &format!("({})", summary))
                    );
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.status(&result.outcome), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("31", "FAILED"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}

/// Keep only the requested categories and their subcategories.
fn select_categories(
    all: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    if requested.is_empty() {
        return all;
    }

    let mut selected = BTreeMap::new();
    for req in requested {
        let req = req.trim_matches('/');
        let prefix = format!("{}/", req);
        let before = selected.len();
        for (category, files) in &all {
            if category == req || category.starts_with(&prefix) {
                selected.insert(category.clone(), files.clone());
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_name(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                available.join(", ")
            );
        }
    }
    selected
}
