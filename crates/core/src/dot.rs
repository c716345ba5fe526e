//! Statement-oriented parser for DOT graph sources.
//!
//! The parser understands the subset of DOT that documentation generators
//! emit: a `[strict] (di)graph NAME { ... }` wrapper around `graph`/`node`/
//! `edge` default statements, `key=value` graph attributes, node statements
//! and edge statements, each with optional attribute lists.
//!
//! Parsing happens in two passes. The body is first split into statements on
//! top-level `;` and newlines (quotes, brackets and braces are respected), then
//! each statement is classified on its own. Statements that fit none of the
//! known shapes are skipped; an unterminated attribute list or quoted string
//! is an error because everything after it would be misattributed.
//!
//! # Example
//!
//! ```rust
//! use renderdot_core::parse_dot;
//!
//! let record = parse_dot(r#"digraph { node [shape=box]; "a" -> "b" [style=dashed]; }"#).unwrap();
//! assert_eq!(record.defaults().node["shape"], "box");
//! assert_eq!(record.edges()[0].id, "a->b");
//! ```

use tracing::debug;

use crate::error::{Location, RenderDotError, Result};
use crate::escape::{EscapeMode, unescape};
use crate::record::{AttributeMap, EdgeRecord, GraphDefaults, GraphHeader, GraphRecord, NodeRecord};

/// A statement that was not recognized and therefore ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStatement {
    pub index: usize,
    pub offset: usize,
    pub reason: &'static str,
    pub text: String,
}

/// Bookkeeping from a parse: how many statements were seen and which were
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub statements: usize,
    pub skipped: Vec<SkippedStatement>,
}

/// Parses a DOT source into a [`GraphRecord`].
///
/// Text without a `graph`/`digraph` header is treated as a bare statement
/// list.
///
/// # Errors
///
/// Returns [`RenderDotError::MalformedInput`] for an unterminated attribute
/// list, quoted string, comment or graph body.
pub fn parse_dot(source: &str) -> Result<GraphRecord> {
    parse_dot_with_report(source).map(|(record, _)| record)
}

/// Like [`parse_dot`], but also reports the skipped statements.
pub fn parse_dot_with_report(source: &str) -> Result<(GraphRecord, ParseReport)> {
    let (header, body) = split_header(source)?;
    let statements = split_statements(body.text, body.offset, body.braced)?;

    let mut defaults = GraphDefaults::default();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut report = ParseReport { statements: statements.len(), skipped: Vec::new() };

    for raw in &statements {
        match parse_statement(raw)? {
            Statement::Defaults(DefaultsKind::Graph, attrs) => defaults.graph.extend(attrs),
            Statement::Defaults(DefaultsKind::Node, attrs) => defaults.node.extend(attrs),
            Statement::Defaults(DefaultsKind::Edge, attrs) => defaults.edge.extend(attrs),
            Statement::GraphAttribute(key, value) => {
                defaults.graph.insert(key, value);
            }
            Statement::Node(node) => nodes.push(node),
            Statement::Edges(chain) => edges.extend(chain),
            Statement::Skipped(reason) => {
                debug!(index = raw.index, offset = raw.offset, reason, "skipping statement");
                report.skipped.push(SkippedStatement {
                    index: raw.index,
                    offset: raw.offset,
                    reason,
                    text: raw.text.trim().to_string(),
                });
            }
        }
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        skipped = report.skipped.len(),
        "parsed DOT source"
    );

    Ok((GraphRecord::new(header, defaults, nodes, edges), report))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultsKind {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, PartialEq)]
enum Statement {
    Defaults(DefaultsKind, AttributeMap),
    GraphAttribute(String, String),
    Node(NodeRecord),
    Edges(Vec<EdgeRecord>),
    Skipped(&'static str),
}

/// One statement of the body, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawStatement<'a> {
    index: usize,
    offset: usize,
    text: &'a str,
}

struct Body<'a> {
    text: &'a str,
    offset: usize,
    /// The body was opened by `{` and runs to the matching `}`.
    braced: bool,
}

/// Splits off the `[strict] (di)graph [NAME] {` header.
fn split_header(source: &str) -> Result<(GraphHeader, Body<'_>)> {
    let headerless = Ok((GraphHeader::default(), Body { text: source, offset: 0, braced: false }));

    let mut cursor = Cursor::new(source, 0, None);
    cursor.skip_trivia();

    let mut strict = false;
    let mut keyword = cursor.read_bare();
    if keyword.eq_ignore_ascii_case("strict") {
        strict = true;
        cursor.skip_trivia();
        keyword = cursor.read_bare();
    }

    let directed = if keyword.eq_ignore_ascii_case("digraph") {
        true
    } else if keyword.eq_ignore_ascii_case("graph") {
        false
    } else {
        return headerless;
    };

    cursor.skip_trivia();
    let mut name = None;
    if cursor.peek() != Some('{') {
        name = cursor.read_id()?.map(|id| id.value).filter(|n| !n.is_empty());
        cursor.skip_trivia();
    }

    // `graph [bgcolor=white]` in a fragment is a defaults statement, not a header.
    if !cursor.eat("{") {
        return headerless;
    }

    let header = GraphHeader { strict, directed, name };
    Ok((header, Body { text: &source[cursor.pos..], offset: cursor.pos, braced: true }))
}

/// Splits a body into statements on top-level `;` and newlines.
///
/// `base` is the offset of `body` in the DOT source. When `braced` is set the
/// body ends at the first unmatched `}` and running out of text first is an
/// error.
fn split_statements(body: &str, base: usize, braced: bool) -> Result<Vec<RawStatement<'_>>> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut end = body.len();
    let mut has_content = false;
    let mut open_brackets: Vec<usize> = Vec::new();
    let mut braces = 0usize;
    let mut line_start = true;
    let mut closed = !braced;

    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let location = Location::Statement { index: statements.len(), offset: base + i };
        let mut content = true;

        match c {
            '"' => {
                let mut terminated = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            terminated = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !terminated {
                    return Err(RenderDotError::malformed(location, "unterminated quoted string"));
                }
            }
            '/' if chars.peek().is_some_and(|(_, n)| *n == '/') => {
                content = false;
                while chars.next_if(|(_, n)| *n != '\n').is_some() {}
            }
            '/' if chars.peek().is_some_and(|(_, n)| *n == '*') => {
                content = false;
                chars.next();
                let mut previous = ' ';
                let mut terminated = false;
                for (_, c) in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        terminated = true;
                        break;
                    }
                    previous = c;
                }
                if !terminated {
                    return Err(RenderDotError::malformed(location, "unterminated comment"));
                }
            }
            '#' if line_start && open_brackets.is_empty() => {
                content = false;
                while chars.next_if(|(_, n)| *n != '\n').is_some() {}
            }
            '[' => open_brackets.push(i),
            ']' => {
                open_brackets.pop();
            }
            '{' => braces += 1,
            '}' if braces > 0 => braces -= 1,
            '}' if braced && open_brackets.is_empty() => {
                end = i;
                closed = true;
                break;
            }
            ';' | '\n' if open_brackets.is_empty() && braces == 0 => {
                push_statement(&mut statements, body, base, start..i, has_content);
                start = i + 1;
                has_content = false;
                content = false;
            }
            c if c.is_whitespace() => content = false,
            _ => {}
        }

        has_content |= content;
        line_start = c == '\n' || (line_start && c.is_whitespace());
    }

    if let Some(&open) = open_brackets.first() {
        let location = Location::Statement { index: statements.len(), offset: base + open };
        return Err(RenderDotError::malformed(location, "unterminated attribute list"));
    }

    if !closed {
        let location = Location::Offset(base.saturating_sub(1));
        return Err(RenderDotError::malformed(location, "unterminated graph body"));
    }

    push_statement(&mut statements, body, base, start..end, has_content);
    Ok(statements)
}

fn push_statement<'a>(
    statements: &mut Vec<RawStatement<'a>>, body: &'a str, base: usize, span: std::ops::Range<usize>, has_content: bool,
) {
    if has_content {
        let index = statements.len();
        statements.push(RawStatement { index, offset: base + span.start, text: &body[span] });
    }
}

/// Classifies one statement.
fn parse_statement(raw: &RawStatement<'_>) -> Result<Statement> {
    let mut cursor = Cursor::new(raw.text, raw.offset, Some(raw.index));
    cursor.skip_trivia();

    let Some(first) = cursor.read_id()? else {
        return Ok(Statement::Skipped("statement does not start with an identifier"));
    };

    if !first.quoted {
        let kind = match first.value.to_ascii_lowercase().as_str() {
            "graph" => Some(DefaultsKind::Graph),
            "node" => Some(DefaultsKind::Node),
            "edge" => Some(DefaultsKind::Edge),
            "subgraph" => return Ok(Statement::Skipped("subgraphs are not supported")),
            _ => None,
        };

        if let Some(kind) = kind {
            let Some(attrs) = cursor.read_attr_lists()? else {
                return Ok(Statement::Skipped("keyword without attribute list"));
            };
            return Ok(finish(cursor, Statement::Defaults(kind, attrs)));
        }
    }

    cursor.skip_trivia();
    if cursor.eat("=") {
        cursor.skip_trivia();
        let value = cursor.read_value()?.unwrap_or_default();
        return Ok(finish(cursor, Statement::GraphAttribute(first.value, value)));
    }

    let mut chain = vec![first.value];
    loop {
        cursor.skip_trivia();
        if !(cursor.eat("->") || cursor.eat("--")) {
            break;
        }
        cursor.skip_trivia();
        match cursor.read_id()? {
            Some(target) => chain.push(target.value),
            None => return Ok(Statement::Skipped("edge operator without a target identifier")),
        }
    }

    let attributes = cursor.read_attr_lists()?.unwrap_or_default();

    let statement = if chain.len() == 1 {
        let id = chain.pop().unwrap_or_default();
        Statement::Node(NodeRecord { id, attributes })
    } else {
        let edges = chain
            .windows(2)
            .map(|pair| EdgeRecord::new(pair[0].as_str(), pair[1].as_str(), attributes.clone()))
            .collect();
        Statement::Edges(edges)
    };

    Ok(finish(cursor, statement))
}

/// Accepts `statement` only if nothing but trivia follows it.
fn finish(mut cursor: Cursor<'_>, statement: Statement) -> Statement {
    cursor.skip_trivia();
    if cursor.at_end() { statement } else { Statement::Skipped("unexpected text after statement") }
}

struct Id {
    value: String,
    quoted: bool,
}

/// Position within one piece of DOT text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    /// Offset of `text` within the DOT source.
    base: usize,
    statement: Option<usize>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, base: usize, statement: Option<usize>) -> Self {
        Self { text, pos: 0, base, statement }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn location(&self, pos: usize) -> Location {
        match self.statement {
            Some(index) => Location::Statement { index, offset: self.base + pos },
            None => Location::Offset(self.base + pos),
        }
    }

    /// Skips whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            self.pos += rest.len() - rest.trim_start().len();

            let rest = self.rest();
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                self.pos += rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            } else {
                break;
            }
        }
    }

    /// Reads a bare identifier: alphanumerics, `_`, `.`, non-ASCII, and a
    /// leading `-` when a numeral follows.
    fn read_bare(&mut self) -> &'a str {
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let numeral_sign =
                i == 0 && c == '-' && rest[1..].starts_with(|n: char| n.is_ascii_digit() || n == '.');
            if !(c.is_alphanumeric() || c == '_' || c == '.' || !c.is_ascii() || numeral_sign) {
                break;
            }
            end = i + c.len_utf8();
        }
        self.pos += end;
        &rest[..end]
    }

    /// Reads a quoted string starting at the current `"`.
    fn read_quoted(&mut self) -> Result<String> {
        let open = self.pos;
        let start = open + 1;
        let mut chars = self.text[start..].char_indices();
        let mut close = None;

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => {
                    close = Some(start + i);
                    break;
                }
                _ => {}
            }
        }

        let close =
            close.ok_or_else(|| RenderDotError::malformed(self.location(open), "unterminated quoted string"))?;
        self.pos = close + 1;
        unescape(&self.text[start..close], EscapeMode::Dot, self.base + start)
    }

    /// Reads a quoted (with `+` concatenation) or bare identifier.
    fn read_id(&mut self) -> Result<Option<Id>> {
        if self.peek() != Some('"') {
            let bare = self.read_bare();
            return Ok((!bare.is_empty()).then(|| Id { value: bare.to_string(), quoted: false }));
        }

        let mut value = self.read_quoted()?;
        loop {
            let before = self.pos;
            self.skip_trivia();
            if self.eat("+") {
                self.skip_trivia();
                if self.peek() == Some('"') {
                    value.push_str(&self.read_quoted()?);
                    continue;
                }
            }
            self.pos = before;
            break;
        }

        Ok(Some(Id { value, quoted: true }))
    }

    /// Reads text verbatim until `stop` matches or a comment starts.
    fn read_verbatim(&mut self, stop: impl Fn(char) -> bool) -> Option<String> {
        let rest = self.rest();
        let mut end = rest.find(stop).unwrap_or(rest.len());
        if let Some(comment) = [rest[..end].find("//"), rest[..end].find("/*")].into_iter().flatten().min() {
            end = comment;
        }
        self.pos += end;
        (end > 0).then(|| rest[..end].to_string())
    }

    /// Reads an attribute value: quoted, or bare up to the next separator.
    fn read_value(&mut self) -> Result<Option<String>> {
        if self.peek() == Some('"') {
            return Ok(self.read_id()?.map(|id| id.value));
        }
        Ok(self.read_verbatim(|c| c.is_whitespace() || matches!(c, ',' | ';' | ']')))
    }

    /// Reads zero or more consecutive `[...]` lists into one map. Returns
    /// `None` when no list is present.
    fn read_attr_lists(&mut self) -> Result<Option<AttributeMap>> {
        let mut attrs: Option<AttributeMap> = None;
        loop {
            self.skip_trivia();
            if self.peek() != Some('[') {
                return Ok(attrs);
            }
            self.read_attr_list(attrs.get_or_insert_with(AttributeMap::new))?;
        }
    }

    fn read_attr_list(&mut self, attrs: &mut AttributeMap) -> Result<()> {
        let open = self.pos;
        self.pos += 1;

        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(RenderDotError::malformed(self.location(open), "unterminated attribute list")),
                Some(']') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(',' | ';') => self.pos += 1,
                Some(c) => {
                    let key = if c == '"' {
                        self.read_id()?.map(|id| id.value)
                    } else {
                        self.read_verbatim(|c| c.is_whitespace() || matches!(c, '=' | ',' | ';' | ']' | '['))
                    };
                    let Some(key) = key else {
                        self.pos += c.len_utf8();
                        continue;
                    };

                    self.skip_trivia();
                    if self.eat("=") {
                        self.skip_trivia();
                        let value = self.read_value()?.unwrap_or_default();
                        attrs.insert(key, value);
                    } else {
                        debug!(key = key.as_str(), "ignoring attribute without a value");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(body: &str) -> Vec<String> {
        split_statements(body, 0, false)
            .unwrap()
            .into_iter()
            .map(|s| s.text.trim().to_string())
            .collect()
    }

    #[test]
    fn test_split_on_semicolons_and_newlines() {
        assert_eq!(texts("a; b\nc;;\n\n d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_respects_brackets_and_quotes() {
        assert_eq!(
            texts("a [label=\"x; y\", k=v;\n w=z]; b"),
            vec!["a [label=\"x; y\", k=v;\n w=z]", "b"]
        );
        assert_eq!(texts(r#""a;\"b" -> c"#), vec![r#""a;\"b" -> c"#]);
    }

    #[test]
    fn test_split_drops_comments() {
        let statements = texts("// leading\na /* inline; */ ;\n# preprocessor line\nb // trailing");
        assert_eq!(statements, vec!["a /* inline; */", "b // trailing"]);
    }

    #[test]
    fn test_split_offsets_and_indices() {
        let statements = split_statements("  a;\n b", 7, false).unwrap();
        assert_eq!(statements[0].index, 0);
        assert_eq!(statements[0].offset, 7);
        assert_eq!(statements[1].index, 1);
        assert_eq!(statements[1].offset, 12);
    }

    #[test]
    fn test_braced_body_stops_at_closing_brace() {
        let statements = split_statements("a; subgraph s { b; c }; d } trailing", 0, true).unwrap();
        let texts: Vec<&str> = statements.iter().map(|s| s.text.trim()).collect();
        assert_eq!(texts, vec!["a", "subgraph s { b; c }", "d"]);
    }

    #[test]
    fn test_unterminated_graph_body() {
        let err = parse_dot("digraph g { a -> b").unwrap_err();
        assert!(matches!(
            err,
            RenderDotError::MalformedInput { location: Location::Offset(10), .. }
        ));
    }

    #[test]
    fn test_unterminated_bracket_location() {
        let err = parse_dot("a; b; c [color=red").unwrap_err();
        match err {
            RenderDotError::MalformedInput { location, reason } => {
                assert_eq!(location, Location::Statement { index: 2, offset: 8 });
                assert!(reason.contains("attribute list"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_dot("a [label=\"open]").unwrap_err();
        match err {
            RenderDotError::MalformedInput { reason, .. } => assert!(reason.contains("quoted string")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(parse_dot("a; /* never closed").is_err());
    }

    #[test]
    fn test_header_variants() {
        let record = parse_dot("strict digraph \"\" { a }").unwrap();
        assert!(record.is_strict());
        assert!(record.is_directed());
        assert_eq!(record.name(), None);

        let record = parse_dot("graph G { a -- b }").unwrap();
        assert!(!record.is_strict());
        assert!(!record.is_directed());
        assert_eq!(record.name(), Some("G"));
        assert_eq!(record.edges()[0].id, "a->b");

        let record = parse_dot("DiGraph { a }").unwrap();
        assert!(record.is_directed());
    }

    #[test]
    fn test_fragment_starting_with_graph_defaults() {
        let record = parse_dot("graph [bgcolor=white]; a").unwrap();
        assert_eq!(record.graph_attributes()["bgcolor"], "white");
        assert_eq!(record.nodes().len(), 1);
    }

    #[test]
    fn test_classification() {
        let raw = |text| RawStatement { index: 0, offset: 0, text };
        assert!(matches!(
            parse_statement(&raw("node [shape=box]")).unwrap(),
            Statement::Defaults(DefaultsKind::Node, _)
        ));
        assert!(matches!(
            parse_statement(&raw("EDGE [style=dashed]")).unwrap(),
            Statement::Defaults(DefaultsKind::Edge, _)
        ));
        assert_eq!(
            parse_statement(&raw("rankdir = LR")).unwrap(),
            Statement::GraphAttribute("rankdir".into(), "LR".into())
        );
        assert!(matches!(parse_statement(&raw("a")).unwrap(), Statement::Node(_)));
        assert!(matches!(parse_statement(&raw("a->b")).unwrap(), Statement::Edges(_)));
        assert!(matches!(parse_statement(&raw("node")).unwrap(), Statement::Skipped(_)));
        assert!(matches!(parse_statement(&raw("a:port -> b")).unwrap(), Statement::Skipped(_)));
        assert!(matches!(parse_statement(&raw("a -> {b c}")).unwrap(), Statement::Skipped(_)));
        assert!(matches!(parse_statement(&raw("[x=1]")).unwrap(), Statement::Skipped(_)));
    }

    #[test]
    fn test_quoted_keyword_is_a_node() {
        let record = parse_dot(r#""node" [shape=box]"#).unwrap();
        assert_eq!(record.nodes()[0].id, "node");
        assert!(record.defaults().node.is_empty());
    }

    #[test]
    fn test_attribute_list_separators() {
        let record = parse_dot("a [x=1; y=2 z=3,, w=\"4\"] [v=5]").unwrap();
        let attrs = &record.nodes()[0].attributes;
        let pairs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("x", "1"), ("y", "2"), ("z", "3"), ("w", "4"), ("v", "5")]);
    }

    #[test]
    fn test_bare_values_verbatim() {
        let record = parse_dot("a [color=#FFAA33, width=0.5, empty=]").unwrap();
        let attrs = &record.nodes()[0].attributes;
        assert_eq!(attrs["color"], "#FFAA33");
        assert_eq!(attrs["width"], "0.5");
        assert_eq!(attrs["empty"], "");
    }

    #[test]
    fn test_value_without_key_is_ignored() {
        let record = parse_dot("a [filled, color=red]").unwrap();
        let attrs = &record.nodes()[0].attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["color"], "red");
    }

    #[test]
    fn test_string_concatenation_and_escapes() {
        let record = parse_dot(r#""a" + "b" [label="say \"hi\"\lnext"]"#).unwrap();
        let node = &record.nodes()[0];
        assert_eq!(node.id, "ab");
        assert_eq!(node.attributes["label"], r#"say "hi"\lnext"#);
    }

    #[test]
    fn test_numeral_and_unicode_ids() {
        let record = parse_dot("-1.5 -> théorème_2").unwrap();
        assert_eq!(record.edges()[0].source, "-1.5");
        assert_eq!(record.edges()[0].target, "théorème_2");
    }

    #[test]
    fn test_edge_chain_expands_per_hop() {
        let record = parse_dot("a -> b -> c [color=red]").unwrap();
        let ids: Vec<&str> = record.edges().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a->b", "b->c"]);
        assert!(record.edges().iter().all(|e| e.attributes["color"] == "red"));
    }

    #[test]
    fn test_report_lists_skipped_statements() {
        let (record, report) = parse_dot_with_report("digraph { a; subgraph x { b }; c:n -> d; e }").unwrap();
        assert_eq!(record.nodes().len(), 2);
        assert_eq!(report.statements, 4);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].text, "subgraph x { b }");
        assert_eq!(report.skipped[1].text, "c:n -> d");
    }
}
