//! Generic nodes to YAML text
//!
//! Produces the same layout libyaml does with an indent of 2 and a preferred
//! width of 80 columns, which is the layout the rest of the module tooling
//! ecosystem writes and diffs against: explicit `---`/`...` markers,
//! indentless block sequences under mapping keys, plain scalars wrapped at
//! spaces past the width, and libyaml's folding for `>` block scalars.

use thiserror::Error;

use super::node::{CollectionStyle, Mapping, Node, NodeKind, Scalar, ScalarStyle};

const BEST_INDENT: usize = 2;
const BEST_WIDTH: usize = 80;

/// A node tree that cannot be written as YAML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("Cannot emit {kind} '{value}': {reason}")]
    InvalidScalar {
        kind: NodeKind,
        value: String,
        reason: &'static str,
    },
}

/// Emit one document, framed by `---` and `...`.
pub fn emit_document(node: &Node) -> Result<String, EmitError> {
    let mut emitter = Emitter::new();
    emitter.document(node)?;
    Ok(emitter.finish())
}

/// Emit several documents into one stream.
pub fn emit_documents<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Result<String, EmitError> {
    let mut emitter = Emitter::new();
    for node in nodes {
        emitter.document(node)?;
    }
    Ok(emitter.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Block,
    Flow,
    Key,
}

/// What libyaml's scalar analysis allows for a piece of text
#[derive(Debug, Default)]
struct Analysis {
    empty: bool,
    multiline: bool,
    flow_plain_allowed: bool,
    block_plain_allowed: bool,
    single_quoted_allowed: bool,
    block_allowed: bool,
}

fn is_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_printable(c: char) -> bool {
    matches!(c,
        '\n' | '\u{20}'..='\u{7E}' | '\u{85}' | '\u{A0}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
        && c != '\u{FEFF}'
}

fn analyze(text: &str) -> Analysis {
    if text.is_empty() {
        return Analysis {
            empty: true,
            single_quoted_allowed: true,
            ..Analysis::default()
        };
    }

    let chars: Vec<char> = text.chars().collect();
    let mut flow_indicators = text.starts_with("---") || text.starts_with("...");
    let mut block_indicators = flow_indicators;
    let mut special_characters = false;
    let mut line_breaks = false;
    let mut space_break = false;
    let mut break_space = false;
    let mut previous_space = false;
    let mut previous_break = false;
    let mut preceded_by_whitespace = true;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let followed_by_whitespace = next.is_none_or(|n| is_blank(n) || is_break(n));

        if i == 0 {
            match c {
                '#' | ',' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '"'
                | '%' | '@' | '`' => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                '?' | ':' => {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                '-' if followed_by_whitespace => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                _ => {}
            }
        } else {
            match c {
                ',' | '?' | '[' | ']' | '{' | '}' => flow_indicators = true,
                ':' => {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                '#' if preceded_by_whitespace => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                _ => {}
            }
        }

        if !is_printable(c) {
            special_characters = true;
        }
        if is_break(c) {
            line_breaks = true;
        }

        if c == ' ' {
            if previous_break {
                break_space = true;
            }
            previous_space = true;
            previous_break = false;
        } else if is_break(c) {
            if previous_space {
                space_break = true;
            }
            previous_break = true;
            previous_space = false;
        } else {
            previous_space = false;
            previous_break = false;
        }

        preceded_by_whitespace = is_blank(c) || is_break(c);
    }

    let first = chars[0];
    let last = chars[chars.len() - 1];
    let leading_space = first == ' ';
    let leading_break = is_break(first);
    let trailing_space = last == ' ';
    let trailing_break = is_break(last);

    let mut analysis = Analysis {
        empty: false,
        multiline: line_breaks,
        flow_plain_allowed: true,
        block_plain_allowed: true,
        single_quoted_allowed: true,
        block_allowed: true,
    };

    if leading_space || leading_break || trailing_space || trailing_break {
        analysis.flow_plain_allowed = false;
        analysis.block_plain_allowed = false;
    }
    if trailing_space {
        analysis.block_allowed = false;
    }
    if break_space {
        analysis.flow_plain_allowed = false;
        analysis.block_plain_allowed = false;
        analysis.single_quoted_allowed = false;
    }
    if space_break || special_characters {
        analysis.flow_plain_allowed = false;
        analysis.block_plain_allowed = false;
        analysis.single_quoted_allowed = false;
        analysis.block_allowed = false;
    }
    if line_breaks {
        analysis.flow_plain_allowed = false;
        analysis.block_plain_allowed = false;
    }
    if flow_indicators {
        analysis.flow_plain_allowed = false;
    }
    if block_indicators {
        analysis.block_plain_allowed = false;
    }
    analysis
}

struct Emitter {
    out: String,
    column: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            column: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
        self.column += text.chars().count();
    }

    fn write_char(&mut self, c: char) {
        self.out.push(c);
        self.column += 1;
    }

    fn line_break(&mut self) {
        self.out.push('\n');
        self.column = 0;
    }

    /// Move to column `indent` of a fresh line.
    fn write_indent(&mut self, indent: usize) {
        if self.column > 0 {
            self.line_break();
        }
        while self.column < indent {
            self.write_char(' ');
        }
    }

    fn document(&mut self, node: &Node) -> Result<(), EmitError> {
        if self.column > 0 {
            self.line_break();
        }
        self.write("---");
        match node {
            Node::Mapping(mapping) if !mapping.is_empty() => self.mapping(mapping, 0, false)?,
            Node::Sequence(items, CollectionStyle::Block) if !items.is_empty() => {
                self.sequence(items, 0, false)?
            }
            other => {
                self.write(" ");
                self.inline_value(other, BEST_INDENT)?;
            }
        }
        if self.column > 0 {
            self.line_break();
        }
        self.write("...");
        self.line_break();
        Ok(())
    }

    /// Values that fit after an indicator on the current line.
    fn inline_value(&mut self, node: &Node, indent: usize) -> Result<(), EmitError> {
        match node {
            Node::Scalar(scalar) => self.scalar(scalar, indent, Context::Block),
            Node::Sequence(items, _) if items.is_empty() => {
                self.write("[]");
                Ok(())
            }
            Node::Mapping(mapping) if mapping.is_empty() => {
                self.write("{}");
                Ok(())
            }
            Node::Sequence(items, _) => self.flow_sequence(items, indent),
            Node::Mapping(mapping) => self.flow_mapping(mapping, indent),
        }
    }

    fn flow_mapping(&mut self, mapping: &Mapping, indent: usize) -> Result<(), EmitError> {
        self.write("{");
        for (i, (key, value)) in mapping.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.scalar(&Scalar::string(key), indent, Context::Flow)?;
            self.write(": ");
            match value {
                Node::Scalar(scalar) => self.scalar(scalar, indent, Context::Flow)?,
                other => self.inline_value(other, indent)?,
            }
        }
        self.write("}");
        Ok(())
    }

    fn is_flow_sequence(node: &Node) -> bool {
        match node {
            Node::Sequence(items, CollectionStyle::Flow) => {
                items.iter().all(|item| matches!(item, Node::Scalar(_)))
            }
            _ => false,
        }
    }

    fn mapping(
        &mut self,
        mapping: &Mapping,
        indent: usize,
        inline_first: bool,
    ) -> Result<(), EmitError> {
        for (i, (key, value)) in mapping.iter().enumerate() {
            if i > 0 || !inline_first {
                self.write_indent(indent);
            }
            self.scalar(&Scalar::string(key), indent, Context::Key)?;
            self.write(":");
            match value {
                Node::Mapping(nested) if !nested.is_empty() => {
                    self.mapping(nested, indent + BEST_INDENT, false)?
                }
                Node::Sequence(items, _) if !items.is_empty() && !Self::is_flow_sequence(value) => {
                    self.sequence(items, indent, false)?
                }
                other => {
                    self.write(" ");
                    self.inline_value(other, indent + BEST_INDENT)?;
                }
            }
        }
        Ok(())
    }

    fn sequence(
        &mut self,
        items: &[Node],
        indent: usize,
        inline_first: bool,
    ) -> Result<(), EmitError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.write_indent(indent);
            }
            self.write("-");
            self.write(" ");
            match item {
                Node::Mapping(nested) if !nested.is_empty() => {
                    self.mapping(nested, indent + BEST_INDENT, true)?
                }
                Node::Sequence(nested, _)
                    if !nested.is_empty() && !Self::is_flow_sequence(item) =>
                {
                    self.sequence(nested, indent + BEST_INDENT, true)?
                }
                other => self.inline_value(other, indent + BEST_INDENT)?,
            }
        }
        Ok(())
    }

    fn flow_sequence(&mut self, items: &[Node], indent: usize) -> Result<(), EmitError> {
        self.write("[");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            if self.column > BEST_WIDTH {
                self.write_indent(indent);
            } else if i > 0 {
                self.write(" ");
            }
            match item {
                Node::Scalar(scalar) => self.scalar(scalar, indent, Context::Flow)?,
                other => self.inline_value(other, indent)?,
            }
        }
        self.write("]");
        Ok(())
    }

    fn scalar(
        &mut self,
        scalar: &Scalar,
        indent: usize,
        context: Context,
    ) -> Result<(), EmitError> {
        let text = scalar.value();

        if scalar.kind() != NodeKind::String {
            if scalar.kind() == NodeKind::Null && text.is_empty() {
                self.write("null");
                return Ok(());
            }
            if text.chars().any(|c| is_break(c) || !is_printable(c)) {
                return Err(EmitError::InvalidScalar {
                    kind: scalar.kind(),
                    value: text.to_string(),
                    reason: "non-string scalars must be single-line plain text",
                });
            }
            self.write(text);
            return Ok(());
        }

        let analysis = analyze(text);
        let plain_allowed = match context {
            Context::Flow => analysis.flow_plain_allowed,
            Context::Block | Context::Key => analysis.block_plain_allowed,
        } && !analysis.empty;

        let style = match scalar.style() {
            ScalarStyle::Literal | ScalarStyle::Folded
                if context == Context::Block && analysis.block_allowed =>
            {
                scalar.style()
            }
            ScalarStyle::Literal | ScalarStyle::Folded => ScalarStyle::DoubleQuoted,
            ScalarStyle::Plain if plain_allowed && NodeKind::resolve(text) != NodeKind::Null => {
                ScalarStyle::Plain
            }
            ScalarStyle::Any if plain_allowed && NodeKind::resolve(text) == NodeKind::String => {
                ScalarStyle::Plain
            }
            ScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            _ if analysis.single_quoted_allowed && !analysis.multiline => ScalarStyle::SingleQuoted,
            _ => ScalarStyle::DoubleQuoted,
        };

        match style {
            ScalarStyle::Plain | ScalarStyle::Any => {
                self.write_plain(text, indent, context != Context::Key)
            }
            ScalarStyle::SingleQuoted => self.write_single_quoted(text),
            ScalarStyle::DoubleQuoted => self.write_double_quoted(text),
            ScalarStyle::Literal => self.write_literal(text, indent),
            ScalarStyle::Folded => self.write_folded(text, indent),
        }
        Ok(())
    }

    fn write_plain(&mut self, text: &str, indent: usize, allow_breaks: bool) {
        let chars: Vec<char> = text.chars().collect();
        let mut spaces = false;
        for (i, &c) in chars.iter().enumerate() {
            if c == ' ' {
                let next_is_space = chars.get(i + 1) == Some(&' ');
                if allow_breaks && !spaces && self.column > BEST_WIDTH && !next_is_space {
                    self.write_indent(indent);
                } else {
                    self.write_char(c);
                }
                spaces = true;
            } else {
                self.write_char(c);
                spaces = false;
            }
        }
    }

    fn write_single_quoted(&mut self, text: &str) {
        self.write_char('\'');
        for c in text.chars() {
            if c == '\'' {
                self.write("''");
            } else {
                self.write_char(c);
            }
        }
        self.write_char('\'');
    }

    fn write_double_quoted(&mut self, text: &str) {
        self.write_char('"');
        for c in text.chars() {
            match c {
                '\0' => self.write("\\0"),
                '\u{7}' => self.write("\\a"),
                '\u{8}' => self.write("\\b"),
                '\t' => self.write("\\t"),
                '\n' => self.write("\\n"),
                '\u{b}' => self.write("\\v"),
                '\u{c}' => self.write("\\f"),
                '\r' => self.write("\\r"),
                '\u{1b}' => self.write("\\e"),
                '"' => self.write("\\\""),
                '\\' => self.write("\\\\"),
                '\u{85}' => self.write("\\N"),
                '\u{a0}' => self.write("\\_"),
                '\u{2028}' => self.write("\\L"),
                '\u{2029}' => self.write("\\P"),
                c if is_printable(c) => self.write_char(c),
                c if (c as u32) <= 0xFF => self.write(&format!("\\x{:02X}", c as u32)),
                c if (c as u32) <= 0xFFFF => self.write(&format!("\\u{:04X}", c as u32)),
                c => self.write(&format!("\\U{:08X}", c as u32)),
            }
        }
        self.write_char('"');
    }

    /// Indentation and chomping indicators for a block scalar.
    fn block_hints(chars: &[char]) -> String {
        let mut hints = String::new();
        if let Some(&first) = chars.first()
            && (first == ' ' || is_break(first))
        {
            hints.push_str(&BEST_INDENT.to_string());
        }
        match chars {
            [] => hints.push('-'),
            [.., last] if !is_break(*last) => hints.push('-'),
            [_] => hints.push('+'),
            [.., before, _] if is_break(*before) => hints.push('+'),
            _ => {}
        }
        hints
    }

    fn write_literal(&mut self, text: &str, indent: usize) {
        let chars: Vec<char> = text.chars().collect();
        self.write("|");
        self.write(&Self::block_hints(&chars));
        self.line_break();
        let mut breaks = true;
        for &c in &chars {
            if is_break(c) {
                self.line_break();
                breaks = true;
            } else {
                if breaks {
                    self.write_indent(indent);
                }
                self.write_char(c);
                breaks = false;
            }
        }
    }

    fn write_folded(&mut self, text: &str, indent: usize) {
        let chars: Vec<char> = text.chars().collect();
        self.write(">");
        self.write(&Self::block_hints(&chars));
        self.line_break();
        let mut breaks = true;
        let mut leading_spaces = true;
        for (i, &c) in chars.iter().enumerate() {
            if is_break(c) {
                if !breaks && !leading_spaces && c == '\n' {
                    let mut k = i;
                    while k < chars.len() && is_break(chars[k]) {
                        k += 1;
                    }
                    if k < chars.len() && !is_blank(chars[k]) {
                        self.line_break();
                    }
                }
                self.line_break();
                breaks = true;
            } else {
                if breaks {
                    self.write_indent(indent);
                    leading_spaces = is_blank(c);
                }
                let next_is_space = chars.get(i + 1) == Some(&' ');
                if !breaks && c == ' ' && !next_is_space && self.column > BEST_WIDTH {
                    self.line_break();
                    self.write_indent(indent);
                } else {
                    self.write_char(c);
                }
                breaks = false;
            }
        }
    }
}
