//! # `.mmt` Parser
//!
//! Line-oriented structural parser for the model text format:
//!
//! ```text
//! [[model]]
//! name: hodgkin-huxley
//! desc: """
//! A multi-line description.
//! """
//! # Initial values
//! membrane.V = -75
//!
//! [membrane]
//! dot(V) = -i_ion / C
//!     in [mV]
//!     label membrane_potential
//! C = 1 in [uF/cm^2]
//! i_ion = 0
//!
//! [[protocol]]
//! # level  start  length  period  multiplier
//! 1.0      10     0.5     1000    0
//!
//! [[script]]
//! free text up to the next [[section]]
//! ```
//!
//! Expressions are kept verbatim; only their parentheses are checked. Every
//! error carries the 1-based line it was detected on.

use std::collections::HashSet;

use crate::error::ParseError;
use crate::model::{Component, EventStart, InitialValue, Model, ProtocolEvent, Variable};

const TRIPLE_QUOTE: &str = "\"\"\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Model,
    Component(usize),
    Protocol,
    Script,
}

/// Parse model source text.
pub fn parse(source: &str) -> Result<Model, ParseError> {
    Parser::new(source).run()
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    section: Section,
    seen_model: bool,
    seen_protocol: bool,
    /// Most recent top-level variable of the current component.
    parent: Option<String>,
    bindings: HashSet<String>,
    labels: HashSet<String>,
    model: Model,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            pos: 0,
            section: Section::Preamble,
            seen_model: false,
            seen_protocol: false,
            parent: None,
            bindings: HashSet::new(),
            labels: HashSet::new(),
            model: Model::default(),
        }
    }

    /// Next raw line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn run(mut self) -> Result<Model, ParseError> {
        while let Some((number, raw)) = self.next_line() {
            if self.section == Section::Script && !raw.trim_start().starts_with("[[") {
                continue;
            }

            let line = strip_comment(raw);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') {
                self.header(number, trimmed)?;
                continue;
            }

            let indented = line.starts_with(char::is_whitespace);
            match self.section {
                Section::Preamble => {
                    return Err(ParseError::new(number, "expected [[model]] header"));
                }
                Section::Model => self.model_line(number, trimmed)?,
                Section::Component(index) => self.component_line(number, index, trimmed, indented)?,
                Section::Protocol => self.protocol_line(number, trimmed)?,
                Section::Script => {}
            }
        }

        if !self.seen_model {
            return Err(ParseError::new(
                self.lines.len().max(1),
                "empty model file: expected [[model]] header",
            ));
        }
        self.check_states()?;
        Ok(self.model)
    }

    fn header(&mut self, number: usize, trimmed: &str) -> Result<(), ParseError> {
        let malformed = || ParseError::new(number, format!("malformed section header: {trimmed}"));

        if let Some(inner) = trimmed.strip_prefix("[[") {
            let name = inner.strip_suffix("]]").ok_or_else(malformed)?.trim();
            if !self.seen_model && name != "model" {
                return Err(ParseError::new(number, "expected [[model]] header"));
            }
            self.section = match name {
                "model" if self.seen_model => {
                    return Err(ParseError::new(number, "duplicate [[model]] section"));
                }
                "model" => {
                    self.seen_model = true;
                    Section::Model
                }
                "protocol" if self.seen_protocol => {
                    return Err(ParseError::new(number, "duplicate [[protocol]] section"));
                }
                "protocol" => {
                    self.seen_protocol = true;
                    Section::Protocol
                }
                "script" => Section::Script,
                other => {
                    return Err(ParseError::new(number, format!("unknown section [[{other}]]")));
                }
            };
            return Ok(());
        }

        if !self.seen_model {
            return Err(ParseError::new(number, "expected [[model]] header"));
        }
        let name = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(malformed)?
            .trim();
        if !is_identifier(name) {
            return Err(ParseError::new(number, format!("invalid component name: {name}")));
        }
        if self.model.component(name).is_some() {
            return Err(ParseError::new(number, format!("duplicate component: {name}")));
        }
        self.model.components.push(Component {
            name: name.to_string(),
            line: number,
            ..Component::default()
        });
        self.section = Section::Component(self.model.components.len() - 1);
        self.parent = None;
        Ok(())
    }

    fn model_line(&mut self, number: usize, trimmed: &str) -> Result<(), ParseError> {
        if let Some((key, value)) = split_meta(trimmed) {
            let key = meta_key(number, key)?;
            let value = self.meta_value(number, value)?;
            return insert_meta(&mut self.model.meta, key, value, number);
        }

        let (target, value) = trimmed.split_once('=').ok_or_else(|| {
            ParseError::new(
                number,
                "expected 'key: value' or 'component.variable = value' in model header",
            )
        })?;
        let (target, value) = (target.trim(), value.trim());
        let (component, variable) = target
            .split_once('.')
            .filter(|(c, v)| is_identifier(c) && is_identifier(v))
            .ok_or_else(|| ParseError::new(number, format!("invalid initial value target: {target}")))?;
        if value.is_empty() {
            return Err(ParseError::new(number, format!("missing initial value for {target}")));
        }
        let value = self.join_continuation(number, value)?;
        if self
            .model
            .initial_values
            .iter()
            .any(|iv| iv.component == component && iv.variable == variable)
        {
            return Err(ParseError::new(number, format!("duplicate initial value for {target}")));
        }
        self.model.initial_values.push(InitialValue {
            component: component.to_string(),
            variable: variable.to_string(),
            value,
            line: number,
        });
        Ok(())
    }

    fn component_line(
        &mut self,
        number: usize,
        index: usize,
        trimmed: &str,
        indented: bool,
    ) -> Result<(), ParseError> {
        if let Some(rest) = trimmed.strip_prefix("use ") {
            return self.use_line(number, index, rest);
        }

        if let Some((key, value)) = split_meta(trimmed) {
            let key = meta_key(number, key)?;
            let value = self.meta_value(number, value)?;
            let component = &mut self.model.components[index];
            let target = if indented {
                component.variables.last_mut().map(|v| &mut v.meta)
            } else {
                None
            };
            return insert_meta(target.unwrap_or(&mut component.meta), key, value, number);
        }

        if indented && is_attribute_line(trimmed) {
            let mut variable = self.model.components[index]
                .variables
                .pop()
                .ok_or_else(|| ParseError::new(number, "attribute outside of a variable definition"))?;
            let result = self.parse_attributes(number, trimmed, &mut variable);
            self.model.components[index].variables.push(variable);
            return result;
        }

        self.definition(number, index, trimmed, indented)
    }

    fn definition(
        &mut self,
        number: usize,
        index: usize,
        trimmed: &str,
        indented: bool,
    ) -> Result<(), ParseError> {
        let (lhs, rhs) = trimmed.split_once('=').ok_or_else(|| {
            ParseError::new(number, format!("expected a variable definition, found: {trimmed}"))
        })?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());

        let (name, is_state) = match lhs.strip_prefix("dot(").and_then(|s| s.strip_suffix(')')) {
            Some(inner) => (inner.trim(), true),
            None => (lhs, false),
        };
        if !is_identifier(name) {
            return Err(ParseError::new(number, format!("invalid variable name: {lhs}")));
        }

        let name = if indented {
            let parent = self
                .parent
                .as_deref()
                .ok_or_else(|| ParseError::new(number, format!("nested variable {name} has no parent")))?;
            if is_state {
                return Err(ParseError::new(number, format!("nested variable {name} cannot be a state")));
            }
            format!("{parent}.{name}")
        } else {
            self.parent = Some(name.to_string());
            name.to_string()
        };

        let component = &self.model.components[index];
        if component.variable(&name).is_some() || component.imports.iter().any(|(_, alias)| *alias == name) {
            return Err(ParseError::new(
                number,
                format!("duplicate variable {}.{name}", component.name),
            ));
        }

        let rhs = self.join_continuation(number, rhs)?;
        let (expression, attributes) = split_expression(&rhs);
        if expression.is_empty() {
            return Err(ParseError::new(number, format!("missing expression for {name}")));
        }

        let mut variable = Variable {
            name,
            expression: expression.to_string(),
            is_state,
            line: number,
            ..Variable::default()
        };
        self.parse_attributes(number, attributes, &mut variable)?;
        self.model.components[index].variables.push(variable);
        Ok(())
    }

    /// Append following lines to `text` until its parentheses close.
    fn join_continuation(&mut self, number: usize, text: &str) -> Result<String, ParseError> {
        let mut joined = text.to_string();
        while open_parentheses(number, &joined)? > 0 {
            let (_, raw) = self
                .next_line()
                .ok_or_else(|| ParseError::new(number, "unbalanced parentheses"))?;
            let piece = strip_comment(raw).trim();
            if !piece.is_empty() {
                joined.push(' ');
                joined.push_str(piece);
            }
        }
        Ok(joined)
    }

    fn use_line(&mut self, number: usize, index: usize, rest: &str) -> Result<(), ParseError> {
        for item in rest.split(',') {
            let item = item.trim();
            let (source, alias) = match item.split_once(" as ") {
                Some((source, alias)) => (source.trim(), Some(alias.trim())),
                None => (item, None),
            };
            let (_, variable) = source
                .split_once('.')
                .filter(|(c, v)| is_identifier(c) && is_identifier(v))
                .ok_or_else(|| ParseError::new(number, format!("invalid import: {item}")))?;
            let alias = alias.unwrap_or(variable);
            if !is_identifier(alias) {
                return Err(ParseError::new(number, format!("invalid import alias: {alias}")));
            }

            let component = &mut self.model.components[index];
            if component.variable(alias).is_some() || component.imports.iter().any(|(_, a)| a == alias) {
                return Err(ParseError::new(
                    number,
                    format!("duplicate variable {}.{alias}", component.name),
                ));
            }
            component.imports.push((source.to_string(), alias.to_string()));
        }
        Ok(())
    }

    /// Parse `in [unit]`, `bind name`, and `label name` into `variable`.
    fn parse_attributes(
        &mut self,
        number: usize,
        mut rest: &str,
        variable: &mut Variable,
    ) -> Result<(), ParseError> {
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                return Ok(());
            }

            if let Some(after) = strip_keyword(rest, "in") {
                let inner = after
                    .trim_start()
                    .strip_prefix('[')
                    .ok_or_else(|| ParseError::new(number, "expected [unit] after 'in'"))?;
                let end = inner
                    .find(']')
                    .ok_or_else(|| ParseError::new(number, "unterminated unit"))?;
                if variable.unit.is_some() {
                    return Err(ParseError::new(number, format!("duplicate unit for {}", variable.name)));
                }
                variable.unit = Some(inner[..end].trim().to_string());
                rest = &inner[end + 1..];
            } else if let Some(after) = strip_keyword(rest, "bind") {
                let (word, remainder) = next_word(after);
                if !is_identifier(word) {
                    return Err(ParseError::new(number, format!("invalid binding: {word}")));
                }
                if variable.binding.is_some() || !self.bindings.insert(word.to_string()) {
                    return Err(ParseError::new(number, format!("binding {word} used more than once")));
                }
                variable.binding = Some(word.to_string());
                rest = remainder;
            } else if let Some(after) = strip_keyword(rest, "label") {
                let (word, remainder) = next_word(after);
                if !is_identifier(word) {
                    return Err(ParseError::new(number, format!("invalid label: {word}")));
                }
                if variable.label.is_some() || !self.labels.insert(word.to_string()) {
                    return Err(ParseError::new(number, format!("label {word} used more than once")));
                }
                variable.label = Some(word.to_string());
                rest = remainder;
            } else {
                return Err(ParseError::new(
                    number,
                    format!("unexpected text after expression: {rest}"),
                ));
            }
        }
    }

    fn protocol_line(&mut self, number: usize, trimmed: &str) -> Result<(), ParseError> {
        let invalid = || {
            ParseError::new(
                number,
                "invalid protocol row: expected level, start, length, period, multiplier",
            )
        };
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [level, start, duration, period, multiplier] = fields[..] else {
            return Err(invalid());
        };
        let value = |field: &str| field.parse::<f64>().map_err(|_| invalid());
        let start = match start {
            "next" => EventStart::Next,
            other => EventStart::At(value(other)?),
        };
        let event = ProtocolEvent {
            level: value(level)?,
            start,
            duration: value(duration)?,
            period: value(period)?,
            multiplier: value(multiplier)?,
        };
        if event.duration < 0.0 || event.period < 0.0 || event.multiplier < 0.0 {
            return Err(ParseError::new(
                number,
                "protocol length, period, and multiplier must be non-negative",
            ));
        }
        self.model.protocol.push(event);
        Ok(())
    }

    /// Resolve a meta value, reading ahead for triple-quoted strings.
    fn meta_value(&mut self, number: usize, value: &str) -> Result<String, ParseError> {
        let Some(rest) = value.strip_prefix(TRIPLE_QUOTE) else {
            return Ok(value.to_string());
        };
        if let Some(end) = rest.find(TRIPLE_QUOTE) {
            return Ok(rest[..end].trim().to_string());
        }

        let mut parts = vec![rest];
        loop {
            let (_, raw) = self
                .next_line()
                .ok_or_else(|| ParseError::new(number, "unterminated triple-quoted string"))?;
            if let Some(end) = raw.find(TRIPLE_QUOTE) {
                parts.push(&raw[..end]);
                break;
            }
            parts.push(raw);
        }
        Ok(parts.join("\n").trim().to_string())
    }

    fn check_states(&self) -> Result<(), ParseError> {
        for iv in &self.model.initial_values {
            let variable = self
                .model
                .component(&iv.component)
                .and_then(|c| c.variable(&iv.variable));
            match variable {
                Some(v) if v.is_state => {}
                Some(_) => {
                    return Err(ParseError::new(
                        iv.line,
                        format!("{}.{} is not a state variable", iv.component, iv.variable),
                    ));
                }
                None => {
                    return Err(ParseError::new(
                        iv.line,
                        format!("initial value for unknown state {}.{}", iv.component, iv.variable),
                    ));
                }
            }
        }

        for component in &self.model.components {
            for variable in component.variables.iter().filter(|v| v.is_state) {
                let assigned = self
                    .model
                    .initial_values
                    .iter()
                    .any(|iv| iv.component == component.name && iv.variable == variable.name);
                if !assigned {
                    return Err(ParseError::new(
                        variable.line,
                        format!("no initial value for state {}.{}", component.name, variable.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Remove a `#` comment, ignoring `#` inside double-quoted text.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split `key: value` when the colon comes before any `=`.
fn split_meta(trimmed: &str) -> Option<(&str, &str)> {
    let colon = trimmed.find(':')?;
    if trimmed.find('=').is_some_and(|eq| eq < colon) {
        return None;
    }
    Some((trimmed[..colon].trim(), trimmed[colon + 1..].trim()))
}

fn meta_key(number: usize, key: &str) -> Result<String, ParseError> {
    if is_identifier(key) {
        Ok(key.to_string())
    } else {
        Err(ParseError::new(number, format!("invalid meta data key: {key}")))
    }
}

fn insert_meta(
    meta: &mut std::collections::BTreeMap<String, String>,
    key: String,
    value: String,
    number: usize,
) -> Result<(), ParseError> {
    if meta.contains_key(&key) {
        return Err(ParseError::new(number, format!("duplicate meta data key: {key}")));
    }
    meta.insert(key, value);
    Ok(())
}

/// Split an expression from its trailing `in`/`bind`/`label` attributes.
fn split_expression(rhs: &str) -> (&str, &str) {
    let end = [" in [", " in[", " bind ", " label "]
        .iter()
        .filter_map(|pattern| rhs.find(pattern))
        .min()
        .unwrap_or(rhs.len());
    (rhs[..end].trim(), &rhs[end..])
}

fn is_attribute_line(trimmed: &str) -> bool {
    !trimmed.contains('=')
        && ["in", "bind", "label"]
            .iter()
            .any(|keyword| strip_keyword(trimmed, keyword).is_some())
}

/// Strip `keyword` when it is followed by whitespace or, for `in`, a `[`.
fn strip_keyword<'s>(text: &'s str, keyword: &str) -> Option<&'s str> {
    let after = text.strip_prefix(keyword)?;
    let boundary = after.starts_with(char::is_whitespace) || (keyword == "in" && after.starts_with('['));
    boundary.then_some(after)
}

fn next_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (&text[..end], &text[end..])
}

/// Number of parentheses left open at the end of `expression`.
fn open_parentheses(number: usize, expression: &str) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::new(number, "unbalanced parentheses"))?;
            }
            _ => {}
        }
    }
    Ok(depth)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"[[model]]
name: hodgkin-huxley
display_name: Hodgkin and Huxley 1952
mmt_authors: A. Modeller
version: 20240101
desc: """
Squid giant axon model.
Second line # not a comment.
"""
# Initial values
membrane.V = -75
ina.m = 0.05

[engine]
time = 0 bind time
    in [ms]

[membrane]
desc: Membrane potential
dot(V) = -(i_ion + i_stim) / C
    in [mV]
    label membrane_potential
C = 1 in [uF/cm^2]
i_stim = engine.pace * 20
i_ion = ina.INa

[ina]
use membrane.V as V
dot(m) = alpha * (1 - m) - beta * m
    alpha = 0.1 * (V + 40) / (1 - exp(-(V + 40) / 10))
    beta = 4 * exp(-(V + 65) / 18)
INa = 120 * m^3 * (V - 50)

[[protocol]]
# Level  Start    Length   Period   Multiplier
1.0      10.0     0.5      1000.0   0

[[script]]
import myokit
m = get_model()  # [not a component]
"#;

    fn err(source: &str) -> ParseError {
        parse(source).unwrap_err()
    }

    #[test]
    fn parses_valid_model() {
        let model = parse(VALID).unwrap();
        assert_eq!(model.name(), Some("hodgkin-huxley"));
        for key in ["name", "display_name", "mmt_authors", "version", "desc"] {
            assert!(model.has_meta(key), "missing {key}");
        }
        assert_eq!(
            model.meta["desc"],
            "Squid giant axon model.\nSecond line # not a comment."
        );
        assert_eq!(model.components.len(), 3);
        assert_eq!(model.initial_values.len(), 2);
        assert_eq!(model.protocol.len(), 1);
        assert_eq!(model.protocol[0].start, EventStart::At(10.0));
    }

    #[test]
    fn parses_variable_attributes() {
        let model = parse(VALID).unwrap();
        let membrane = model.component("membrane").unwrap();
        assert_eq!(membrane.meta["desc"], "Membrane potential");
        let v = membrane.variable("V").unwrap();
        assert!(v.is_state);
        assert_eq!(v.unit.as_deref(), Some("mV"));
        assert_eq!(v.label.as_deref(), Some("membrane_potential"));
        assert_eq!(v.expression, "-(i_ion + i_stim) / C");
        assert_eq!(membrane.variable("C").unwrap().unit.as_deref(), Some("uF/cm^2"));

        let time = model.component("engine").unwrap().variable("time").unwrap();
        assert_eq!(time.binding.as_deref(), Some("time"));
        assert_eq!(time.unit.as_deref(), Some("ms"));
    }

    #[test]
    fn nested_variables_and_imports() {
        let model = parse(VALID).unwrap();
        let ina = model.component("ina").unwrap();
        assert!(ina.variable("m.alpha").is_some());
        assert!(ina.variable("m.beta").is_some());
        assert_eq!(ina.imports, vec![("membrane.V".to_string(), "V".to_string())]);
    }

    #[test]
    fn header_only_model_is_valid() {
        let model = parse("[[model]]\nname: empty\n").unwrap();
        assert_eq!(model.name(), Some("empty"));
        assert!(model.components.is_empty());
    }

    #[test]
    fn meta_value_may_contain_colons() {
        let model = parse("[[model]]\ndesc: ratio 1:2\n").unwrap();
        assert_eq!(model.meta["desc"], "ratio 1:2");
    }

    #[test]
    fn single_line_triple_quoted_value() {
        let model = parse("[[model]]\ndesc: \"\"\"inline\"\"\"\n").unwrap();
        assert_eq!(model.meta["desc"], "inline");
    }

    #[test]
    fn empty_file_is_error() {
        let e = err("");
        assert_eq!(e.line, 1);
        assert!(e.message.contains("expected [[model]] header"));
    }

    #[test]
    fn comment_only_file_is_error() {
        let e = err("# nothing here\n\n");
        assert_eq!(e.line, 2);
        assert!(e.message.contains("empty model file"));
    }

    #[test]
    fn content_before_header_is_error() {
        let e = err("name: x\n[[model]]\n");
        assert_eq!(e, ParseError::new(1, "expected [[model]] header"));
    }

    #[test]
    fn component_before_header_is_error() {
        let e = err("[membrane]\n");
        assert_eq!(e, ParseError::new(1, "expected [[model]] header"));
    }

    #[test]
    fn unknown_section_is_error() {
        let e = err("[[model]]\n[[simulation]]\n");
        assert_eq!(e, ParseError::new(2, "unknown section [[simulation]]"));
    }

    #[test]
    fn duplicate_model_section_is_error() {
        let e = err("[[model]]\n[[model]]\n");
        assert_eq!(e.line, 2);
    }

    #[test]
    fn malformed_header_is_error() {
        let e = err("[[model]]\n[membrane\n");
        assert!(e.message.starts_with("malformed section header"));
    }

    #[test]
    fn duplicate_meta_key_is_error() {
        let e = err("[[model]]\nname: a\nname: b\n");
        assert_eq!(e, ParseError::new(3, "duplicate meta data key: name"));
    }

    #[test]
    fn invalid_meta_key_is_error() {
        let e = err("[[model]]\nbad key: a\n");
        assert_eq!(e.line, 2);
        assert!(e.message.contains("invalid meta data key"));
    }

    #[test]
    fn unterminated_triple_quote_is_error() {
        let e = err("[[model]]\ndesc: \"\"\"\nnever closed\n");
        assert_eq!(e, ParseError::new(2, "unterminated triple-quoted string"));
    }

    #[test]
    fn duplicate_component_is_error() {
        let e = err("[[model]]\n[a]\nx = 1\n[a]\n");
        assert_eq!(e, ParseError::new(4, "duplicate component: a"));
    }

    #[test]
    fn invalid_component_name_is_error() {
        let e = err("[[model]]\n[1abc]\n");
        assert!(e.message.contains("invalid component name"));
    }

    #[test]
    fn duplicate_variable_is_error() {
        let e = err("[[model]]\n[a]\nx = 1\nx = 2\n");
        assert_eq!(e, ParseError::new(4, "duplicate variable a.x"));
    }

    #[test]
    fn import_alias_conflict_is_error() {
        let e = err("[[model]]\n[a]\nx = 1\n[b]\nx = 2\nuse a.x\n");
        assert_eq!(e, ParseError::new(6, "duplicate variable b.x"));
    }

    #[test]
    fn missing_expression_is_error() {
        let e = err("[[model]]\n[a]\nx =\n");
        assert_eq!(e, ParseError::new(3, "missing expression for x"));
    }

    #[test]
    fn expression_continues_while_parentheses_are_open() {
        let source = "[[model]]\nmembrane.V = -80\n[membrane]\ndot(V) = 1\n\
                      i = piecewise(V < 0,\n    1,  # below\n\n    2) in [mA]\nj = i\n";
        let model = parse(source).unwrap();
        let membrane = model.component("membrane").unwrap();
        let i = membrane.variable("i").unwrap();
        assert_eq!(i.expression, "piecewise(V < 0, 1, 2)");
        assert_eq!(i.unit.as_deref(), Some("mA"));
        assert_eq!(i.line, 5);
        assert!(membrane.variable("j").is_some());
        assert!(membrane.variable("i.j").is_none());
    }

    #[test]
    fn initial_value_continues_while_parentheses_are_open() {
        let model = parse("[[model]]\nc.x = (1 +\n    2)\n[c]\ndot(x) = 0\n").unwrap();
        assert_eq!(model.initial_values[0].value, "(1 + 2)");
    }

    #[test]
    fn unclosed_continuation_reports_first_line() {
        let e = err("[[model]]\n[a]\nx = f(1,\n    2,\n");
        assert_eq!(e, ParseError::new(3, "unbalanced parentheses"));
    }

    #[test]
    fn unbalanced_parentheses_is_error() {
        let e = err("[[model]]\n[a]\nx = (1 + 2\n");
        assert_eq!(e, ParseError::new(3, "unbalanced parentheses"));
        let e = err("[[model]]\n[a]\nx = 1 + 2)\n");
        assert_eq!(e, ParseError::new(3, "unbalanced parentheses"));
    }

    #[test]
    fn line_without_assignment_is_error() {
        let e = err("[[model]]\n[a]\njust some words\n");
        assert_eq!(e.line, 3);
        assert!(e.message.starts_with("expected a variable definition"));
    }

    #[test]
    fn unterminated_unit_is_error() {
        let e = err("[[model]]\n[a]\nx = 1 in [mV\n");
        assert_eq!(e, ParseError::new(3, "unterminated unit"));
    }

    #[test]
    fn trailing_garbage_after_unit_is_error() {
        let e = err("[[model]]\n[a]\nx = 1 in [mV] extra\n");
        assert!(e.message.starts_with("unexpected text after expression"));
    }

    #[test]
    fn duplicate_binding_is_error() {
        let e = err("[[model]]\n[a]\nt = 0 bind time\ns = 0 bind time\n");
        assert_eq!(e, ParseError::new(4, "binding time used more than once"));
    }

    #[test]
    fn attribute_without_variable_is_error() {
        let e = err("[[model]]\n[a]\n    in [mV]\n");
        assert_eq!(e, ParseError::new(3, "attribute outside of a variable definition"));
    }

    #[test]
    fn nested_without_parent_is_error() {
        let e = err("[[model]]\n[a]\n    y = 2\n");
        assert!(e.message.contains("has no parent"));
    }

    #[test]
    fn initial_value_for_unknown_state_is_error() {
        let e = err("[[model]]\nmembrane.V = -80\n[membrane]\nC = 1\n");
        assert_eq!(e, ParseError::new(2, "initial value for unknown state membrane.V"));
    }

    #[test]
    fn initial_value_for_non_state_is_error() {
        let e = err("[[model]]\nmembrane.C = -80\n[membrane]\nC = 1\n");
        assert_eq!(e, ParseError::new(2, "membrane.C is not a state variable"));
    }

    #[test]
    fn state_without_initial_value_is_error() {
        let e = err("[[model]]\n[membrane]\ndot(V) = 1\n");
        assert_eq!(e, ParseError::new(3, "no initial value for state membrane.V"));
    }

    #[test]
    fn invalid_initial_value_target_is_error() {
        let e = err("[[model]]\nV = 1\n");
        assert_eq!(e, ParseError::new(2, "invalid initial value target: V"));
    }

    #[test]
    fn duplicate_initial_value_is_error() {
        let e = err("[[model]]\na.x = 1\na.x = 2\n");
        assert_eq!(e, ParseError::new(3, "duplicate initial value for a.x"));
    }

    #[test]
    fn malformed_protocol_row_is_error() {
        let e = err("[[model]]\n[[protocol]]\n1 2 3\n");
        assert_eq!(e.line, 3);
        assert!(e.message.starts_with("invalid protocol row"));
    }

    #[test]
    fn protocol_start_may_be_next() {
        let model = parse("[[model]]\n[[protocol]]\n1 10 0.5 0 0\n2 next 0.5 0 0\n").unwrap();
        assert_eq!(model.protocol.len(), 2);
        assert_eq!(model.protocol[0].start, EventStart::At(10.0));
        assert_eq!(model.protocol[1].start, EventStart::Next);
        assert_eq!(model.protocol[1].level, 2.0);
    }

    #[test]
    fn protocol_keyword_only_in_start_column() {
        let e = err("[[model]]\n[[protocol]]\nnext 10 0.5 0 0\n");
        assert_eq!(e.line, 3);
        assert!(e.message.starts_with("invalid protocol row"));
    }

    #[test]
    fn negative_protocol_length_is_error() {
        let e = err("[[model]]\n[[protocol]]\n1 0 -1 0 0\n");
        assert_eq!(e.line, 3);
    }

    #[test]
    fn script_section_is_free_text() {
        let model = parse("[[model]]\nname: s\n[[script]]\nthis = is not (checked\n").unwrap();
        assert_eq!(model.name(), Some("s"));
    }

    #[test]
    fn script_section_ends_at_next_double_header() {
        let e = err("[[model]]\n[[script]]\nanything\n[[bogus]]\n");
        assert_eq!(e, ParseError::new(4, "unknown section [[bogus]]"));
    }

    #[test]
    fn strip_comment_respects_quotes() {
        assert_eq!(strip_comment("x = 1 # note"), "x = 1 ");
        assert_eq!(strip_comment("desc: \"a # b\""), "desc: \"a # b\"");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("i_Na"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a.b"));
    }
}
