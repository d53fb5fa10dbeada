use arch::op::Op;
use strum::{Display, EnumIter, EnumString};

/// Source lines above this length are rejected before classification.
pub const MAX_LINE_LEN: usize = 80;

// ----------------------------------------------------------------------------
// Line

#[derive(Debug, Clone)]
pub struct Line {
    idx: usize,
    raw: String,
}

impl Line {
    pub fn new(idx: usize, raw: &str) -> Self {
        Self {
            idx,
            raw: raw.trim_end_matches('\r').to_string(),
        }
    }

    /// 1-based line number for diagnostics.
    pub fn no(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn over_length(&self) -> bool {
        self.raw.chars().count() > MAX_LINE_LEN
    }
}

// ----------------------------------------------------------------------------
// Classification

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Blank,
    Comment,
    Inst(Op),
    Directive(Directive),
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, Display)]
pub enum Directive {
    #[strum(serialize = ".db")]
    Db,
    #[strum(serialize = ".dh")]
    Dh,
    #[strum(serialize = ".dw")]
    Dw,
    #[strum(serialize = ".asciz")]
    Asciz,
    #[strum(serialize = ".entry")]
    Entry,
    #[strum(serialize = ".extern")]
    Extern,
}

/// Storage width of one data item, in addressing units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte = 1,
    Half = 2,
    Word = 4,
}

impl Width {
    pub fn bytes(self) -> u32 {
        self as u32
    }
}

pub fn classify(code: &str) -> Kind {
    let trimmed = code.trim_start();
    if trimmed.is_empty() {
        return Kind::Blank;
    }
    if trimmed.starts_with(';') {
        return Kind::Comment;
    }
    let parts = split(code);
    let Some(name) = parts.name else {
        return Kind::Invalid;
    };
    if let Ok(dir) = name.parse::<Directive>() {
        return Kind::Directive(dir);
    }
    if let Ok(op) = Op::parse(name) {
        return Kind::Inst(op);
    }
    Kind::Invalid
}

// ----------------------------------------------------------------------------
// Parts

/// A non-blank line split into `[label:] name [params]`.
#[derive(Debug, Clone, Default)]
pub struct Parts<'a> {
    pub label: Option<&'a str>,
    pub name: Option<&'a str>,
    pub params: Option<&'a str>,
}

pub fn split(code: &str) -> Parts<'_> {
    let code = code.trim();
    if code.is_empty() {
        return Parts::default();
    }

    let (mut head, mut rest) = next_token(code);
    let mut label = None;
    if let Some(stripped) = head.strip_suffix(':') {
        label = Some(stripped);
        if rest.is_empty() {
            return Parts {
                label,
                name: None,
                params: None,
            };
        }
        (head, rest) = next_token(rest);
    }

    Parts {
        label,
        name: Some(head),
        params: (!rest.is_empty()).then_some(rest),
    }
}

fn next_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_kinds() {
        assert_eq!(classify(""), Kind::Blank);
        assert_eq!(classify("   \t"), Kind::Blank);
        assert_eq!(classify("; a comment"), Kind::Comment);
        assert_eq!(classify("   ; indented comment"), Kind::Comment);
        assert_eq!(classify("add $1,$2,$3"), Kind::Inst(Op::ADD));
        assert_eq!(classify("LOOP: bne $1,$2,END"), Kind::Inst(Op::BNE));
        assert_eq!(classify(".db 1,2"), Kind::Directive(Directive::Db));
        assert_eq!(classify("STR: .asciz \"ab\""), Kind::Directive(Directive::Asciz));
        assert_eq!(classify("frobnicate $1"), Kind::Invalid);
        assert_eq!(classify(".dd 1"), Kind::Invalid);
        assert_eq!(classify("ONLY:"), Kind::Invalid);
    }

    #[test]
    fn split_parts() {
        let p = split("LOOP: add $1, $2, $3");
        assert_eq!(p.label, Some("LOOP"));
        assert_eq!(p.name, Some("add"));
        assert_eq!(p.params, Some("$1, $2, $3"));

        let p = split("stop");
        assert_eq!(p.label, None);
        assert_eq!(p.name, Some("stop"));
        assert_eq!(p.params, None);

        let p = split("  X: .asciz \"hello world\"  ");
        assert_eq!(p.label, Some("X"));
        assert_eq!(p.name, Some(".asciz"));
        assert_eq!(p.params, Some("\"hello world\""));

        let p = split("BARE:");
        assert_eq!(p.label, Some("BARE"));
        assert_eq!(p.name, None);

        let p = split(": add $1,$2,$3");
        assert_eq!(p.label, Some(""));
        assert_eq!(p.name, Some("add"));
    }

    #[test]
    fn over_length() {
        let ok = Line::new(0, &"a".repeat(MAX_LINE_LEN));
        assert!(!ok.over_length());
        let long = Line::new(0, &"a".repeat(MAX_LINE_LEN + 1));
        assert!(long.over_length());
    }
}
