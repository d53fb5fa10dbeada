use color_print::cprintln;
use thiserror::Error;

use crate::parser::Line;

/// One validation failure kind per offending line; the first violated rule
/// determines the kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagKind {
    #[error("line is longer than 80 characters")]
    LineTooLong,

    #[error("invalid register name")]
    RegisterName,

    #[error("invalid command name")]
    CommandName,

    #[error("invalid directive name")]
    DirectiveName,

    #[error("command did not get the correct number of parameters")]
    ParamCount,

    #[error("one or more of the parameters does not suit the command")]
    WrongParameters,

    #[error("one of the parameter values is out of range")]
    ValueOutOfRange,

    #[error("string may contain printable characters only")]
    NotPrintable,

    #[error("label `{0}` cannot be both external and internal")]
    ExternAndInternal(String),

    #[error("missing comma between parameters")]
    MissingComma,

    #[error("multiple consecutive commas")]
    MultipleCommas,

    #[error("invalid label syntax")]
    LabelSyntax,

    #[error("label does not exist")]
    LabelDoesntExist,

    #[error("missing parameter")]
    MissingParam,

    #[error("too many parameters for this command")]
    ExtraneousParam,

    #[error("string must start and end with a quotation mark")]
    MissingQuotes,

    #[error("empty label is invalid")]
    EmptyLabel,

    #[error("label attached to an invalid or empty line")]
    LabelOnInvalidLine,

    #[error("label `{0}` is already defined")]
    Redefined(String),
}

#[derive(Debug, Clone)]
pub struct Diag {
    pub line: usize,
    pub kind: DiagKind,
}

/// Diagnostics for one translation unit, in emission order, never deduplicated.
#[derive(Debug, Default)]
pub struct Diags(Vec<Diag>);

impl Diags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: usize, kind: DiagKind) {
        self.0.push(Diag { line, kind });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diag> {
        self.0.iter()
    }

    /// Print every diagnostic with its source location and line content.
    pub fn print(&self, file: &str, lines: &[Line]) {
        for diag in &self.0 {
            let raw = lines
                .get(diag.line - 1)
                .map(|line| line.raw())
                .unwrap_or("");
            cprintln!("<red,bold>error</>: {}", diag.kind);
            cprintln!("     <blue>--></> <underline>{}:{}</>", file, diag.line);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", diag.line, raw);
            cprintln!("      <blue>|</>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_emission_order_and_duplicates() {
        let mut diags = Diags::new();
        diags.push(3, DiagKind::LabelSyntax);
        diags.push(1, DiagKind::LineTooLong);
        diags.push(3, DiagKind::LabelSyntax);

        let lines: Vec<usize> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 1, 3]);
        assert_eq!(diags.len(), 3);
    }
}
