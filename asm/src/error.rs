use thiserror::Error;

/// Fatal, per-file failures. Unlike diagnostics these abort the run for the
/// current translation unit; the variants past the I/O ones are
/// internal-consistency faults that cannot occur after a clean validation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not an `.as` source file: {0}")]
    NotAsmFile(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("More argument required")]
    MissingArgument,

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),
}
