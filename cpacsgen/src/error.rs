use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeGenErrorKind {
    #[error("Failed to load XSD: {0}")]
    Xsd(#[from] cpacsgen_xml::XsdError),
    #[error("{message}. xpath: {xpath}")]
    Schema { message: String, xpath: String },
    #[error("{message} is not implemented. xpath: {xpath}")]
    NotImplemented { message: String, xpath: String },
    #[error("{0}")]
    Build(String),
    #[error("{0}")]
    Emit(String),
    #[error("{0}: {1}")]
    Io(String, std::io::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub struct CodeGenError {
    #[source]
    pub kind: Box<CodeGenErrorKind>,
    pub context: Option<String>,
    pub file: Option<String>,
}

impl Display for CodeGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code generation failed: {}", self.kind)?;
        if let Some(context) = &self.context {
            write!(f, ", while {context}")?;
        }
        if let Some(file) = &self.file {
            write!(f, ", while loading file {file}")?;
        }
        Ok(())
    }
}

impl From<cpacsgen_xml::XsdError> for CodeGenError {
    fn from(value: cpacsgen_xml::XsdError) -> Self {
        Self::new(value.into())
    }
}

impl CodeGenError {
    pub fn new(kind: CodeGenErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            context: None,
            file: None,
        }
    }

    pub fn schema(message: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::Schema {
            message: message.into(),
            xpath: xpath.into(),
        })
    }

    pub fn not_implemented(message: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::NotImplemented {
            message: message.into(),
            xpath: xpath.into(),
        })
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::Build(message.into()))
    }

    pub fn emit(message: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::Emit(message.into()))
    }

    pub fn io(message: &str, e: std::io::Error) -> Self {
        Self::new(CodeGenErrorKind::Io(message.to_owned(), e))
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::Other(message.into()))
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this error is the distinguished "not implemented" signal.
    pub fn is_not_implemented(&self) -> bool {
        matches!(*self.kind, CodeGenErrorKind::NotImplemented { .. })
    }
}
