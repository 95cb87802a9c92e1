//! Hand-off of reconstructed text to an external rewriting service.
//!
//! The crate does not talk to any service itself. Callers implement
//! [`TextRewriter`] for whatever backend they use, and [`rewrite_text`]
//! applies the shared request rules around it.

use std::fmt;

use crate::error::{Error, Result};

/// Kind of rewrite requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteMode {
    /// Simpler, clearer wording with the meaning kept.
    Simplify,
    /// Grammar and spelling fixes only.
    FixGrammar,
}

impl RewriteMode {
    /// Request wording sent ahead of the text.
    pub fn instruction(&self) -> &'static str {
        match self {
            RewriteMode::Simplify => {
                "Rewrite the following text to be simpler, clearer, and easier to read. \
                 Use active voice. Keep short sentences. \
                 Do not lose the original meaning."
            }
            RewriteMode::FixGrammar => {
                "Correct the grammar and spelling of the following text. \
                 Do not change the tone or style significantly, just fix errors."
            }
        }
    }

    /// Full request for one piece of text.
    pub fn request(&self, text: &str) -> String {
        format!("{}\nText: \"{}\"", self.instruction(), text)
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteMode::Simplify => f.write_str("simplify"),
            RewriteMode::FixGrammar => f.write_str("fix-grammar"),
        }
    }
}

/// A service that rewrites text.
pub trait TextRewriter: Send + Sync {
    /// Rewrite `text` according to `mode`.
    fn rewrite(&self, text: &str, mode: RewriteMode) -> Result<String>;
}

impl<R: TextRewriter + ?Sized> TextRewriter for &R {
    fn rewrite(&self, text: &str, mode: RewriteMode) -> Result<String> {
        (**self).rewrite(text, mode)
    }
}

/// Rewrite text through `rewriter`.
///
/// Blank input returns an empty string without calling the service. A
/// service answer that is blank is an error rather than a silent loss of
/// the reader's text.
pub fn rewrite_text<R>(rewriter: &R, text: &str, mode: RewriteMode) -> Result<String>
where
    R: TextRewriter + ?Sized,
{
    if text.trim().is_empty() {
        return Ok(String::new());
    }

    log::debug!("Requesting {} rewrite of {} chars", mode, text.len());
    let rewritten = rewriter.rewrite(text, mode)?;
    if rewritten.trim().is_empty() {
        return Err(Error::Rewrite(format!("{} returned no text", mode)));
    }
    Ok(rewritten)
}
