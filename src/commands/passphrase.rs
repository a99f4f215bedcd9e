//! `japg`: generate a passphrase and put it on the clipboard.
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::cli::PassphraseCli;
use crate::context::Context;
use crate::error::PassphraseError;
use crate::passphrase;

/// Word list installed by `jinstall`.
pub const DEFAULT_WORDLIST: &str = "/usr/share/dict/japg-words.txt";

/// Words per passphrase when none is given.
pub const DEFAULT_WORD_COUNT: usize = 4;

/// Separator when none is given.
pub const DEFAULT_DELIMITER: &str = "-";

/// A program that reads text on stdin and places it on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clipboard {
    /// Program name.
    pub program: &'static str,
    /// Arguments selecting the clipboard.
    pub args: &'static [&'static str],
}

impl Clipboard {
    /// `wl-copy` for Wayland sessions.
    pub const WAYLAND: Self = Self {
        program: "wl-copy",
        args: &[],
    };

    /// `xclip` for X11 sessions.
    pub const X11: Self = Self {
        program: "xclip",
        args: &["-selection", "clipboard"],
    };

    /// The clipboard tool for the current session.
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty()) {
            Self::WAYLAND
        } else {
            Self::X11
        }
    }
}

/// Run `japg` with the session's clipboard and the thread RNG.
///
/// # Errors
///
/// See [`run_with`].
pub fn run(opts: &PassphraseCli, ctx: &Context) -> Result<(), PassphraseError> {
    run_with(opts, ctx, Clipboard::detect(), &mut rand::rng())
}

/// Run `japg` with an explicit clipboard tool and random source.
///
/// # Errors
///
/// Returns the [`PassphraseError`] of the first check that fails: word count,
/// word list presence, clipboard tool, word list contents, then the copy.
pub fn run_with<R: Rng + ?Sized>(
    opts: &PassphraseCli,
    ctx: &Context,
    clipboard: Clipboard,
    rng: &mut R,
) -> Result<(), PassphraseError> {
    let count = opts
        .word_count
        .as_deref()
        .map_or(Ok(DEFAULT_WORD_COUNT), passphrase::parse_count)?;
    let delimiter = opts.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER);
    let wordlist = opts
        .wordlist
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDLIST));

    if !wordlist.is_file() {
        return Err(PassphraseError::WordListMissing(wordlist));
    }
    if !ctx.executor.which(clipboard.program) {
        return Err(PassphraseError::MissingClipboardTool(clipboard.program));
    }

    let words = read_words(&wordlist)?;
    ctx.log.debug(&format!(
        "{} words in {}",
        words.len(),
        wordlist.display()
    ));
    let phrase = passphrase::generate(&words, count, delimiter, rng)?;

    ctx.executor
        .run_with_stdin(clipboard.program, clipboard.args, &phrase)
        .map_err(|e| PassphraseError::ClipboardFailed(format!("{e:#}")))?;

    ctx.log
        .secret(&format!("passphrase copied to clipboard: {phrase}"));
    Ok(())
}

fn read_words(path: &Path) -> Result<Vec<String>, PassphraseError> {
    std::fs::read_to_string(path)
        .map(|content| passphrase::parse_words(&content))
        .map_err(|source| PassphraseError::WordListUnreadable {
            path: path.to_path_buf(),
            source,
        })
}
