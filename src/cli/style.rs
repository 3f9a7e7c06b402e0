//! Semantic terminal styling
//!
//! Small wrapper over `owo-colors` so call sites say what a value *means*
//! (`.accent()`, `.error()`) instead of which color it gets. Color support
//! detection (NO_COLOR, TTY checks) is delegated to `owo-colors`.

use std::fmt::{self, Display};

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

/// A value with semantic styling applied, rendered with ANSI codes only when
/// the target stream supports them
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Render with stderr's color support detection
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |value| value.style(self.style))
        )
    }
}

/// Semantic styling methods, available on anything printable
pub trait Stylize: Display + Sized {
    /// Primary information: ref names, counts
    fn accent(self) -> Styled<Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Completed work
    fn success(self) -> Styled<Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Failures (stderr)
    fn error(self) -> Styled<Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Secondary information: hints, per-attempt noise
    fn muted(self) -> Styled<Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Headers and the current action
    fn emphasis(self) -> Styled<Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> Styled<&'static str> {
    "✓".success()
}

/// Red cross mark
pub fn cross() -> Styled<&'static str> {
    "✗".error()
}
