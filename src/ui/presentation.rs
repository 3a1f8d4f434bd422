use crossterm::terminal;

use crate::core::errors::PlayerError;
use crate::core::traits::PresentationHost;

/// Terminal stand-in for the host's exclusive presentation mode: a zen
/// layout that fills the whole viewport.
///
/// Entering is a request, not a guarantee: the host refuses when the
/// viewport cannot fit the stage, and callers are expected to read
/// [`is_active`] back instead of trusting their own request.
///
/// [`is_active`]: PresentationHost::is_active
pub struct TerminalPresentation {
    active: bool,
    min_rows: u16,
}

impl TerminalPresentation {
    /// Smallest viewport the zen layout is readable in.
    pub const MIN_ROWS: u16 = 8;

    pub fn new() -> Self {
        Self {
            active: false,
            min_rows: Self::MIN_ROWS,
        }
    }
}

impl Default for TerminalPresentation {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationHost for TerminalPresentation {
    fn enter(&mut self) -> Result<(), PlayerError> {
        let (_cols, rows) =
            terminal::size().map_err(|e| PlayerError::presentation(e.to_string()))?;
        if rows < self.min_rows {
            return Err(PlayerError::presentation(format!(
                "viewport too small ({rows} rows)"
            )));
        }
        self.active = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<(), PlayerError> {
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_outside_presentation_mode() {
        assert!(!TerminalPresentation::new().is_active());
    }

    #[test]
    fn exit_is_idempotent() {
        let mut host = TerminalPresentation::new();
        host.exit().unwrap();
        host.exit().unwrap();
        assert!(!host.is_active());
    }
}
