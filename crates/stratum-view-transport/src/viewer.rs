//! Drives a renderer from an inbound message stream.

use futures::{Stream, StreamExt};
use stratum_view_core::{CellSurface, RenderError, RenderOutcome, StateRenderer};

/// Totals for a finished [`Viewer::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSummary {
    /// Messages rendered.
    pub rendered: usize,
    /// Messages rejected.
    pub failed: usize,
}

/// Single consumer of a message stream, feeding a [`StateRenderer`].
///
/// Each message is decoded and rendered to completion before the next one
/// is taken, so surface writes follow arrival order.
pub struct Viewer<I, S> {
    inbound: I,
    renderer: StateRenderer<S>,
}

impl<I, S> Viewer<I, S>
where
    I: Stream<Item = String> + Unpin,
    S: CellSurface,
{
    /// Create a viewer.
    #[must_use]
    pub const fn new(inbound: I, renderer: StateRenderer<S>) -> Self {
        Self { inbound, renderer }
    }

    /// Render the next inbound message.
    ///
    /// Returns `None` when the stream has ended. A rejected message is
    /// returned as an error and leaves the surface as it was.
    pub async fn next_render(&mut self) -> Option<Result<RenderOutcome, RenderError>> {
        let raw = self.inbound.next().await?;
        Some(self.renderer.handle_message(&raw))
    }

    /// Render messages until the stream ends.
    ///
    /// Rejected messages are logged and skipped; the stream keeps being
    /// consumed.
    pub async fn run(&mut self) -> ViewSummary {
        let mut summary = ViewSummary::default();
        while let Some(result) = self.next_render().await {
            match result {
                Ok(outcome) => {
                    summary.rendered += 1;
                    if let Some(winner) = &outcome.winner {
                        tracing::info!(%winner, "Game over");
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Failed to render message: {e}");
                }
            }
        }
        tracing::info!(rendered = summary.rendered, failed = summary.failed, "Stream ended");
        summary
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &StateRenderer<S> {
        &self.renderer
    }

    /// The surface being rendered into.
    #[must_use]
    pub const fn surface(&self) -> &S {
        self.renderer.surface()
    }

    /// The inbound stream.
    #[must_use]
    pub const fn inbound(&self) -> &I {
        &self.inbound
    }

    /// Split the viewer into its stream and renderer.
    pub fn into_parts(self) -> (I, StateRenderer<S>) {
        (self.inbound, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use stratum_view_core::{CellGrid, DecodeError};

    use super::*;

    fn messages(raw: &[&str]) -> stream::Iter<std::vec::IntoIter<String>> {
        stream::iter(raw.iter().map(|s| (*s).to_string()).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_next_render_surfaces_errors() {
        let inbound = messages(&[
            r#"{"type":"message","payload":"[[\"X\",\"\"]]"}"#,
            r#"{"type":"error","payload":"[[\"O\",\"O\"]]"}"#,
            r#"{"type":"message","payload":"[[\"X\",\"O\"]]"}"#,
        ]);
        let mut viewer = Viewer::new(inbound, StateRenderer::new(CellGrid::new(1, 2)));

        assert!(viewer.next_render().await.unwrap().is_ok());
        assert_eq!(viewer.surface().texts(), ["X", ""]);

        let err = viewer.next_render().await.unwrap().unwrap_err();
        assert!(matches!(err, RenderError::Decode(DecodeError::Protocol { .. })));
        assert_eq!(viewer.surface().texts(), ["X", ""]);

        assert!(viewer.next_render().await.unwrap().is_ok());
        assert_eq!(viewer.surface().texts(), ["X", "O"]);

        assert!(viewer.next_render().await.is_none());
    }

    #[tokio::test]
    async fn test_run_keeps_going_after_errors() {
        let inbound = messages(&[
            "000000[[\"X\",\"\",\"\"]]",
            "bad",
            "000000[[\"X\",\"O\",\"\"]]",
            "000000[[\"X\",\"O\",\"X\"]]",
        ]);
        let mut viewer = Viewer::new(inbound, StateRenderer::new(CellGrid::new(1, 3)));

        let summary = viewer.run().await;
        assert_eq!(summary, ViewSummary { rendered: 3, failed: 1 });

        let (_, renderer) = viewer.into_parts();
        let grid = renderer.into_surface();
        assert_eq!(grid.texts(), ["X", "O", "X"]);
        assert_eq!(grid.mutations(), 9);
    }
}
